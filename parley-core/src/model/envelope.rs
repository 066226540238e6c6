use crate::error::ProtocolError;
use crate::model::participant::ParticipantId;
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "join")]
    Join,
    #[serde(rename = "user_joined")]
    UserJoined,
    #[serde(rename = "user_left")]
    UserLeft,
    #[serde(rename = "offer")]
    Offer,
    #[serde(rename = "answer")]
    Answer,
    #[serde(rename = "ice-candidate")]
    IceCandidate,
    #[serde(rename = "message")]
    Message,
    #[serde(rename = "camera-frame")]
    CameraFrame,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Join => "join",
            EventKind::UserJoined => "user_joined",
            EventKind::UserLeft => "user_left",
            EventKind::Offer => "offer",
            EventKind::Answer => "answer",
            EventKind::IceCandidate => "ice-candidate",
            EventKind::Message => "message",
            EventKind::CameraFrame => "camera-frame",
        }
    }

    /// Offer, answer and candidate traffic that drives peer negotiation.
    pub fn is_negotiation(&self) -> bool {
        matches!(
            self,
            EventKind::Offer | EventKind::Answer | EventKind::IceCandidate
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message on the signaling socket, exactly as it travels on the wire.
///
/// `data` is still encoded per event kind here; see [`crate::SignalEnvelope`]
/// for the decoded form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub event: EventKind,
    pub room: RoomId,
    pub from: ParticipantId,
    #[serde(default)]
    pub to: Option<ParticipantId>,
    #[serde(default)]
    pub data: String,
}

impl Envelope {
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::MalformedEnvelope)
    }

    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }

    /// True when the envelope is either broadcast or addressed to `id`.
    pub fn is_for(&self, id: &ParticipantId) -> bool {
        self.to.as_ref().is_none_or(|to| to == id)
    }
}
