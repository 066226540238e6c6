use crate::error::ProtocolError;
use crate::model::description::SessionDescription;
use crate::model::envelope::{Envelope, EventKind};
use crate::model::frame::CameraFrame;
use crate::model::ice::IceCandidate;
use crate::model::participant::ParticipantId;
use crate::model::room::RoomId;
use serde::de::DeserializeOwned;

/// Decoded envelope payload, one variant per [`EventKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    Join,
    UserJoined(ParticipantId),
    UserLeft(ParticipantId),
    Offer(SessionDescription),
    Answer(SessionDescription),
    IceCandidate(IceCandidate),
    Message(String),
    CameraFrame(CameraFrame),
}

impl Signal {
    pub fn kind(&self) -> EventKind {
        match self {
            Signal::Join => EventKind::Join,
            Signal::UserJoined(_) => EventKind::UserJoined,
            Signal::UserLeft(_) => EventKind::UserLeft,
            Signal::Offer(_) => EventKind::Offer,
            Signal::Answer(_) => EventKind::Answer,
            Signal::IceCandidate(_) => EventKind::IceCandidate,
            Signal::Message(_) => EventKind::Message,
            Signal::CameraFrame(_) => EventKind::CameraFrame,
        }
    }

    pub fn decode(event: EventKind, data: &str) -> Result<Self, ProtocolError> {
        let signal = match event {
            EventKind::Join => Signal::Join,
            EventKind::UserJoined => Signal::UserJoined(participant(event, data)?),
            EventKind::UserLeft => Signal::UserLeft(participant(event, data)?),
            EventKind::Offer => Signal::Offer(json(event, data)?),
            EventKind::Answer => Signal::Answer(json(event, data)?),
            EventKind::IceCandidate => Signal::IceCandidate(json(event, data)?),
            EventKind::Message => Signal::Message(data.to_owned()),
            EventKind::CameraFrame => Signal::CameraFrame(CameraFrame::from_base64(data)?),
        };
        Ok(signal)
    }

    pub fn encode_data(&self) -> Result<String, ProtocolError> {
        let data = match self {
            Signal::Join => String::new(),
            Signal::UserJoined(id) | Signal::UserLeft(id) => id.to_string(),
            Signal::Offer(desc) | Signal::Answer(desc) => {
                serde_json::to_string(desc).map_err(ProtocolError::Encode)?
            }
            Signal::IceCandidate(candidate) => {
                serde_json::to_string(candidate).map_err(ProtocolError::Encode)?
            }
            Signal::Message(text) => text.clone(),
            Signal::CameraFrame(frame) => frame.to_base64(),
        };
        Ok(data)
    }
}

fn participant(event: EventKind, data: &str) -> Result<ParticipantId, ProtocolError> {
    let id = data.trim();
    if id.is_empty() {
        return Err(ProtocolError::MissingParticipant(event));
    }
    Ok(ParticipantId::from(id))
}

fn json<T: DeserializeOwned>(event: EventKind, data: &str) -> Result<T, ProtocolError> {
    serde_json::from_str(data).map_err(|source| ProtocolError::MalformedPayload { event, source })
}

/// Envelope with its payload decoded into a [`Signal`].
#[derive(Debug, Clone, PartialEq)]
pub struct SignalEnvelope {
    pub room: RoomId,
    pub from: ParticipantId,
    pub to: Option<ParticipantId>,
    pub signal: Signal,
}

impl SignalEnvelope {
    pub fn broadcast(room: RoomId, from: ParticipantId, signal: Signal) -> Self {
        Self {
            room,
            from,
            to: None,
            signal,
        }
    }

    pub fn directed(room: RoomId, from: ParticipantId, to: ParticipantId, signal: Signal) -> Self {
        Self {
            room,
            from,
            to: Some(to),
            signal,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.signal.kind()
    }

    pub fn into_envelope(self) -> Result<Envelope, ProtocolError> {
        let data = self.signal.encode_data()?;
        Ok(Envelope {
            event: self.signal.kind(),
            room: self.room,
            from: self.from,
            to: self.to,
            data,
        })
    }
}

impl TryFrom<Envelope> for SignalEnvelope {
    type Error = ProtocolError;

    fn try_from(env: Envelope) -> Result<Self, Self::Error> {
        let signal = Signal::decode(env.event, &env.data)?;
        Ok(Self {
            room: env.room,
            from: env.from,
            to: env.to,
            signal,
        })
    }
}
