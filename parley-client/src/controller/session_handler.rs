use crate::media::MediaError;
use crate::negotiation::RemoteTrack;
use async_trait::async_trait;
use parley_core::{CameraFrame, ParticipantId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub from: ParticipantId,
    pub text: String,
    /// Local echo of a line this client sent.
    pub local: bool,
}

/// Terminal failures surfaced to the user. None of them is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionFailure {
    #[error(transparent)]
    Media(#[from] MediaError),

    #[error("Connection error. Please try refreshing the page. ({0})")]
    Transport(String),

    #[error("Connection closed. Please refresh the page to reconnect.")]
    Closed,

    #[error("Error connecting to peer {peer}. Please refresh and try again. ({reason})")]
    Negotiation {
        peer: ParticipantId,
        reason: String,
    },
}

/// Application side of a session: rendering and user-visible notices.
#[async_trait]
pub trait SessionHandler: Send + Sync + 'static {
    async fn on_established(&self, peer: &ParticipantId);

    async fn on_remote_track(&self, peer: &ParticipantId, track: RemoteTrack);

    async fn on_chat_message(&self, message: ChatMessage);

    async fn on_camera_frame(&self, frame: CameraFrame);

    async fn on_peer_left(&self, peer: &ParticipantId);

    async fn on_failure(&self, failure: SessionFailure);
}
