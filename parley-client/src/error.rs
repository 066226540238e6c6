use crate::media::MediaError;
use crate::negotiation::NegotiationError;
use parley_core::ProtocolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Negotiation(#[from] NegotiationError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("session controller is no longer running")]
    SessionClosed,
}
