use crate::model::EventKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(#[source] serde_json::Error),

    #[error("malformed {event} payload: {source}")]
    MalformedPayload {
        event: EventKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} envelope carries no participant identity")]
    MissingParticipant(EventKind),

    #[error("invalid camera frame: {0}")]
    InvalidFrame(String),

    #[error("failed to encode envelope: {0}")]
    Encode(#[source] serde_json::Error),
}
