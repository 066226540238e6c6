use crate::utils::{CAMERA_IDENTITY, SERVER_IDENTITY};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identity used in the `from`/`to` fields of an envelope.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Fresh random identity for one client session.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn server() -> Self {
        Self(SERVER_IDENTITY.to_owned())
    }

    pub fn server_camera() -> Self {
        Self(CAMERA_IDENTITY.to_owned())
    }

    pub fn is_server(&self) -> bool {
        self.0 == SERVER_IDENTITY
    }

    pub fn is_server_camera(&self) -> bool {
        self.0 == CAMERA_IDENTITY
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for ParticipantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
