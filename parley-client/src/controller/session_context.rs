use parley_core::{ParticipantId, RoomId};

/// Identity and room of one client session.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub local_id: ParticipantId,
    pub room: RoomId,
}

impl SessionContext {
    /// Context with a freshly generated identity.
    pub fn new(room: RoomId) -> Self {
        Self {
            local_id: ParticipantId::generate(),
            room,
        }
    }

    pub fn with_identity(local_id: ParticipantId, room: RoomId) -> Self {
        Self { local_id, room }
    }
}
