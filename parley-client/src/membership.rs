use parley_core::{ParticipantId, Signal};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipChange {
    /// A counterpart is present; the side that learns this sends the offer.
    PeerPresent(ParticipantId),
    PeerLeft(ParticipantId),
}

/// Turns the server's join/leave notifications into membership changes.
pub struct RoomMembership {
    local: ParticipantId,
}

impl RoomMembership {
    pub fn new(local: ParticipantId) -> Self {
        Self { local }
    }

    pub fn observe(&self, from: &ParticipantId, signal: &Signal) -> Option<MembershipChange> {
        let (peer, change): (&ParticipantId, fn(ParticipantId) -> MembershipChange) = match signal {
            Signal::UserJoined(peer) => (peer, MembershipChange::PeerPresent),
            Signal::UserLeft(peer) => (peer, MembershipChange::PeerLeft),
            _ => return None,
        };

        if !from.is_server() {
            warn!("Ignoring {} notification sent by {}", signal.kind(), from);
            return None;
        }

        if *peer == self.local {
            debug!("Ignoring {} notification about ourselves", signal.kind());
            return None;
        }

        Some(change(peer.clone()))
    }
}
