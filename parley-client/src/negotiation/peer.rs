use crate::media::{MediaTrack, TrackKind};
use anyhow::Result;
use async_trait::async_trait;
use parley_core::{IceCandidate, ParticipantId, SessionDescription};
use tokio::sync::mpsc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IceConnectionState {
    New,
    Checking,
    Connected,
    Completed,
    Disconnected,
    Failed,
    Closed,
}

/// Remote media announced by the peer connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTrack {
    pub id: String,
    pub stream_id: String,
    pub kind: TrackKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PeerEventKind {
    /// Locally gathered candidate that must reach the remote side.
    IceCandidate(IceCandidate),
    Track(RemoteTrack),
    IceState(IceConnectionState),
}

/// Event raised by a peer connection, tagged with the session that owns it.
#[derive(Debug, Clone)]
pub struct PeerEvent {
    pub remote: ParticipantId,
    pub epoch: u64,
    pub kind: PeerEventKind,
}

/// Handle a peer connection uses to feed events back to the controller.
#[derive(Clone)]
pub struct PeerEventSink {
    remote: ParticipantId,
    epoch: u64,
    tx: mpsc::UnboundedSender<PeerEvent>,
}

impl PeerEventSink {
    pub fn new(remote: ParticipantId, epoch: u64, tx: mpsc::UnboundedSender<PeerEvent>) -> Self {
        Self { remote, epoch, tx }
    }

    pub fn remote(&self) -> &ParticipantId {
        &self.remote
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn ice_candidate(&self, candidate: IceCandidate) {
        self.emit(PeerEventKind::IceCandidate(candidate));
    }

    pub fn track(&self, track: RemoteTrack) {
        self.emit(PeerEventKind::Track(track));
    }

    pub fn ice_state(&self, state: IceConnectionState) {
        self.emit(PeerEventKind::IceState(state));
    }

    fn emit(&self, kind: PeerEventKind) {
        let event = PeerEvent {
            remote: self.remote.clone(),
            epoch: self.epoch,
            kind,
        };
        if self.tx.send(event).is_err() {
            debug!("Session controller gone, dropping peer event for {}", self.remote);
        }
    }
}

/// Peer connection primitive a negotiation session drives.
#[async_trait]
pub trait PeerConnection: Send + Sync {
    async fn create_offer(&self) -> Result<SessionDescription>;

    async fn create_answer(&self) -> Result<SessionDescription>;

    async fn set_local_description(&self, desc: SessionDescription) -> Result<()>;

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<()>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()>;

    async fn add_track(&self, track: &MediaTrack) -> Result<()>;

    async fn close(&self) -> Result<()>;
}

/// Creates one peer connection per negotiation session.
#[async_trait]
pub trait PeerConnector: Send + Sync {
    async fn connect(&self, events: PeerEventSink) -> Result<Box<dyn PeerConnection>>;
}
