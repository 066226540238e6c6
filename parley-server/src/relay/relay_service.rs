use axum::extract::ws::Message;
use dashmap::DashMap;
use parley_core::{Envelope, EventKind, ParticipantId, RoomId, Signal, SignalEnvelope};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Identifies one WebSocket connection for the lifetime of the process.
pub type ConnectionId = u64;

struct RelayPeer {
    connection: ConnectionId,
    room: RoomId,
    tx: mpsc::UnboundedSender<Message>,
}

struct RelayInner {
    peers: DashMap<ParticipantId, RelayPeer>,
    next_connection: AtomicU64,
}

/// Registry of joined participants and the routing rules between them.
///
/// The relay never inspects payloads: envelopes are forwarded as the text
/// they arrived in.
#[derive(Clone)]
pub struct RelayService {
    inner: Arc<RelayInner>,
}

impl RelayService {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RelayInner {
                peers: DashMap::new(),
                next_connection: AtomicU64::new(0),
            }),
        }
    }

    pub fn next_connection_id(&self) -> ConnectionId {
        self.inner.next_connection.fetch_add(1, Ordering::Relaxed)
    }

    /// Number of joined participants in `room`.
    pub fn participants(&self, room: &RoomId) -> usize {
        self.inner
            .peers
            .iter()
            .filter(|peer| peer.room == *room)
            .count()
    }

    pub fn is_joined(&self, id: &ParticipantId) -> bool {
        self.inner.peers.contains_key(id)
    }

    /// Routes one text frame received on `connection`.
    pub fn handle_text(
        &self,
        connection: ConnectionId,
        tx: &mpsc::UnboundedSender<Message>,
        text: &str,
    ) {
        let envelope = match Envelope::decode(text) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!("Invalid envelope on connection {}: {}", connection, e);
                return;
            }
        };

        debug!("Relaying {} from {}", envelope.event, envelope.from);

        match envelope.event {
            EventKind::Join => self.join(connection, envelope.from, envelope.room, tx.clone()),
            EventKind::Message => self.broadcast(&envelope.room, text, None),
            EventKind::Offer | EventKind::Answer | EventKind::IceCandidate => match &envelope.to {
                Some(to) => self.send_to(to, text),
                None => self.broadcast(&envelope.room, text, Some(&envelope.from)),
            },
            other => debug!("Ignoring client-sent {} on connection {}", other, connection),
        }
    }

    /// Registers `id` in `room` and tells everyone else there.
    pub fn join(
        &self,
        connection: ConnectionId,
        id: ParticipantId,
        room: RoomId,
        tx: mpsc::UnboundedSender<Message>,
    ) {
        if id.is_empty() || id.is_server() || id.is_server_camera() {
            warn!("Rejecting join with reserved identity {:?}", id.as_str());
            return;
        }

        info!("Participant {} joined room {}", id, room);
        self.inner.peers.insert(
            id.clone(),
            RelayPeer {
                connection,
                room: room.clone(),
                tx,
            },
        );

        self.notify(&room, Signal::UserJoined(id.clone()), Some(&id));
    }

    /// Removes everything registered by `connection` and announces each
    /// departure to its room.
    pub fn disconnect(&self, connection: ConnectionId) {
        let mut left = Vec::new();
        self.inner.peers.retain(|id, peer| {
            if peer.connection == connection {
                left.push((id.clone(), peer.room.clone()));
                false
            } else {
                true
            }
        });

        for (id, room) in left {
            info!("Participant {} left room {}", id, room);
            self.notify(&room, Signal::UserLeft(id), None);
        }
    }

    /// Sends a relay-originated signal to `room`.
    pub fn publish(&self, from: ParticipantId, room: &RoomId, signal: Signal) {
        let envelope = SignalEnvelope::broadcast(room.clone(), from, signal);
        match envelope.into_envelope().and_then(|env| env.encode()) {
            Ok(text) => self.broadcast(room, &text, None),
            Err(e) => error!("Failed to encode relay envelope: {}", e),
        }
    }

    fn notify(&self, room: &RoomId, signal: Signal, except: Option<&ParticipantId>) {
        let envelope = SignalEnvelope::broadcast(room.clone(), ParticipantId::server(), signal);
        match envelope.into_envelope().and_then(|env| env.encode()) {
            Ok(text) => self.broadcast(room, &text, except),
            Err(e) => error!("Failed to encode membership notice: {}", e),
        }
    }

    fn broadcast(&self, room: &RoomId, text: &str, except: Option<&ParticipantId>) {
        for peer in self.inner.peers.iter() {
            if peer.room != *room || except == Some(peer.key()) {
                continue;
            }
            if let Err(e) = peer.tx.send(Message::Text(text.into())) {
                debug!("Dropping message for {}: {:?}", peer.key(), e);
            }
        }
    }

    fn send_to(&self, to: &ParticipantId, text: &str) {
        if let Some(peer) = self.inner.peers.get(to) {
            if let Err(e) = peer.tx.send(Message::Text(text.into())) {
                error!("Failed to send WS message to {}: {:?}", to, e);
            }
        } else {
            warn!("Attempted to send signal to disconnected participant {}", to);
        }
    }
}

impl Default for RelayService {
    fn default() -> Self {
        Self::new()
    }
}
