mod memory;
mod ws;

pub use memory::MemoryTransport;

use parley_core::Envelope;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

/// Inbound side of the signaling connection, consumed by exactly one reader.
#[derive(Debug)]
pub enum ChannelEvent {
    /// The socket is open and `send` will reach the server.
    Open,
    Message(Envelope),
    Error(String),
    /// Terminal. Nothing follows.
    Closed,
}

#[derive(Debug)]
pub(crate) enum Outbound {
    Text(String),
    Close,
}

pub struct ChannelEvents {
    rx: mpsc::UnboundedReceiver<ChannelEvent>,
}

impl ChannelEvents {
    pub async fn recv(&mut self) -> Option<ChannelEvent> {
        self.rx.recv().await
    }
}

/// Outbound half of the signaling connection.
///
/// Sending while the socket is not open drops the envelope; there is no
/// outbox and no resume after a reconnect.
#[derive(Clone)]
pub struct SignalingChannel {
    outbound: mpsc::UnboundedSender<Outbound>,
    open: Arc<AtomicBool>,
}

impl SignalingChannel {
    /// Opens a WebSocket to `url` in the background.
    ///
    /// Connection failures arrive as [`ChannelEvent::Error`] followed by
    /// [`ChannelEvent::Closed`].
    pub fn connect(url: impl Into<String>) -> (Self, ChannelEvents) {
        let (channel, outbound_rx, events_tx, events) = Self::parts();
        tokio::spawn(ws::run(
            url.into(),
            channel.open.clone(),
            outbound_rx,
            events_tx,
        ));
        (channel, events)
    }

    /// Channel backed by plain queues instead of a socket.
    pub fn in_memory() -> (Self, ChannelEvents, MemoryTransport) {
        let (channel, outbound_rx, events_tx, events) = Self::parts();
        let transport = MemoryTransport::new(outbound_rx, events_tx, channel.open.clone());
        (channel, events, transport)
    }

    fn parts() -> (
        Self,
        mpsc::UnboundedReceiver<Outbound>,
        mpsc::UnboundedSender<ChannelEvent>,
        ChannelEvents,
    ) {
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let (events_tx, rx) = mpsc::unbounded_channel();
        let channel = Self {
            outbound,
            open: Arc::new(AtomicBool::new(false)),
        };
        (channel, outbound_rx, events_tx, ChannelEvents { rx })
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Hands the envelope to the transport. Returns `false` if it was dropped.
    pub fn send(&self, envelope: &Envelope) -> bool {
        if !self.is_open() {
            debug!("Channel not open, dropping {} envelope", envelope.event);
            return false;
        }

        let text = match envelope.encode() {
            Ok(text) => text,
            Err(e) => {
                error!("Failed to encode {} envelope: {}", envelope.event, e);
                return false;
            }
        };

        self.outbound.send(Outbound::Text(text)).is_ok()
    }

    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
        let _ = self.outbound.send(Outbound::Close);
    }
}

fn deliver(events: &mpsc::UnboundedSender<ChannelEvent>, text: &str) {
    match Envelope::decode(text) {
        Ok(envelope) => {
            let _ = events.send(ChannelEvent::Message(envelope));
        }
        Err(e) => warn!("Dropping inbound message: {}", e),
    }
}
