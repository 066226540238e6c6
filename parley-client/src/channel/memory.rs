use super::{ChannelEvent, Outbound, deliver};
use parley_core::Envelope;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tracing::warn;

/// Server end of an in-memory [`crate::SignalingChannel`].
pub struct MemoryTransport {
    outbound: mpsc::UnboundedReceiver<Outbound>,
    events: mpsc::UnboundedSender<ChannelEvent>,
    open: Arc<AtomicBool>,
    closed_by_client: bool,
}

impl MemoryTransport {
    pub(super) fn new(
        outbound: mpsc::UnboundedReceiver<Outbound>,
        events: mpsc::UnboundedSender<ChannelEvent>,
        open: Arc<AtomicBool>,
    ) -> Self {
        Self {
            outbound,
            events,
            open,
            closed_by_client: false,
        }
    }

    pub fn open(&self) {
        self.open.store(true, Ordering::SeqCst);
        let _ = self.events.send(ChannelEvent::Open);
    }

    pub fn deliver(&self, envelope: Envelope) {
        let _ = self.events.send(ChannelEvent::Message(envelope));
    }

    /// Delivers raw text the way a socket frame would arrive.
    pub fn deliver_text(&self, text: &str) {
        deliver(&self.events, text);
    }

    pub fn fail(&self, reason: impl Into<String>) {
        self.open.store(false, Ordering::SeqCst);
        let _ = self.events.send(ChannelEvent::Error(reason.into()));
        let _ = self.events.send(ChannelEvent::Closed);
    }

    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
        let _ = self.events.send(ChannelEvent::Closed);
    }

    /// Whether the client asked to close the connection.
    pub fn closed_by_client(&self) -> bool {
        self.closed_by_client
    }

    /// Next envelope the client sent, waiting for it.
    pub async fn next_sent(&mut self) -> Option<Envelope> {
        while let Some(out) = self.outbound.recv().await {
            if let Some(envelope) = self.decode(out) {
                return Some(envelope);
            }
        }
        None
    }

    /// Everything the client has sent so far, without waiting.
    pub fn drain_sent(&mut self) -> Vec<Envelope> {
        let mut sent = Vec::new();
        while let Ok(out) = self.outbound.try_recv() {
            if let Some(envelope) = self.decode(out) {
                sent.push(envelope);
            }
        }
        sent
    }

    fn decode(&mut self, out: Outbound) -> Option<Envelope> {
        match out {
            Outbound::Text(text) => match Envelope::decode(&text) {
                Ok(envelope) => Some(envelope),
                Err(e) => {
                    warn!("Client sent an undecodable envelope: {}", e);
                    None
                }
            },
            Outbound::Close => {
                self.closed_by_client = true;
                None
            }
        }
    }
}
