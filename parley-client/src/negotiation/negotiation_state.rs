use std::fmt;

/// Per-peer negotiation progress.
///
/// `Idle -> Offered -> Answered -> Connected` on the offering side,
/// `Idle -> Answered -> Connected` on the answering side. `Failed` is
/// reachable from anywhere and is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    Idle,
    Offered,
    Answered,
    Connected,
    Failed,
}

impl fmt::Display for NegotiationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NegotiationState::Idle => "idle",
            NegotiationState::Offered => "offered",
            NegotiationState::Answered => "answered",
            NegotiationState::Connected => "connected",
            NegotiationState::Failed => "failed",
        };
        f.write_str(name)
    }
}
