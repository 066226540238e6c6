use crate::negotiation::NegotiationState;
use std::fmt;
use thiserror::Error;

/// Platform operation a negotiation step was running when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationStep {
    Connect,
    AddTrack,
    CreateOffer,
    CreateAnswer,
    SetLocalDescription,
    SetRemoteDescription,
}

impl fmt::Display for NegotiationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NegotiationStep::Connect => "create peer connection",
            NegotiationStep::AddTrack => "add local track",
            NegotiationStep::CreateOffer => "create offer",
            NegotiationStep::CreateAnswer => "create answer",
            NegotiationStep::SetLocalDescription => "set local description",
            NegotiationStep::SetRemoteDescription => "set remote description",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum NegotiationError {
    #[error("cannot {action} in state {state}")]
    InvalidTransition {
        action: &'static str,
        state: NegotiationState,
    },

    #[error("failed to {step}: {message}")]
    Platform {
        step: NegotiationStep,
        message: String,
    },
}

impl NegotiationError {
    pub(crate) fn platform(step: NegotiationStep, err: anyhow::Error) -> Self {
        Self::Platform {
            step,
            message: format!("{:#}", err),
        }
    }
}
