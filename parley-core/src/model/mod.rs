mod description;
mod envelope;
mod frame;
mod ice;
mod participant;
mod room;
mod signal;

pub use description::{SdpType, SessionDescription};
pub use envelope::{Envelope, EventKind};
pub use frame::CameraFrame;
pub use ice::{IceCandidate, IceServerConfig};
pub use participant::ParticipantId;
pub use room::RoomId;
pub use signal::{Signal, SignalEnvelope};
