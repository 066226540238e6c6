mod channel;
mod config;
mod controller;
mod error;
mod media;
mod membership;
mod negotiation;
mod rtc;

pub use channel::*;
pub use config::*;
pub use controller::*;
pub use error::*;
pub use media::*;
pub use membership::*;
pub use negotiation::*;
pub use rtc::*;
