mod negotiation_error;
mod negotiation_state;
mod peer;
mod session;

pub use negotiation_error::*;
pub use negotiation_state::*;
pub use peer::*;
pub use session::*;
