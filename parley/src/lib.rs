pub use parley_core::model::{ParticipantId, RoomId};

pub mod model {
    pub use parley_core::model::*;
    pub use parley_core::{ProtocolError, utils};
}

#[cfg(feature = "client")]
pub mod client {
    pub use parley_client::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use parley_server::*;
}
