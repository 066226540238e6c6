mod session_command;
mod session_context;
mod session_controller;
mod session_handler;

pub use session_command::*;
pub use session_context::*;
pub use session_controller::*;
pub use session_handler::*;
