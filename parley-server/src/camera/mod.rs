mod camera_feed;
mod frame_replay;

pub use camera_feed::*;
pub use frame_replay::*;
