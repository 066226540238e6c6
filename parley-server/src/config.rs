use clap::Parser;
use parley_core::RoomId;
use parley_core::utils::DEFAULT_ROOM;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "parley-server")]
#[command(about = "WebSocket relay for room signaling, chat and camera frames")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// Room that receives camera frames
    #[arg(long, default_value = DEFAULT_ROOM)]
    pub room: String,

    /// Directory of .jpg files replayed as the camera feed
    #[arg(long)]
    pub frames_dir: Option<PathBuf>,

    /// Camera frames per second
    #[arg(long, default_value_t = 15)]
    pub fps: u32,
}

impl ServerConfig {
    pub fn camera_room(&self) -> RoomId {
        RoomId::new(self.room.clone())
    }
}
