use parley_core::{IceServerConfig, RoomId};

/// Where to find the signaling server and how to reach peers.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub url: String,
    pub room: RoomId,
    pub ice_servers: Vec<IceServerConfig>,
}

impl ClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            room: RoomId::default(),
            ice_servers: IceServerConfig::defaults(),
        }
    }

    pub fn with_room(mut self, room: RoomId) -> Self {
        self.room = room;
        self
    }

    pub fn with_ice_servers(mut self, ice_servers: Vec<IceServerConfig>) -> Self {
        self.ice_servers = ice_servers;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("ws://127.0.0.1:3000/ws")
    }
}
