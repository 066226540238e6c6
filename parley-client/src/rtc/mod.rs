mod local_tracks;
mod rtc_peer;
mod rtc_peer_connector;

pub use local_tracks::LocalTracks;
pub use rtc_peer::RtcPeer;
pub use rtc_peer_connector::RtcPeerConnector;
