use crate::config::ClientConfig;
use crate::media::TrackKind;
use crate::negotiation::{
    IceConnectionState, PeerConnection, PeerConnector, PeerEventSink, RemoteTrack,
};
use crate::rtc::{LocalTracks, RtcPeer};
use anyhow::Result;
use async_trait::async_trait;
use parley_core::{IceCandidate, IceServerConfig};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::RTCIceCandidate;
use webrtc::ice_transport::ice_connection_state::RTCIceConnectionState;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::track::track_remote::TrackRemote;

/// Builds native peer connections for negotiation sessions.
pub struct RtcPeerConnector {
    ice_servers: Vec<IceServerConfig>,
    local_tracks: LocalTracks,
    remote_media: Option<mpsc::UnboundedSender<Arc<TrackRemote>>>,
}

impl RtcPeerConnector {
    pub fn new(ice_servers: Vec<IceServerConfig>) -> Self {
        Self {
            ice_servers,
            local_tracks: LocalTracks::default(),
            remote_media: None,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.ice_servers.clone())
    }

    /// Forwards every remote track to `tx` for decoding and rendering.
    pub fn with_remote_media(mut self, tx: mpsc::UnboundedSender<Arc<TrackRemote>>) -> Self {
        self.remote_media = Some(tx);
        self
    }

    /// Tracks the capture side writes samples into.
    pub fn local_tracks(&self) -> &LocalTracks {
        &self.local_tracks
    }

    fn rtc_configuration(&self) -> RTCConfiguration {
        let ice_servers = self
            .ice_servers
            .iter()
            .map(|server| RTCIceServer {
                urls: server.urls.clone(),
                username: server.username.clone().unwrap_or_default(),
                credential: server.credential.clone().unwrap_or_default(),
            })
            .collect();

        RTCConfiguration {
            ice_servers,
            ..Default::default()
        }
    }
}

#[async_trait]
impl PeerConnector for RtcPeerConnector {
    async fn connect(&self, events: PeerEventSink) -> Result<Box<dyn PeerConnection>> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let peer_connection = Arc::new(api.new_peer_connection(self.rtc_configuration()).await?);

        // Trickle ICE: every local candidate goes back through the controller.
        let ice_events = events.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let events = ice_events.clone();

            Box::pin(async move {
                let Some(candidate) = c else { return };
                match candidate.to_json() {
                    Ok(init) => events.ice_candidate(IceCandidate {
                        candidate: init.candidate,
                        sdp_mid: init.sdp_mid,
                        sdp_m_line_index: init.sdp_mline_index,
                        username_fragment: init.username_fragment,
                    }),
                    Err(e) => warn!("Failed to serialize local ICE candidate: {}", e),
                }
            })
        }));

        let state_events = events.clone();
        peer_connection.on_ice_connection_state_change(Box::new(
            move |s: RTCIceConnectionState| {
                let events = state_events.clone();

                Box::pin(async move {
                    info!("ICE connection state for {}: {}", events.remote(), s);
                    let state = match s {
                        RTCIceConnectionState::Checking => IceConnectionState::Checking,
                        RTCIceConnectionState::Connected => IceConnectionState::Connected,
                        RTCIceConnectionState::Completed => IceConnectionState::Completed,
                        RTCIceConnectionState::Disconnected => IceConnectionState::Disconnected,
                        RTCIceConnectionState::Failed => IceConnectionState::Failed,
                        RTCIceConnectionState::Closed => IceConnectionState::Closed,
                        _ => IceConnectionState::New,
                    };
                    events.ice_state(state);
                })
            },
        ));

        let track_events = events.clone();
        let remote_media = self.remote_media.clone();
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let events = track_events.clone();
                let remote_media = remote_media.clone();

                Box::pin(async move {
                    let kind = match track.kind() {
                        RTPCodecType::Audio => TrackKind::Audio,
                        _ => TrackKind::Video,
                    };
                    events.track(RemoteTrack {
                        id: track.id(),
                        stream_id: track.stream_id(),
                        kind,
                    });

                    if let Some(tx) = remote_media {
                        let _ = tx.send(track);
                    }
                })
            },
        ));

        Ok(Box::new(RtcPeer {
            peer_connection,
            local_tracks: self.local_tracks.clone(),
        }))
    }
}
