use crate::media::{MediaTrack, TrackKind};
use dashmap::DashMap;
use std::sync::Arc;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

/// Sample tracks shared by every peer connection of a client.
///
/// The capture side writes samples into the track returned by [`LocalTracks::get`];
/// each negotiation session sends the same track.
#[derive(Clone, Default)]
pub struct LocalTracks {
    tracks: Arc<DashMap<String, Arc<TrackLocalStaticSample>>>,
}

impl LocalTracks {
    pub fn get(&self, id: &str) -> Option<Arc<TrackLocalStaticSample>> {
        self.tracks.get(id).map(|entry| entry.value().clone())
    }

    pub(crate) fn get_or_create(&self, track: &MediaTrack) -> Arc<TrackLocalStaticSample> {
        self.tracks
            .entry(track.id.clone())
            .or_insert_with(|| {
                Arc::new(TrackLocalStaticSample::new(
                    codec_for(track.kind),
                    track.id.clone(),
                    track.stream_id.clone(),
                ))
            })
            .value()
            .clone()
    }
}

fn codec_for(kind: TrackKind) -> RTCRtpCodecCapability {
    match kind {
        TrackKind::Audio => RTCRtpCodecCapability {
            mime_type: MIME_TYPE_OPUS.to_owned(),
            clock_rate: 48000,
            channels: 2,
            ..Default::default()
        },
        TrackKind::Video => RTCRtpCodecCapability {
            mime_type: MIME_TYPE_VP8.to_owned(),
            clock_rate: 90000,
            ..Default::default()
        },
    }
}
