use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Audio,
    Video,
}

/// A captured local track, bound into every negotiation session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTrack {
    pub id: String,
    pub stream_id: String,
    pub kind: TrackKind,
}

impl MediaTrack {
    pub fn audio(id: impl Into<String>, stream_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            stream_id: stream_id.into(),
            kind: TrackKind::Audio,
        }
    }

    pub fn video(id: impl Into<String>, stream_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            stream_id: stream_id.into(),
            kind: TrackKind::Video,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaConstraints {
    pub audio: bool,
    pub video: bool,
}

impl MediaConstraints {
    pub fn audio_video() -> Self {
        Self {
            audio: true,
            video: true,
        }
    }

    pub fn audio_only() -> Self {
        Self {
            audio: true,
            video: false,
        }
    }

    pub fn allows(&self, kind: TrackKind) -> bool {
        match kind {
            TrackKind::Audio => self.audio,
            TrackKind::Video => self.video,
        }
    }
}

impl Default for MediaConstraints {
    fn default() -> Self {
        Self::audio_video()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    #[error("Permission denied. Please allow camera/microphone access and try again.")]
    PermissionDenied,

    #[error("No camera/microphone found. Please check your device.")]
    NotFound,

    #[error("Error accessing media: {0}")]
    Other(String),
}

/// Capture provider that yields the local track set.
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn acquire(&self, constraints: &MediaConstraints) -> Result<Vec<MediaTrack>, MediaError>;
}

/// Fixed track set, filtered by the requested constraints.
#[derive(Debug, Clone, Default)]
pub struct StaticMediaSource {
    tracks: Vec<MediaTrack>,
}

impl StaticMediaSource {
    pub fn new(tracks: Vec<MediaTrack>) -> Self {
        Self { tracks }
    }

    pub fn camera_and_microphone() -> Self {
        Self::new(vec![
            MediaTrack::audio("microphone", "local"),
            MediaTrack::video("camera", "local"),
        ])
    }
}

#[async_trait]
impl MediaSource for StaticMediaSource {
    async fn acquire(&self, constraints: &MediaConstraints) -> Result<Vec<MediaTrack>, MediaError> {
        let tracks: Vec<MediaTrack> = self
            .tracks
            .iter()
            .filter(|t| constraints.allows(t.kind))
            .cloned()
            .collect();

        if tracks.is_empty() {
            return Err(MediaError::NotFound);
        }
        Ok(tracks)
    }
}
