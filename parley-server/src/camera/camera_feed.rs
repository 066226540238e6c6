use crate::RelayService;
use bytes::Bytes;
use parley_core::{CameraFrame, ParticipantId, RoomId, Signal};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Broadcasts JPEG frames to one room as `camera-frame` envelopes.
pub struct CameraFeed {
    relay: RelayService,
    room: RoomId,
}

impl CameraFeed {
    pub fn new(relay: RelayService, room: RoomId) -> Self {
        Self { relay, room }
    }

    /// Runs until every frame sender is dropped.
    pub async fn run(self, mut frames: mpsc::Receiver<Bytes>) {
        info!("Camera feed started for room {}", self.room);

        while let Some(jpeg) = frames.recv().await {
            let frame = match CameraFrame::from_jpeg(jpeg) {
                Ok(frame) => frame,
                Err(e) => {
                    warn!("Skipping camera frame: {}", e);
                    continue;
                }
            };

            debug!("Broadcasting {} byte camera frame", frame.len());
            self.relay.publish(
                ParticipantId::server_camera(),
                &self.room,
                Signal::CameraFrame(frame),
            );
        }

        info!("Camera feed for room {} stopped", self.room);
    }
}
