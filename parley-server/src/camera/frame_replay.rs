use anyhow::{Context, Result, bail};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Stand-in for a capture device: loops over the `.jpg` files of a
/// directory at a fixed rate.
pub struct FrameReplay {
    frames: Vec<PathBuf>,
    interval: Duration,
}

impl FrameReplay {
    pub async fn from_dir(dir: impl AsRef<Path>, fps: u32) -> Result<Self> {
        let dir = dir.as_ref();
        if fps == 0 {
            bail!("frame rate must be at least 1");
        }

        let mut entries = tokio::fs::read_dir(dir)
            .await
            .with_context(|| format!("Failed to read frames directory {}", dir.display()))?;

        let mut frames = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_jpeg = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"));
            if is_jpeg {
                frames.push(path);
            }
        }

        if frames.is_empty() {
            bail!("no .jpg frames in {}", dir.display());
        }
        frames.sort();

        Ok(Self {
            frames,
            interval: Duration::from_secs(1) / fps,
        })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Feeds frames into `tx` until the receiver is gone.
    pub async fn run(self, tx: mpsc::Sender<Bytes>) {
        info!(
            "Replaying {} frames every {:?}",
            self.frames.len(),
            self.interval
        );
        let mut ticker = tokio::time::interval(self.interval);

        for path in self.frames.iter().cycle() {
            ticker.tick().await;

            let jpeg = match tokio::fs::read(path).await {
                Ok(bytes) => Bytes::from(bytes),
                Err(e) => {
                    warn!("Failed to read frame {}: {}", path.display(), e);
                    continue;
                }
            };

            if tx.send(jpeg).await.is_err() {
                break;
            }
        }
    }
}
