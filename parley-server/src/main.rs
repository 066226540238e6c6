use anyhow::{Context, Result};
use clap::Parser;
use parley_server::{CameraFeed, FrameReplay, RelayService, ServerConfig};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

const FRAME_QUEUE: usize = 8;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServerConfig::parse();
    let relay = RelayService::new();

    if let Some(dir) = &config.frames_dir {
        let replay = FrameReplay::from_dir(dir, config.fps).await?;
        let (frame_tx, frame_rx) = mpsc::channel(FRAME_QUEUE);

        tokio::spawn(CameraFeed::new(relay.clone(), config.camera_room()).run(frame_rx));
        tokio::spawn(replay.run(frame_tx));
    }

    let (_, server) = parley_server::spawn(config.bind, relay).await?;
    server.await.context("Server task failed")?;

    Ok(())
}
