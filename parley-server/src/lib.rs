mod camera;
mod config;
mod relay;
mod signaling;

pub use camera::*;
pub use config::*;
pub use relay::*;
pub use signaling::*;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use std::net::SocketAddr;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// HTTP surface of the relay: a single WebSocket endpoint at `/ws`.
pub fn router(relay: RelayService) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .with_state(relay)
}

/// Binds `addr` and serves the relay in the background. Returns the bound
/// address, which differs from `addr` when port 0 was requested.
pub async fn spawn(
    addr: SocketAddr,
    relay: RelayService,
) -> Result<(SocketAddr, JoinHandle<()>)> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    let local = listener.local_addr()?;
    info!("Listening on {}", local);

    let task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router(relay)).await {
            error!("Server error: {}", e);
        }
    });

    Ok((local, task))
}
