pub mod routing_tests;

use parley_server::RelayService;
use tracing::Level;

use crate::utils::TestClient;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Starts a relay on an ephemeral port and returns its WebSocket URL.
pub async fn spawn_relay() -> (String, RelayService) {
    let relay = RelayService::new();
    let (addr, _) = parley_server::spawn(([127, 0, 0, 1], 0).into(), relay.clone())
        .await
        .expect("Failed to start relay");

    (format!("ws://{}/ws", addr), relay)
}

/// Connects and joins `id`, waiting until the relay has registered it.
pub async fn joined_client(url: &str, relay: &RelayService, id: &str) -> TestClient {
    let mut client = TestClient::connect(url, id)
        .await
        .expect("Failed to connect client");
    client.join().await.expect("Failed to send join");

    for _ in 0..200 {
        if relay.is_joined(&client.id) {
            return client;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!("{} never joined", id);
}
