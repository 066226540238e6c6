use parley_client::{
    ClientConfig, MediaConstraints, SessionController, SessionFailure, StaticMediaSource,
};
use parley_core::SdpType;
use parley_server::RelayService;
use std::sync::Arc;

use crate::integration::init_tracing;
use crate::utils::{MockPeerConnector, PeerCall, RecordingHandler};

async fn spawn_relay() -> (String, RelayService) {
    let relay = RelayService::new();
    let (addr, _) = parley_server::spawn(([127, 0, 0, 1], 0).into(), relay.clone())
        .await
        .expect("Failed to start relay");

    (format!("ws://{}/ws", addr), relay)
}

#[tokio::test]
async fn test_offer_answer_and_chat_over_relay() {
    init_tracing();

    let (url, relay) = spawn_relay().await;
    let media = StaticMediaSource::camera_and_microphone();

    let alice_connector = MockPeerConnector::new();
    let alice_handler = RecordingHandler::new();
    let (alice, alice_task) = SessionController::connect(
        ClientConfig::new(url.clone()),
        &media,
        MediaConstraints::default(),
        Arc::new(alice_connector.clone()),
        Arc::new(alice_handler.clone()),
    )
    .await
    .expect("alice connects");

    // Alice must be registered before Bob joins, or she misses the notice.
    for _ in 0..200 {
        if relay.is_joined(alice.local_id()) {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert!(relay.is_joined(alice.local_id()));

    let bob_connector = MockPeerConnector::new();
    let bob_handler = RecordingHandler::new();
    let (bob, bob_task) = SessionController::connect(
        ClientConfig::new(url),
        &media,
        MediaConstraints::default(),
        Arc::new(bob_connector.clone()),
        Arc::new(bob_handler.clone()),
    )
    .await
    .expect("bob connects");

    // Alice offers on the join notice, Bob answers, Alice applies it.
    assert!(alice_connector.wait_for_connections(1, 5000).await);
    let (_, alice_peer) = alice_connector.connection(0).await.unwrap();
    assert!(
        alice_peer
            .wait_for_call(&PeerCall::SetRemote(SdpType::Answer), 5000)
            .await
    );

    let (bob_sink, bob_peer) = bob_connector.connection(0).await.unwrap();
    assert_eq!(bob_sink.remote(), alice.local_id());
    assert_eq!(bob_peer.count(&PeerCall::SetLocal(SdpType::Answer)).await, 1);

    bob.send_chat_message("hi alice").await.unwrap();
    assert!(alice_handler.wait_for_events(1, 5000).await);
    let chats = alice_handler.chats().await;
    assert_eq!(chats[0].text, "hi alice");
    assert_eq!(&chats[0].from, bob.local_id());

    // Bob leaving reaches Alice as user_left.
    bob.leave().await.unwrap();
    bob_task.await.unwrap();
    assert!(alice_handler.wait_for_events(2, 5000).await);
    assert!(bob_handler.failures().await.is_empty());

    alice.leave().await.unwrap();
    alice_task.await.unwrap();
    assert!(
        !alice_handler
            .failures()
            .await
            .contains(&SessionFailure::Closed)
    );
}
