use parley_client::SessionFailure;
use parley_core::{EventKind, ParticipantId};

use crate::integration::{init_tracing, offer_json, spawn_session};
use crate::utils::{MockFailures, MockPeerConnector, PeerCall};

#[tokio::test]
async fn test_set_remote_failure_is_terminal_for_peer() {
    init_tracing();

    let connector = MockPeerConnector::failing(MockFailures {
        set_remote: true,
        ..Default::default()
    });
    let mut session = spawn_session("bob", connector).await;

    session.deliver(EventKind::Offer, "alice", None, &offer_json());
    assert!(session.handler.wait_for_events(1, 2000).await);

    let failures = session.handler.failures().await;
    assert!(matches!(
        failures.as_slice(),
        [SessionFailure::Negotiation { peer, .. }] if *peer == ParticipantId::from("alice")
    ));

    let (_, peer) = session.connector.connection(0).await.unwrap();
    assert_eq!(peer.count(&PeerCall::CreateAnswer).await, 0);

    // Chat keeps working after the peer session failed.
    session
        .handle
        .send_chat_message("still here")
        .await
        .unwrap();
    let chat = session.next_sent(2000).await.expect("chat");
    assert_eq!(chat.event, EventKind::Message);
    assert_eq!(chat.data, "still here");
}

#[tokio::test]
async fn test_malformed_offer_reports_failure() {
    init_tracing();

    let session = spawn_session("bob", MockPeerConnector::new()).await;
    session.deliver(EventKind::Offer, "alice", None, "{not json");

    assert!(session.handler.wait_for_events(1, 2000).await);
    assert!(matches!(
        session.handler.failures().await.as_slice(),
        [SessionFailure::Negotiation { .. }]
    ));
    assert_eq!(session.connector.connections().await, 0);
}

#[tokio::test]
async fn test_connect_failure_reports_failure() {
    init_tracing();

    let connector = MockPeerConnector::failing(MockFailures {
        connect: true,
        ..Default::default()
    });
    let session = spawn_session("alice", connector).await;
    session.server_notice(EventKind::UserJoined, "bob");

    assert!(session.handler.wait_for_events(1, 2000).await);
    assert!(matches!(
        session.handler.failures().await.as_slice(),
        [SessionFailure::Negotiation { peer, .. }] if peer.as_str() == "bob"
    ));
}
