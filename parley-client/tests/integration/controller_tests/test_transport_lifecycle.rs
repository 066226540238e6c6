use parley_client::SessionFailure;
use parley_core::{EventKind, RoomId};
use std::time::Duration;

use crate::integration::{init_tracing, spawn_session, spawn_session_closed};
use crate::utils::{MockPeerConnector, PeerCall};

#[tokio::test]
async fn test_join_sent_when_channel_opens() {
    init_tracing();

    let mut session = spawn_session_closed("alice", MockPeerConnector::new());
    session.transport.open();

    let join = session.next_sent(2000).await.expect("join");
    assert_eq!(join.event, EventKind::Join);
    assert_eq!(join.from.as_str(), "alice");
    assert_eq!(join.room, RoomId::default());
    assert_eq!(join.to, None);
}

#[tokio::test]
async fn test_transport_error_is_reported_once() {
    init_tracing();

    let session = spawn_session("alice", MockPeerConnector::new()).await;
    session.transport.fail("connection reset");

    tokio::time::timeout(Duration::from_secs(2), session.task)
        .await
        .expect("controller should stop")
        .unwrap();

    assert_eq!(
        session.handler.failures().await,
        vec![SessionFailure::Transport("connection reset".into())]
    );
}

#[tokio::test]
async fn test_close_tears_down_peer_session() {
    init_tracing();

    let mut session = spawn_session("alice", MockPeerConnector::new()).await;
    session.server_notice(EventKind::UserJoined, "bob");
    session.next_sent(2000).await.expect("offer");

    session.transport.close();
    tokio::time::timeout(Duration::from_secs(2), session.task)
        .await
        .expect("controller should stop")
        .unwrap();

    assert_eq!(session.handler.failures().await, vec![SessionFailure::Closed]);
    let (_, peer) = session.connector.connection(0).await.unwrap();
    assert_eq!(peer.count(&PeerCall::Close).await, 1);
}

#[tokio::test]
async fn test_leave_closes_channel_without_failure() {
    init_tracing();

    let mut session = spawn_session("alice", MockPeerConnector::new()).await;
    session.handle.leave().await.unwrap();

    tokio::time::timeout(Duration::from_secs(2), session.task)
        .await
        .expect("controller should stop")
        .unwrap();

    session.transport.drain_sent();
    assert!(session.transport.closed_by_client());
    assert!(session.handler.failures().await.is_empty());
    assert!(session.handle.send_chat_message("late").await.is_err());
}
