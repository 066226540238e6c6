use parley_core::{EventKind, SdpType};

use crate::integration::{answer_json, init_tracing, spawn_session};
use crate::utils::{MockPeerConnector, PeerCall};

#[tokio::test]
async fn test_duplicate_answer_applied_once() {
    init_tracing();

    let mut session = spawn_session("alice", MockPeerConnector::new()).await;
    session.server_notice(EventKind::UserJoined, "bob");
    let offer = session.next_sent(2000).await.expect("offer");
    assert_eq!(offer.event, EventKind::Offer);

    session.deliver(EventKind::Answer, "bob", Some("alice"), &answer_json());
    session.deliver(EventKind::Answer, "bob", Some("alice"), &answer_json());
    session.settle().await;

    let (_, peer) = session.connector.connection(0).await.unwrap();
    assert_eq!(peer.count(&PeerCall::SetRemote(SdpType::Answer)).await, 1);
    assert!(session.handler.failures().await.is_empty());
}

#[tokio::test]
async fn test_answer_for_someone_else_is_ignored() {
    init_tracing();

    let mut session = spawn_session("alice", MockPeerConnector::new()).await;
    session.server_notice(EventKind::UserJoined, "bob");
    session.next_sent(2000).await.expect("offer");

    session.deliver(EventKind::Answer, "bob", Some("carol"), &answer_json());
    session.deliver(EventKind::Answer, "bob", None, &answer_json());
    session.settle().await;

    let (_, peer) = session.connector.connection(0).await.unwrap();
    assert_eq!(peer.count(&PeerCall::SetRemote(SdpType::Answer)).await, 0);
}
