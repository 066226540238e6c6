use parley_core::EventKind;

use crate::integration::{init_tracing, offer_json, spawn_session};
use crate::utils::{MockPeerConnector, PeerCall};

#[tokio::test]
async fn test_offer_while_offered_is_ignored() {
    init_tracing();

    let mut session = spawn_session("alice", MockPeerConnector::new()).await;
    session.server_notice(EventKind::UserJoined, "bob");
    session.next_sent(2000).await.expect("offer");

    session.deliver(EventKind::Offer, "bob", None, &offer_json());
    session.settle().await;

    let (_, peer) = session.connector.connection(0).await.unwrap();
    assert_eq!(peer.count(&PeerCall::CreateAnswer).await, 0);
    assert!(session.transport.drain_sent().is_empty());
    assert!(session.handler.failures().await.is_empty());
}
