use parley_client::IceConnectionState;
use parley_core::{EventKind, ParticipantId, SdpType};

use crate::integration::{answer_json, init_tracing, offer_json, spawn_session};
use crate::utils::{HandlerEvent, MockPeerConnector, PeerCall};

#[tokio::test]
async fn test_malformed_duplicate_answer_keeps_connected_session() {
    init_tracing();

    let mut session = spawn_session("alice", MockPeerConnector::new()).await;
    session.server_notice(EventKind::UserJoined, "bob");
    session.next_sent(2000).await.expect("offer");
    session.deliver(EventKind::Answer, "bob", Some("alice"), &answer_json());
    session.settle().await;

    let (sink, peer) = session.connector.connection(0).await.unwrap();
    sink.ice_state(IceConnectionState::Connected);
    // barrier chat + established
    assert!(session.handler.wait_for_events(2, 2000).await);

    session.deliver(EventKind::Answer, "bob", Some("alice"), &answer_json());
    session.deliver(EventKind::Answer, "bob", Some("alice"), "{garbage");
    session.settle().await;

    assert!(session.handler.failures().await.is_empty());
    assert_eq!(peer.count(&PeerCall::SetRemote(SdpType::Answer)).await, 1);

    // Still live: a later ICE failure is reported, which a failed session would swallow.
    sink.ice_state(IceConnectionState::Failed);
    assert!(session.handler.wait_for_events(4, 2000).await);
    assert!(
        session
            .handler
            .get_events()
            .await
            .contains(&HandlerEvent::Established(ParticipantId::from("bob")))
    );
    assert_eq!(session.handler.failures().await.len(), 1);
}

#[tokio::test]
async fn test_malformed_offer_after_answering_is_dropped() {
    init_tracing();

    let mut session = spawn_session("bob", MockPeerConnector::new()).await;
    session.deliver(EventKind::Offer, "alice", None, &offer_json());
    session.next_sent(2000).await.expect("answer");

    session.deliver(EventKind::Offer, "alice", None, "{not json");
    session.settle().await;

    assert!(session.handler.failures().await.is_empty());
}

#[tokio::test]
async fn test_malformed_offer_from_third_peer_is_dropped() {
    init_tracing();

    let mut session = spawn_session("alice", MockPeerConnector::new()).await;
    session.server_notice(EventKind::UserJoined, "bob");
    session.next_sent(2000).await.expect("offer");

    session.deliver(EventKind::Offer, "carol", None, "{not json");
    session.settle().await;

    assert!(session.handler.failures().await.is_empty());
    assert_eq!(session.connector.connections().await, 1);
}

#[tokio::test]
async fn test_malformed_answer_while_offered_is_fatal() {
    init_tracing();

    let mut session = spawn_session("alice", MockPeerConnector::new()).await;
    session.server_notice(EventKind::UserJoined, "bob");
    session.next_sent(2000).await.expect("offer");

    session.deliver(EventKind::Answer, "bob", Some("alice"), "{garbage");
    assert!(session.handler.wait_for_events(1, 2000).await);

    // The failed session ignores the well-formed answer that follows.
    session.deliver(EventKind::Answer, "bob", Some("alice"), &answer_json());
    session.settle().await;

    let (_, peer) = session.connector.connection(0).await.unwrap();
    assert_eq!(peer.count(&PeerCall::SetRemote(SdpType::Answer)).await, 0);
    assert_eq!(session.handler.failures().await.len(), 1);
}
