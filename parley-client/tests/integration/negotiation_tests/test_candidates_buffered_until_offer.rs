use parley_core::{EventKind, SdpType};

use crate::integration::{candidate_json, init_tracing, offer_json, spawn_session};
use crate::utils::{MockPeerConnector, PeerCall};

#[tokio::test]
async fn test_candidates_buffered_until_offer() {
    init_tracing();

    let mut session = spawn_session("bob", MockPeerConnector::new()).await;

    let first = candidate_json("candidate:1 1 udp 1 192.0.2.1 5000 typ host");
    let second = candidate_json("candidate:2 1 udp 1 192.0.2.2 5000 typ host");
    session.deliver(EventKind::IceCandidate, "alice", Some("bob"), &first);
    session.deliver(EventKind::IceCandidate, "alice", Some("bob"), &second);
    session.deliver(EventKind::Offer, "alice", None, &offer_json());

    let answer = session.next_sent(2000).await.expect("answer");
    assert_eq!(answer.event, EventKind::Answer);
    assert_eq!(answer.from.as_str(), "bob");
    assert_eq!(answer.to.as_ref().map(|to| to.as_str()), Some("alice"));

    let (_, peer) = session.connector.connection(0).await.unwrap();
    let calls = peer.calls().await;
    let negotiation: Vec<_> = calls
        .into_iter()
        .filter(|c| !matches!(c, PeerCall::AddTrack(_)))
        .collect();

    assert_eq!(
        negotiation,
        vec![
            PeerCall::SetRemote(SdpType::Offer),
            PeerCall::AddIce("candidate:1 1 udp 1 192.0.2.1 5000 typ host".into()),
            PeerCall::AddIce("candidate:2 1 udp 1 192.0.2.2 5000 typ host".into()),
            PeerCall::CreateAnswer,
            PeerCall::SetLocal(SdpType::Answer),
        ]
    );
    assert_eq!(session.connector.connections().await, 1);
}

#[tokio::test]
async fn test_duplicate_and_end_of_candidates_are_dropped() {
    init_tracing();

    let mut session = spawn_session("bob", MockPeerConnector::new()).await;
    session.deliver(EventKind::Offer, "alice", None, &offer_json());
    session.next_sent(2000).await.expect("answer");

    let line = "candidate:1 1 udp 1 192.0.2.1 5000 typ host";
    session.deliver(EventKind::IceCandidate, "alice", None, &candidate_json(line));
    session.deliver(EventKind::IceCandidate, "alice", None, &candidate_json(line));
    session.deliver(EventKind::IceCandidate, "alice", None, &candidate_json(""));
    session.settle().await;

    let (_, peer) = session.connector.connection(0).await.unwrap();
    assert_eq!(peer.count(&PeerCall::AddIce(line.into())).await, 1);
    assert_eq!(peer.count(&PeerCall::AddIce(String::new())).await, 0);
}

#[tokio::test]
async fn test_candidate_for_someone_else_is_ignored() {
    init_tracing();

    let session = spawn_session("bob", MockPeerConnector::new()).await;
    let line = "candidate:1 1 udp 1 192.0.2.1 5000 typ host";
    session.deliver(
        EventKind::IceCandidate,
        "alice",
        Some("carol"),
        &candidate_json(line),
    );
    session.settle().await;

    assert_eq!(session.connector.connections().await, 0);
}
