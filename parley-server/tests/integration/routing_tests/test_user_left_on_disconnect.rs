use parley_core::{EventKind, ParticipantId, RoomId};

use crate::integration::{init_tracing, joined_client, spawn_relay};

#[tokio::test]
async fn test_disconnect_announces_user_left() {
    init_tracing();

    let (url, relay) = spawn_relay().await;
    let mut alice = joined_client(&url, &relay, "alice").await;
    let bob = joined_client(&url, &relay, "bob").await;
    alice.recv(2000).await.expect("bob joined");

    bob.close().await.expect("close bob");

    let notice = alice.recv(2000).await.expect("user_left");
    assert_eq!(notice.event, EventKind::UserLeft);
    assert!(notice.from.is_server());
    assert_eq!(notice.data, "bob");

    assert!(!relay.is_joined(&ParticipantId::from("bob")));
    assert_eq!(relay.participants(&RoomId::default()), 1);
}
