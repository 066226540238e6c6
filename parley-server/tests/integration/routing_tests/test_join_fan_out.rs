use parley_core::EventKind;

use crate::integration::{init_tracing, joined_client, spawn_relay};

#[tokio::test]
async fn test_join_is_announced_to_existing_participants() {
    init_tracing();

    let (url, relay) = spawn_relay().await;
    let mut alice = joined_client(&url, &relay, "alice").await;
    let mut bob = joined_client(&url, &relay, "bob").await;

    let notice = alice.recv(2000).await.expect("alice should hear about bob");
    assert_eq!(notice.event, EventKind::UserJoined);
    assert!(notice.from.is_server());
    assert_eq!(notice.data, "bob");
    assert_eq!(notice.to, None);

    // The joiner gets no notice about itself.
    assert!(bob.is_quiet(200).await);
}
