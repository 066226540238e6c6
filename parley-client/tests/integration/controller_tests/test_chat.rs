use parley_client::ChatMessage;
use parley_core::{EventKind, ParticipantId, RoomId};

use crate::integration::{init_tracing, spawn_session, spawn_session_closed};
use crate::utils::MockPeerConnector;

#[tokio::test]
async fn test_chat_is_echoed_locally_and_broadcast() {
    init_tracing();

    let mut session = spawn_session("alice", MockPeerConnector::new()).await;
    session
        .handle
        .send_chat_message("  hello room  ")
        .await
        .unwrap();

    let sent = session.next_sent(2000).await.expect("chat");
    assert_eq!(sent.event, EventKind::Message);
    assert_eq!(sent.room, RoomId::default());
    assert_eq!(sent.to, None);
    assert_eq!(sent.data, "hello room");

    assert_eq!(
        session.handler.chats().await,
        vec![ChatMessage {
            from: ParticipantId::from("alice"),
            text: "hello room".into(),
            local: true,
        }]
    );
}

#[tokio::test]
async fn test_blank_chat_is_ignored() {
    init_tracing();

    let session = spawn_session("alice", MockPeerConnector::new()).await;
    session.handle.send_chat_message("   ").await.unwrap();
    session.handle.send_chat_message("x").await.unwrap();

    assert!(session.handler.wait_for_events(1, 2000).await);
    let chats = session.handler.chats().await;
    assert_eq!(chats.len(), 1);
    assert_eq!(chats[0].text, "x");
}

#[tokio::test]
async fn test_chat_while_offline_still_echoes() {
    init_tracing();

    let mut session = spawn_session_closed("alice", MockPeerConnector::new());
    session.handle.send_chat_message("anyone?").await.unwrap();

    assert!(session.handler.wait_for_events(1, 2000).await);
    assert_eq!(session.handler.chats().await[0].text, "anyone?");
    assert!(session.transport.drain_sent().is_empty());
}

#[tokio::test]
async fn test_remote_chat_and_own_echo() {
    init_tracing();

    let session = spawn_session("alice", MockPeerConnector::new()).await;
    session.deliver(EventKind::Message, "alice", None, "my own line");
    session.deliver(EventKind::Message, "bob", None, "hi alice");
    session.settle().await;

    let chats = session.handler.chats().await;
    assert_eq!(chats[0].from.as_str(), "bob");
    assert_eq!(chats[0].text, "hi alice");
    assert!(!chats[0].local);
    assert!(chats.iter().all(|c| c.text != "my own line"));
}

#[tokio::test]
async fn test_other_room_is_ignored() {
    init_tracing();

    let session = spawn_session("alice", MockPeerConnector::new()).await;
    let mut foreign = crate::integration::envelope(EventKind::Message, "bob", None, "psst");
    foreign.room = RoomId::from("another-room");
    session.transport.deliver(foreign);
    session.settle().await;

    assert!(session.handler.chats().await.iter().all(|c| c.text != "psst"));
}
