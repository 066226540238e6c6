/// Local user actions delivered to a running controller.
#[derive(Debug)]
pub enum SessionCommand {
    /// Send a chat line to the room (echoed locally first).
    Chat(String),

    /// Tear down the peer session and close the signaling channel.
    Leave,
}
