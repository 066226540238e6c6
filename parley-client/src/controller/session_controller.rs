use crate::channel::{ChannelEvent, ChannelEvents, SignalingChannel};
use crate::config::ClientConfig;
use crate::controller::{
    ChatMessage, SessionCommand, SessionContext, SessionFailure, SessionHandler,
};
use crate::error::ClientError;
use crate::media::{MediaConstraints, MediaSource, MediaTrack};
use crate::membership::{MembershipChange, RoomMembership};
use crate::negotiation::{
    CandidateOutcome, NegotiationError, NegotiationSession, NegotiationState, NegotiationStep,
    PeerConnector, PeerEvent, PeerEventKind, PeerEventSink,
};
use parley_core::{
    Envelope, EventKind, IceCandidate, ParticipantId, ProtocolError, SessionDescription, Signal,
    SignalEnvelope,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

const COMMAND_CAPACITY: usize = 64;

/// Cloneable handle for local user actions on a running controller.
#[derive(Clone)]
pub struct SessionHandle {
    local_id: ParticipantId,
    command_tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub fn local_id(&self) -> &ParticipantId {
        &self.local_id
    }

    pub async fn send_chat_message(&self, text: impl Into<String>) -> Result<(), ClientError> {
        self.command(SessionCommand::Chat(text.into())).await
    }

    pub async fn leave(&self) -> Result<(), ClientError> {
        self.command(SessionCommand::Leave).await
    }

    async fn command(&self, cmd: SessionCommand) -> Result<(), ClientError> {
        self.command_tx
            .send(cmd)
            .await
            .map_err(|_| ClientError::SessionClosed)
    }
}

/// Owns the signaling channel and the single peer session of a room.
///
/// Every input (socket events, peer connection events, local commands) is
/// processed to completion before the next one is taken, so messages for a
/// peer are applied strictly in arrival order.
pub struct SessionController {
    ctx: SessionContext,
    channel: SignalingChannel,
    channel_events: ChannelEvents,
    command_rx: mpsc::Receiver<SessionCommand>,
    peer_tx: mpsc::UnboundedSender<PeerEvent>,
    peer_rx: mpsc::UnboundedReceiver<PeerEvent>,
    connector: Arc<dyn PeerConnector>,
    handler: Arc<dyn SessionHandler>,
    membership: RoomMembership,
    tracks: Vec<MediaTrack>,
    session: Option<NegotiationSession>,
    next_epoch: u64,
}

impl SessionController {
    pub fn new(
        ctx: SessionContext,
        channel: SignalingChannel,
        channel_events: ChannelEvents,
        connector: Arc<dyn PeerConnector>,
        handler: Arc<dyn SessionHandler>,
    ) -> (Self, SessionHandle) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
        let (peer_tx, peer_rx) = mpsc::unbounded_channel();

        let handle = SessionHandle {
            local_id: ctx.local_id.clone(),
            command_tx,
        };

        let controller = Self {
            membership: RoomMembership::new(ctx.local_id.clone()),
            ctx,
            channel,
            channel_events,
            command_rx,
            peer_tx,
            peer_rx,
            connector,
            handler,
            tracks: Vec::new(),
            session: None,
            next_epoch: 0,
        };

        (controller, handle)
    }

    /// Acquires local media, connects to the signaling server and spawns the
    /// controller loop.
    pub async fn connect(
        config: ClientConfig,
        media: &dyn MediaSource,
        constraints: MediaConstraints,
        connector: Arc<dyn PeerConnector>,
        handler: Arc<dyn SessionHandler>,
    ) -> Result<(SessionHandle, JoinHandle<()>), ClientError> {
        let tracks = match media.acquire(&constraints).await {
            Ok(tracks) => tracks,
            Err(e) => {
                error!("Media access error: {}", e);
                handler.on_failure(SessionFailure::Media(e.clone())).await;
                return Err(ClientError::Media(e));
            }
        };

        let ctx = SessionContext::new(config.room);
        let (channel, events) = SignalingChannel::connect(config.url);
        let (controller, handle) = Self::new(ctx, channel, events, connector, handler);

        let task = tokio::spawn(controller.start(tracks));
        Ok((handle, task))
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    /// Runs until the channel closes or the user leaves. `tracks` are bound
    /// into every peer session this controller opens.
    pub async fn start(mut self, tracks: Vec<MediaTrack>) {
        self.tracks = tracks;
        info!(
            "Session controller started: {} in room {}",
            self.ctx.local_id, self.ctx.room
        );

        loop {
            tokio::select! {
                evt = self.channel_events.recv() => match evt {
                    Some(ChannelEvent::Open) => self.handle_open(),
                    Some(ChannelEvent::Message(envelope)) => self.handle_envelope(envelope).await,
                    Some(ChannelEvent::Error(reason)) => {
                        self.shutdown(Some(SessionFailure::Transport(reason))).await;
                        break;
                    }
                    Some(ChannelEvent::Closed) | None => {
                        self.shutdown(Some(SessionFailure::Closed)).await;
                        break;
                    }
                },

                cmd = self.command_rx.recv() => match cmd {
                    Some(SessionCommand::Chat(text)) => self.send_chat(text).await,
                    Some(SessionCommand::Leave) | None => {
                        info!("Leaving room {}", self.ctx.room);
                        self.shutdown(None).await;
                        break;
                    }
                },

                Some(evt) = self.peer_rx.recv() => self.handle_peer_event(evt).await,
            }
        }

        info!("Session controller finished");
    }

    fn handle_open(&self) {
        info!("Signaling channel open, joining {}", self.ctx.room);
        self.send_signal(None, Signal::Join);
    }

    async fn handle_envelope(&mut self, envelope: Envelope) {
        if envelope.room != self.ctx.room {
            debug!("Ignoring {} for room {}", envelope.event, envelope.room);
            return;
        }

        if envelope.from == self.ctx.local_id {
            debug!("Suppressing echo of our own {}", envelope.event);
            return;
        }

        let event = envelope.event;
        let from = envelope.from.clone();
        let to = envelope.to.clone();

        let signal = match SignalEnvelope::try_from(envelope) {
            Ok(signal) => signal,
            Err(e) => {
                self.handle_malformed(event, from, to, e).await;
                return;
            }
        };

        debug!("Received {} from {}", event, from);
        let SignalEnvelope { from, to, signal, .. } = signal;

        match signal {
            Signal::UserJoined(_) | Signal::UserLeft(_) => {
                if let Some(change) = self.membership.observe(&from, &signal) {
                    self.apply_membership(change).await;
                }
            }
            Signal::Offer(offer) => self.handle_offer(from, to, offer).await,
            Signal::Answer(answer) => self.handle_answer(from, to, answer).await,
            Signal::IceCandidate(candidate) => self.handle_candidate(from, to, candidate).await,
            Signal::Message(text) => {
                let message = ChatMessage {
                    from,
                    text,
                    local: false,
                };
                self.handler.on_chat_message(message).await;
            }
            Signal::CameraFrame(frame) => {
                if from.is_server_camera() {
                    self.handler.on_camera_frame(frame).await;
                } else {
                    warn!("Ignoring camera frame from {}", from);
                }
            }
            Signal::Join => debug!("Ignoring join relayed from {}", from),
        }
    }

    async fn handle_malformed(
        &mut self,
        event: EventKind,
        from: ParticipantId,
        to: Option<ParticipantId>,
        err: ProtocolError,
    ) {
        let session_state = self
            .session
            .as_ref()
            .map(|s| (s.remote() == &from, s.state()));

        // Fatal only where a well-formed copy would have been applied.
        let fatal = match event {
            EventKind::Offer => {
                to.as_ref().is_none_or(|to| *to == self.ctx.local_id)
                    && matches!(session_state, None | Some((true, NegotiationState::Idle)))
            }
            EventKind::Answer => {
                to.as_ref() == Some(&self.ctx.local_id)
                    && session_state == Some((true, NegotiationState::Offered))
            }
            _ => false,
        };

        if !fatal {
            warn!("Dropping malformed {} from {}: {}", event, from, err);
            return;
        }

        error!("Malformed {} from {}: {}", event, from, err);
        if let Some(session) = self.session.as_mut().filter(|s| *s.remote() == from) {
            session.fail();
        }
        self.handler
            .on_failure(SessionFailure::Negotiation {
                peer: from,
                reason: err.to_string(),
            })
            .await;
    }

    async fn apply_membership(&mut self, change: MembershipChange) {
        match change {
            MembershipChange::PeerPresent(peer) => {
                info!("Peer {} is present, creating offer", peer);

                let Some(session) = self.session_for(&peer).await else {
                    return;
                };
                if session.state() != NegotiationState::Idle {
                    debug!("Already negotiating with {} ({})", peer, session.state());
                    return;
                }

                match session.initiate().await {
                    Ok(offer) => {
                        self.send_signal(None, Signal::Offer(offer));
                    }
                    Err(e) => self.negotiation_failed(peer, e).await,
                }
            }

            MembershipChange::PeerLeft(peer) => {
                info!("Peer {} left", peer);

                match self.session.take_if(|s| *s.remote() == peer) {
                    Some(session) => {
                        session.close().await;
                        self.handler.on_peer_left(&peer).await;
                    }
                    None => debug!("No session with {} to tear down", peer),
                }
            }
        }
    }

    async fn handle_offer(
        &mut self,
        from: ParticipantId,
        to: Option<ParticipantId>,
        offer: SessionDescription,
    ) {
        if !to.as_ref().is_none_or(|to| *to == self.ctx.local_id) {
            debug!("Offer from {} is addressed to someone else", from);
            return;
        }

        let Some(session) = self.session_for(&from).await else {
            return;
        };

        match session.accept_offer(offer).await {
            Ok(Some(answer)) => {
                self.send_signal(Some(from), Signal::Answer(answer));
            }
            Ok(None) => {}
            Err(e) => self.negotiation_failed(from, e).await,
        }
    }

    async fn handle_answer(
        &mut self,
        from: ParticipantId,
        to: Option<ParticipantId>,
        answer: SessionDescription,
    ) {
        if to.as_ref() != Some(&self.ctx.local_id) {
            debug!("Answer from {} is not addressed to us", from);
            return;
        }

        let Some(session) = self.session.as_mut().filter(|s| *s.remote() == from) else {
            warn!("Answer from {} without a matching session", from);
            return;
        };

        if let Err(e) = session.accept_answer(answer).await {
            self.negotiation_failed(from, e).await;
        }
    }

    async fn handle_candidate(
        &mut self,
        from: ParticipantId,
        to: Option<ParticipantId>,
        candidate: IceCandidate,
    ) {
        if !to.as_ref().is_none_or(|to| *to == self.ctx.local_id) {
            return;
        }

        let Some(session) = self.session_for(&from).await else {
            return;
        };

        match session.add_remote_candidate(candidate).await {
            CandidateOutcome::Applied => debug!("Applied ICE candidate from {}", from),
            CandidateOutcome::Queued => debug!("Buffered ICE candidate from {}", from),
            CandidateOutcome::Dropped => {}
        }
    }

    async fn handle_peer_event(&mut self, evt: PeerEvent) {
        let Some(session) = self.session.as_mut() else {
            debug!("Dropping peer event for {}: no session", evt.remote);
            return;
        };
        if session.epoch() != evt.epoch || *session.remote() != evt.remote {
            debug!("Dropping peer event from torn-down session {}", evt.epoch);
            return;
        }

        match evt.kind {
            PeerEventKind::IceCandidate(candidate) => {
                self.send_signal(Some(evt.remote), Signal::IceCandidate(candidate));
            }
            PeerEventKind::Track(track) => {
                info!("Remote {:?} track from {}", track.kind, evt.remote);
                self.handler.on_remote_track(&evt.remote, track).await;
            }
            PeerEventKind::IceState(ice) => match session.on_ice_state(ice) {
                Some(NegotiationState::Connected) => {
                    self.handler.on_established(&evt.remote).await;
                }
                Some(NegotiationState::Failed) => {
                    self.handler
                        .on_failure(SessionFailure::Negotiation {
                            peer: evt.remote,
                            reason: "ICE connection failed".into(),
                        })
                        .await;
                }
                _ => {}
            },
        }
    }

    async fn send_chat(&mut self, text: String) {
        let text = text.trim().to_owned();
        if text.is_empty() {
            return;
        }

        let echo = ChatMessage {
            from: self.ctx.local_id.clone(),
            text: text.clone(),
            local: true,
        };
        self.handler.on_chat_message(echo).await;

        if !self.send_signal(None, Signal::Message(text)) {
            warn!("Chat message not delivered: signaling channel is not open");
        }
    }

    /// Session for `peer`, opening one if no session exists yet.
    async fn session_for(&mut self, peer: &ParticipantId) -> Option<&mut NegotiationSession> {
        if let Some(session) = &self.session {
            if session.remote() != peer {
                warn!(
                    "Ignoring {} while negotiating with {}",
                    peer,
                    session.remote()
                );
                return None;
            }
        } else {
            match self.open_session(peer).await {
                Ok(session) => self.session = Some(session),
                Err(e) => {
                    self.negotiation_failed(peer.clone(), e).await;
                    return None;
                }
            }
        }
        self.session.as_mut()
    }

    async fn open_session(
        &mut self,
        peer: &ParticipantId,
    ) -> Result<NegotiationSession, NegotiationError> {
        let epoch = self.next_epoch;
        self.next_epoch += 1;

        let sink = PeerEventSink::new(peer.clone(), epoch, self.peer_tx.clone());
        let connection = self
            .connector
            .connect(sink)
            .await
            .map_err(|e| NegotiationError::platform(NegotiationStep::Connect, e))?;

        NegotiationSession::open(peer.clone(), epoch, connection, &self.tracks).await
    }

    async fn negotiation_failed(&mut self, peer: ParticipantId, err: NegotiationError) {
        error!("Negotiation with {} failed: {}", peer, err);
        self.handler
            .on_failure(SessionFailure::Negotiation {
                peer,
                reason: err.to_string(),
            })
            .await;
    }

    fn send_signal(&self, to: Option<ParticipantId>, signal: Signal) -> bool {
        let signal = SignalEnvelope {
            room: self.ctx.room.clone(),
            from: self.ctx.local_id.clone(),
            to,
            signal,
        };

        match signal.into_envelope() {
            Ok(envelope) => self.channel.send(&envelope),
            Err(e) => {
                error!("Failed to encode outbound envelope: {}", e);
                false
            }
        }
    }

    async fn shutdown(&mut self, failure: Option<SessionFailure>) {
        if let Some(session) = self.session.take() {
            session.close().await;
        }
        self.channel.close();

        if let Some(failure) = failure {
            error!("Session ended: {}", failure);
            self.handler.on_failure(failure).await;
        }
    }
}
