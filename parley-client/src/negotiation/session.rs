use crate::media::MediaTrack;
use crate::negotiation::{
    IceConnectionState, NegotiationError, NegotiationState, NegotiationStep, PeerConnection,
};
use parley_core::{IceCandidate, ParticipantId, SessionDescription};
use std::collections::{HashSet, VecDeque};
use tracing::{debug, error, info, warn};

/// What happened to a remote candidate handed to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateOutcome {
    Applied,
    /// Held until the remote description is set.
    Queued,
    Dropped,
}

type CandidateKey = (String, Option<String>, Option<u16>);

/// Offer/answer state for one remote peer.
///
/// Candidates that arrive before the remote description are buffered and
/// applied in arrival order as soon as it is set.
pub struct NegotiationSession {
    remote: ParticipantId,
    epoch: u64,
    state: NegotiationState,
    connection: Box<dyn PeerConnection>,
    local_description: Option<SessionDescription>,
    remote_description: Option<SessionDescription>,
    pending_candidates: VecDeque<IceCandidate>,
    seen_candidates: HashSet<CandidateKey>,
}

impl NegotiationSession {
    /// Wraps a fresh connection and binds the local tracks into it.
    pub async fn open(
        remote: ParticipantId,
        epoch: u64,
        connection: Box<dyn PeerConnection>,
        tracks: &[MediaTrack],
    ) -> Result<Self, NegotiationError> {
        for track in tracks {
            if let Err(e) = connection.add_track(track).await {
                let _ = connection.close().await;
                return Err(NegotiationError::platform(NegotiationStep::AddTrack, e));
            }
        }

        debug!(
            "Opened negotiation session {} with {} ({} local tracks)",
            epoch,
            remote,
            tracks.len()
        );

        Ok(Self {
            remote,
            epoch,
            state: NegotiationState::Idle,
            connection,
            local_description: None,
            remote_description: None,
            pending_candidates: VecDeque::new(),
            seen_candidates: HashSet::new(),
        })
    }

    pub fn remote(&self) -> &ParticipantId {
        &self.remote
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    pub fn local_description(&self) -> Option<&SessionDescription> {
        self.local_description.as_ref()
    }

    pub fn remote_description(&self) -> Option<&SessionDescription> {
        self.remote_description.as_ref()
    }

    pub fn pending_candidates(&self) -> usize {
        self.pending_candidates.len()
    }

    /// `Idle -> Offered`. Returns the offer to broadcast.
    pub async fn initiate(&mut self) -> Result<SessionDescription, NegotiationError> {
        if self.state != NegotiationState::Idle {
            return Err(NegotiationError::InvalidTransition {
                action: "initiate an offer",
                state: self.state,
            });
        }

        let result = self.connection.create_offer().await;
        let offer = result.map_err(|e| self.fail_with(NegotiationStep::CreateOffer, e))?;

        let result = self.connection.set_local_description(offer.clone()).await;
        result.map_err(|e| self.fail_with(NegotiationStep::SetLocalDescription, e))?;

        self.local_description = Some(offer.clone());
        self.state = NegotiationState::Offered;
        info!("Offer created for {}", self.remote);

        Ok(offer)
    }

    /// `Idle -> Answered`. Returns the answer to send back, or `None` when
    /// the offer is ignored.
    pub async fn accept_offer(
        &mut self,
        offer: SessionDescription,
    ) -> Result<Option<SessionDescription>, NegotiationError> {
        match self.state {
            NegotiationState::Idle => {}
            NegotiationState::Offered => {
                // Glare: both sides offered. No tie-break, ours stays outstanding.
                warn!(
                    "Offer from {} while our own offer is outstanding, ignoring",
                    self.remote
                );
                return Ok(None);
            }
            state => {
                debug!("Ignoring offer from {} in state {}", self.remote, state);
                return Ok(None);
            }
        }

        let result = self
            .connection
            .set_remote_description(offer.clone())
            .await;
        result.map_err(|e| self.fail_with(NegotiationStep::SetRemoteDescription, e))?;
        self.remote_description = Some(offer);

        self.drain_candidates().await;

        let result = self.connection.create_answer().await;
        let answer = result.map_err(|e| self.fail_with(NegotiationStep::CreateAnswer, e))?;

        let result = self.connection.set_local_description(answer.clone()).await;
        result.map_err(|e| self.fail_with(NegotiationStep::SetLocalDescription, e))?;

        self.local_description = Some(answer.clone());
        self.state = NegotiationState::Answered;
        info!("Answer created for {}", self.remote);

        Ok(Some(answer))
    }

    /// `Offered -> Answered`. Returns `false` when the answer is ignored
    /// (duplicate or unsolicited).
    pub async fn accept_answer(
        &mut self,
        answer: SessionDescription,
    ) -> Result<bool, NegotiationError> {
        match self.state {
            NegotiationState::Offered => {}
            NegotiationState::Answered | NegotiationState::Connected => {
                debug!("Duplicate answer from {} ignored", self.remote);
                return Ok(false);
            }
            state => {
                warn!("Unexpected answer from {} in state {}", self.remote, state);
                return Ok(false);
            }
        }

        let result = self
            .connection
            .set_remote_description(answer.clone())
            .await;
        result.map_err(|e| self.fail_with(NegotiationStep::SetRemoteDescription, e))?;

        self.remote_description = Some(answer);
        self.state = NegotiationState::Answered;
        info!("Answer from {} applied", self.remote);

        self.drain_candidates().await;
        Ok(true)
    }

    /// Applies or buffers a candidate received from the remote side.
    ///
    /// Never fails the session: bad and duplicate candidates are dropped.
    pub async fn add_remote_candidate(&mut self, candidate: IceCandidate) -> CandidateOutcome {
        if self.state == NegotiationState::Failed {
            return CandidateOutcome::Dropped;
        }

        if candidate.is_end_of_candidates() {
            debug!("End of candidates from {}", self.remote);
            return CandidateOutcome::Dropped;
        }

        if !self.seen_candidates.insert(candidate.identity()) {
            warn!("Duplicate ICE candidate from {} dropped", self.remote);
            return CandidateOutcome::Dropped;
        }

        if self.remote_description.is_none() {
            self.pending_candidates.push_back(candidate);
            debug!(
                "Queued ICE candidate from {} ({} pending)",
                self.remote,
                self.pending_candidates.len()
            );
            return CandidateOutcome::Queued;
        }

        self.apply_candidate(candidate).await
    }

    /// Feeds a connectivity change in. Returns the new state when it moved.
    pub fn on_ice_state(&mut self, ice: IceConnectionState) -> Option<NegotiationState> {
        debug!("ICE state for {}: {:?}", self.remote, ice);

        match ice {
            IceConnectionState::Connected | IceConnectionState::Completed
                if self.state == NegotiationState::Answered =>
            {
                self.state = NegotiationState::Connected;
                info!("Session with {} established", self.remote);
                Some(NegotiationState::Connected)
            }
            IceConnectionState::Failed if self.state != NegotiationState::Failed => {
                error!("ICE failed for {}", self.remote);
                self.fail();
                Some(NegotiationState::Failed)
            }
            _ => None,
        }
    }

    pub fn fail(&mut self) {
        self.state = NegotiationState::Failed;
        self.pending_candidates.clear();
    }

    /// Tears the session down, discarding buffered candidates.
    pub async fn close(mut self) {
        let discarded = self.pending_candidates.len();
        self.pending_candidates.clear();

        if let Err(e) = self.connection.close().await {
            warn!("Failed to close peer connection for {}: {:?}", self.remote, e);
        }
        debug!(
            "Closed session {} with {} ({} buffered candidates discarded)",
            self.epoch, self.remote, discarded
        );
    }

    async fn drain_candidates(&mut self) {
        while let Some(candidate) = self.pending_candidates.pop_front() {
            self.apply_candidate(candidate).await;
        }
    }

    async fn apply_candidate(&mut self, candidate: IceCandidate) -> CandidateOutcome {
        match self.connection.add_ice_candidate(candidate).await {
            Ok(()) => CandidateOutcome::Applied,
            Err(e) => {
                warn!("Failed to add ICE candidate for {}: {:?}", self.remote, e);
                CandidateOutcome::Dropped
            }
        }
    }

    fn fail_with(&mut self, step: NegotiationStep, err: anyhow::Error) -> NegotiationError {
        error!("Negotiation with {} failed: {} ({:#})", self.remote, step, err);
        self.fail();
        NegotiationError::platform(step, err)
    }
}
