//! Session use case implementation.
//!
//! `SessionUseCase` exposes the inbound actions of a rating round to the transport layer. Each
//! action runs as one read-modify-write cycle under the session's gate, is followed by a
//! completion evaluation where the ledger changed, and ends with fire-and-forget delivery of
//! events and revealed results.

use crate::session::{
    ConnectionDirectory, RevealDispatcher, SessionGate, SessionTimer, SessionUpdater,
};
use chrono::{DateTime, Utc};
use peerate_core::broadcast::{BroadcastGateway, ConnectionId};
use peerate_core::config::PeerateConfig;
use peerate_core::error::{PeerateError, Result};
use peerate_core::session::{
    CompletionEvaluator, CreateSessionRequest, Credential, Evaluation, RatingSubmission,
    RoundEvent, Session, SessionPhase, SessionRepository, SessionSnapshot, Viewer,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Link material handed back to the creator for one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantLink {
    pub participant: String,
    pub token: String,
    pub link: String,
}

/// Result of a successful `create_session`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedSession {
    pub session_id: String,
    pub participant_links: Vec<ParticipantLink>,
    pub admin_link: String,
}

impl CreatedSession {
    fn from_session(session: &Session, config: &PeerateConfig) -> Self {
        let participant_links = session
            .participants
            .iter()
            .filter_map(|name| {
                let token = session.tokens.token_for(name)?;
                Some(ParticipantLink {
                    participant: name.clone(),
                    token: token.to_string(),
                    link: config.participant_link(&session.id, token),
                })
            })
            .collect();
        Self {
            session_id: session.id.clone(),
            participant_links,
            admin_link: config.admin_link(&session.id),
        }
    }
}

/// Use case for running rating rounds.
///
/// # Responsibilities
///
/// - Validating and storing new sessions with freshly issued tokens
/// - Admitting connections by token or admin capability
/// - Arming countdowns and auto-filling skipped ratings on expiry
/// - Recording submissions and revealing results per the session mode
///
/// # Thread Safety
///
/// Mutations of the same session are serialized through `SessionGate`; different sessions never
/// wait on each other.
pub struct SessionUseCase {
    /// Repository for session data persistence
    session_repository: Arc<dyn SessionRepository>,
    /// Publish-to-room transport
    gateway: Arc<dyn BroadcastGateway>,
    config: PeerateConfig,
    gate: SessionGate,
    updater: SessionUpdater,
    timer: SessionTimer,
    directory: Arc<ConnectionDirectory>,
    dispatcher: RevealDispatcher,
}

impl SessionUseCase {
    /// Creates a new `SessionUseCase` instance.
    ///
    /// # Arguments
    ///
    /// * `session_repository` - Repository for session data persistence
    /// * `gateway` - Broadcast gateway of the transport layer
    /// * `config` - Validated application configuration
    pub fn new(
        session_repository: Arc<dyn SessionRepository>,
        gateway: Arc<dyn BroadcastGateway>,
        config: PeerateConfig,
    ) -> Self {
        let directory = Arc::new(ConnectionDirectory::new());
        Self {
            updater: SessionUpdater::new(session_repository.clone()),
            dispatcher: RevealDispatcher::new(gateway.clone(), directory.clone()),
            session_repository,
            gateway,
            config,
            gate: SessionGate::new(),
            timer: SessionTimer::new(),
            directory,
        }
    }

    /// Validates the request, issues tokens and stores a new session in the `waiting` phase.
    ///
    /// # Errors
    ///
    /// - `Validation` if the roster or topics are unacceptable; nothing is stored
    /// - store errors if the session cannot be persisted
    pub async fn create_session(&self, request: CreateSessionRequest) -> Result<CreatedSession> {
        let session = request.into_session(&self.config)?;
        let _guard = self.gate.acquire(&session.id).await;

        self.session_repository.create(&session).await?;
        tracing::info!(
            session_id = %session.id,
            mode = ?session.mode,
            participants = session.participants.len(),
            topics = session.topics.len(),
            "session created"
        );

        Ok(CreatedSession::from_session(&session, &self.config))
    }

    /// Admits `connection` to the session's room and returns the session as the viewer sees it.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session does not exist
    /// - `InvalidToken` if the token belongs to nobody in the session
    pub async fn join_session(
        &self,
        session_id: &str,
        connection: &ConnectionId,
        credential: &Credential,
    ) -> Result<SessionSnapshot> {
        let _guard = self.gate.acquire(session_id).await;
        let session = self.updater.load(session_id).await?;

        let viewer = match credential {
            Credential::Admin => Viewer::Admin,
            Credential::Token(token) => session
                .tokens
                .resolve(token)
                .map(|name| Viewer::Participant(name.to_string()))
                .ok_or_else(|| PeerateError::invalid_token(session_id))?,
        };

        if let Err(e) = self.gateway.join_room(connection, session_id).await {
            tracing::warn!(session_id, connection = %connection, "join_room failed: {}", e);
        }
        self.directory
            .register(session_id, connection.clone(), viewer.clone());
        tracing::info!(session_id, connection = %connection, viewer = ?viewer, "joined session");

        self.dispatcher
            .publish(session_id, &state_event(&session))
            .await;

        Ok(SessionSnapshot::for_viewer(&session, viewer))
    }

    /// Starts or restarts the countdown from now.
    ///
    /// Sessions without `timer_seconds` are marked started without scheduling an expiry.
    /// Sessions already in `results` are acknowledged without change.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session does not exist
    pub async fn start_timer(self: &Arc<Self>, session_id: &str) -> Result<()> {
        let _guard = self.gate.acquire(session_id).await;

        let armed_at = Utc::now();
        let (session, armed) = self
            .updater
            .update_if(session_id, |session| {
                if session.phase == SessionPhase::Results {
                    return Ok(None);
                }
                session.arm_timer(armed_at);
                Ok(Some(()))
            })
            .await?;
        if armed.is_none() {
            tracing::debug!(session_id, "timer start ignored, results already revealed");
            return Ok(());
        }

        if let Some(seconds) = session.timer_seconds {
            let usecase = Arc::clone(self);
            let id = session_id.to_string();
            self.timer
                .schedule(session_id, armed_at, Duration::from_secs(seconds), async move {
                    if let Err(e) = usecase.expire_timer(&id, armed_at).await {
                        tracing::error!(session_id = %id, "timer expiry failed: {}", e);
                    }
                    usecase.timer.complete(&id, armed_at);
                });
        }
        tracing::info!(session_id, seconds = ?session.timer_seconds, %armed_at, "timer started");

        self.dispatcher
            .publish(
                session_id,
                &RoundEvent::TimerStarted {
                    started_at: armed_at,
                    seconds: session.timer_seconds,
                },
            )
            .await;
        self.dispatcher
            .publish(session_id, &state_event(&session))
            .await;
        Ok(())
    }

    /// Records `rater`'s ratings, replacing everything they submitted before, then evaluates
    /// completion.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session does not exist
    /// - `Validation` for unknown rater/target/topic, out-of-range scores or empty submissions
    pub async fn submit_ratings(
        &self,
        session_id: &str,
        rater: &str,
        submission: &RatingSubmission,
    ) -> Result<()> {
        let _guard = self.gate.acquire(session_id).await;
        let bounds = self.config.rating;

        let (session, (evaluation, phase_changed)) = self
            .updater
            .update(session_id, |session| {
                let tuples = session.prepare_submission(rater, submission, &bounds)?;
                session.ratings.submit(rater, tuples);
                Ok(CompletionEvaluator::apply(session))
            })
            .await?;
        tracing::info!(
            session_id,
            rater,
            submitted = session.submitted_players().len(),
            participants = session.participants.len(),
            "ratings submitted"
        );
        if phase_changed && session.phase == SessionPhase::Results {
            self.timer.cancel(session_id);
        }

        self.announce(&session, evaluation, phase_changed).await;
        Ok(())
    }

    /// Handles a countdown firing scheduled at `armed_at`.
    ///
    /// No-ops when the session vanished, the timer was re-armed since, results are already
    /// revealed, or everyone has submitted. Otherwise every player without a submission gets
    /// `SKIPPED` for all their target/topic pairs.
    pub async fn expire_timer(&self, session_id: &str, armed_at: DateTime<Utc>) -> Result<()> {
        let _guard = self.gate.acquire(session_id).await;

        let outcome = self
            .updater
            .update_if(session_id, |session| {
                if !session.is_current_timer(armed_at) {
                    tracing::debug!(session_id, %armed_at, "stale timer firing ignored");
                    return Ok(None);
                }
                if session.phase == SessionPhase::Results {
                    tracing::debug!(session_id, "timer fired after results were revealed");
                    return Ok(None);
                }
                let unsubmitted = session.unsubmitted_players();
                if unsubmitted.is_empty() {
                    tracing::debug!(session_id, "timer fired with every player submitted");
                    return Ok(None);
                }

                let players = session.participants.clone();
                let topics = session.topics.clone();
                let inserted = session
                    .ratings
                    .auto_fill_skipped(&unsubmitted, &players, &topics);
                let (evaluation, phase_changed) = CompletionEvaluator::apply(session);
                Ok(Some((unsubmitted, inserted, evaluation, phase_changed)))
            })
            .await;

        let (session, expired) = match outcome {
            Ok(result) => result,
            Err(e) if e.is_not_found() => {
                tracing::debug!(session_id, "timer fired for vanished session");
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        let Some((unsubmitted, inserted, evaluation, phase_changed)) = expired else {
            return Ok(());
        };
        tracing::info!(
            session_id,
            skipped_players = ?unsubmitted,
            inserted,
            "timer expired, missing ratings skipped"
        );

        self.announce(&session, evaluation, phase_changed).await;
        Ok(())
    }

    /// Re-runs the completion check on the stored ledger and re-delivers whatever it reveals.
    ///
    /// With an unchanged ledger the evaluation is identical to the previous one.
    pub async fn evaluate_completion(&self, session_id: &str) -> Result<Evaluation> {
        let _guard = self.gate.acquire(session_id).await;

        let (session, advanced) = self
            .updater
            .update_if(session_id, |session| {
                let (evaluation, phase_changed) = CompletionEvaluator::apply(session);
                Ok(phase_changed.then_some(evaluation))
            })
            .await?;
        let phase_changed = advanced.is_some();
        let evaluation = advanced.unwrap_or_else(|| CompletionEvaluator::evaluate(&session));

        self.announce(&session, evaluation.clone(), phase_changed)
            .await;
        Ok(evaluation)
    }

    /// Forgets a closed connection.
    pub fn disconnect(&self, connection: &ConnectionId) {
        self.directory.remove(connection);
    }

    /// Whether an expiry is currently scheduled for the session.
    pub fn timer_pending(&self, session_id: &str) -> bool {
        self.timer.is_scheduled(session_id)
    }

    async fn announce(&self, session: &Session, evaluation: Evaluation, phase_changed: bool) {
        if let Some(reveal) = evaluation.reveal {
            self.dispatcher.dispatch(&session.id, reveal).await;
        }
        if phase_changed {
            tracing::debug!(session_id = %session.id, phase = ?session.phase, "phase changed");
        }
        self.dispatcher
            .publish(&session.id, &state_event(session))
            .await;
    }
}

fn state_event(session: &Session) -> RoundEvent {
    RoundEvent::SessionState {
        phase: session.phase,
        submitted: session.submitted_players().len(),
        participants: session.participants.len(),
    }
}
