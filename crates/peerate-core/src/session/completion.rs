//! Completion evaluation.
//!
//! After every ledger mutation the evaluator decides, according to the session mode, whether
//! results are revealed, to whom, and whether the session moves into the results phase.

use super::aggregate::{self, PlayerResults};
use super::model::{Session, SessionMode, SessionPhase};
use super::rating::Rating;

/// What has to be delivered once an evaluation reveals results.
#[derive(Debug, Clone, PartialEq)]
pub enum Reveal {
    /// The raw ledger, sent to everyone in the session room.
    Ledger {
        ratings: Vec<Rating>,
        complete: bool,
    },
    /// Each player's own aggregate, sent privately. The admin view receives the full table.
    Private { results: Vec<PlayerResults> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub reveal: Option<Reveal>,
    /// Every player has submitted at least one tuple.
    pub complete: bool,
    /// The phase the session should be in after this evaluation.
    pub phase: SessionPhase,
}

pub struct CompletionEvaluator;

impl CompletionEvaluator {
    /// Evaluates `session` without modifying it.
    ///
    /// Calling this repeatedly on an unchanged ledger yields the same evaluation.
    pub fn evaluate(session: &Session) -> Evaluation {
        let complete = session.all_players_submitted();
        let mut phase = session.phase;
        if !session.ratings.is_empty() {
            phase = phase.max(SessionPhase::Active);
        }
        if complete {
            phase = SessionPhase::Results;
        }

        let reveal = match session.mode {
            SessionMode::Public if !session.ratings.is_empty() => Some(Reveal::Ledger {
                ratings: session.ratings.entries().to_vec(),
                complete,
            }),
            SessionMode::Public => None,
            SessionMode::Game if complete => Some(Reveal::Ledger {
                ratings: session.ratings.entries().to_vec(),
                complete,
            }),
            SessionMode::Anonymous if complete => Some(Reveal::Private {
                results: aggregate::all_results(session),
            }),
            SessionMode::Game | SessionMode::Anonymous => None,
        };

        Evaluation {
            reveal,
            complete,
            phase,
        }
    }

    /// Evaluates `session` and advances its phase accordingly.
    ///
    /// Returns the evaluation together with whether the phase changed.
    pub fn apply(session: &mut Session) -> (Evaluation, bool) {
        let evaluation = Self::evaluate(session);
        let changed = session.advance_phase(evaluation.phase);
        if changed && evaluation.phase == SessionPhase::Results {
            tracing::info!(session_id = %session.id, mode = ?session.mode, "results revealed");
        }
        (evaluation, changed)
    }
}
