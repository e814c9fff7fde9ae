//! Viewer-specific session view returned on join.

use super::aggregate::{self, PlayerResults};
use super::model::{Session, SessionMode, SessionPhase};
use super::rating::Rating;
use super::token::Viewer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub viewer: Viewer,
    pub mode: SessionMode,
    pub phase: SessionPhase,
    pub participants: Vec<String>,
    pub topics: Vec<String>,
    pub timer_seconds: Option<u64>,
    pub timer_started_at: Option<DateTime<Utc>>,
    pub submitted: Vec<String>,
    /// Present once results are revealed; shaped for the viewer.
    pub results: Option<SnapshotResults>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SnapshotResults {
    Ledger { ratings: Vec<Rating> },
    Own { results: PlayerResults },
    Table { results: Vec<PlayerResults> },
}

impl SessionSnapshot {
    pub fn for_viewer(session: &Session, viewer: Viewer) -> Self {
        let results = Self::results_for(session, &viewer);
        Self {
            session_id: session.id.clone(),
            mode: session.mode,
            phase: session.phase,
            participants: session.participants.clone(),
            topics: session.topics.clone(),
            timer_seconds: session.timer_seconds,
            timer_started_at: session.timer_started_at,
            submitted: session.submitted_players(),
            viewer,
            results,
        }
    }

    fn results_for(session: &Session, viewer: &Viewer) -> Option<SnapshotResults> {
        match (session.mode, viewer) {
            // Public sessions show the growing ledger as soon as anything is in it.
            (SessionMode::Public, _) if !session.ratings.is_empty() => {
                Some(SnapshotResults::Ledger {
                    ratings: session.ratings.entries().to_vec(),
                })
            }
            _ if session.phase != SessionPhase::Results => None,
            (SessionMode::Public | SessionMode::Game, _) => Some(SnapshotResults::Ledger {
                ratings: session.ratings.entries().to_vec(),
            }),
            (SessionMode::Anonymous, Viewer::Participant(name)) => Some(SnapshotResults::Own {
                results: aggregate::player_results(session, name),
            }),
            (SessionMode::Anonymous, Viewer::Admin) => Some(SnapshotResults::Table {
                results: aggregate::all_results(session),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::model::test_support::session;
    use crate::session::rating::RatingValue;

    fn rating(rater: &str, target: &str) -> Rating {
        Rating {
            rater: rater.into(),
            target: target.into(),
            topic: "x".into(),
            value: RatingValue::Score(5),
        }
    }

    #[test]
    fn test_game_hides_ledger_before_results() {
        let mut s = session(&["a", "b"], &["x"], SessionMode::Game);
        s.ratings.submit("a", vec![rating("a", "b")]);
        let snap = SessionSnapshot::for_viewer(&s, Viewer::Participant("b".into()));
        assert!(snap.results.is_none());
        assert_eq!(snap.submitted, vec!["a".to_string()]);
    }

    #[test]
    fn test_public_shows_partial_ledger() {
        let mut s = session(&["a", "b"], &["x"], SessionMode::Public);
        s.ratings.submit("a", vec![rating("a", "b")]);
        let snap = SessionSnapshot::for_viewer(&s, Viewer::Admin);
        assert!(matches!(snap.results, Some(SnapshotResults::Ledger { .. })));
    }

    #[test]
    fn test_anonymous_participant_sees_only_own_results() {
        let mut s = session(&["a", "b", "c", "d"], &["x"], SessionMode::Anonymous);
        s.ratings.submit("a", vec![rating("a", "b")]);
        s.phase = SessionPhase::Results;

        let snap = SessionSnapshot::for_viewer(&s, Viewer::Participant("b".into()));
        match &snap.results {
            Some(SnapshotResults::Own { results }) => assert_eq!(results.participant, "b"),
            other => panic!("unexpected results: {other:?}"),
        }
        let json = serde_json::to_string(&snap).unwrap();
        assert!(!json.contains("rater"));
    }
}
