//! Session domain model.
//!
//! A `Session` is the unit of one rating round: the fixed roster of participants, the topics they
//! rate each other on, the credentials issued to them and the ledger of submitted ratings.

use super::rating::{Rating, RatingLedger, RatingSubmission};
use super::token::TokenRegistry;
use crate::config::RatingBounds;
use crate::error::{PeerateError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Governs when results are revealed and whether rater identities are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// Raw ledger is broadcast after every single submission.
    Public,
    /// Each player privately receives their own aggregate once everyone has submitted.
    Anonymous,
    /// Raw ledger is broadcast once everyone has submitted.
    Game,
}

impl SessionMode {
    /// Derives the mode from the two creation flags. Anonymity wins when both are set, so rater
    /// names are never revealed to a session created as anonymous.
    pub fn from_flags(is_anonymous: bool, is_game_mode: bool) -> Self {
        match (is_anonymous, is_game_mode) {
            (true, _) => Self::Anonymous,
            (false, true) => Self::Game,
            (false, false) => Self::Public,
        }
    }
}

/// Lifecycle phase of a session. Ordered so that transitions can only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Waiting,
    Active,
    Results,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// Display names, in creation order
    pub participants: Vec<String>,
    /// Topic labels, in creation order
    pub topics: Vec<String>,
    /// Countdown length; `None` disables auto-expiry
    #[serde(default)]
    pub timer_seconds: Option<u64>,
    pub mode: SessionMode,
    pub phase: SessionPhase,
    #[serde(default)]
    pub timer_started: bool,
    /// Staleness token for scheduled expiries
    #[serde(default)]
    pub timer_started_at: Option<DateTime<Utc>>,
    /// Timestamp when the session was created (ISO 8601 format)
    pub created_at: String,
    /// Timestamp when the session was last updated (ISO 8601 format)
    pub updated_at: String,
    pub tokens: TokenRegistry,
    #[serde(default)]
    pub ratings: RatingLedger,
}

impl Session {
    /// Everyone who rates and is rated. The admin pseudo-identity is never part of this list.
    pub fn players(&self) -> &[String] {
        &self.participants
    }

    pub fn is_participant(&self, name: &str) -> bool {
        self.participants.iter().any(|p| p == name)
    }

    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t == topic)
    }

    /// Players that have not submitted a single tuple yet.
    pub fn unsubmitted_players(&self) -> Vec<String> {
        let submitted = self.ratings.submitted_raters();
        self.participants
            .iter()
            .filter(|p| !submitted.contains(p.as_str()))
            .cloned()
            .collect()
    }

    pub fn all_players_submitted(&self) -> bool {
        let submitted = self.ratings.submitted_raters();
        self.participants
            .iter()
            .all(|p| submitted.contains(p.as_str()))
    }

    /// Moves the phase forward. Requests to move backwards are ignored.
    ///
    /// Returns `true` if the phase changed.
    pub fn advance_phase(&mut self, next: SessionPhase) -> bool {
        if next > self.phase {
            tracing::debug!(session_id = %self.id, from = ?self.phase, to = ?next, "phase transition");
            self.phase = next;
            true
        } else {
            false
        }
    }

    /// Arms the countdown from `now`, replacing any previous start time.
    pub fn arm_timer(&mut self, now: DateTime<Utc>) {
        self.timer_started = true;
        self.timer_started_at = Some(now);
        self.advance_phase(SessionPhase::Active);
    }

    /// Whether a firing scheduled for `armed_at` is still the current one.
    pub fn is_current_timer(&self, armed_at: DateTime<Utc>) -> bool {
        self.timer_started && self.timer_started_at == Some(armed_at)
    }

    /// Turns a rater's submission into ledger tuples, checking roster, topics and score bounds.
    ///
    /// Entries the rater addressed to themselves are dropped, not stored.
    pub fn prepare_submission(
        &self,
        rater: &str,
        submission: &RatingSubmission,
        bounds: &RatingBounds,
    ) -> Result<Vec<Rating>> {
        if !self.is_participant(rater) {
            return Err(PeerateError::validation(format!(
                "'{rater}' is not a participant of this session"
            )));
        }

        let mut tuples = Vec::new();
        for (target, by_topic) in submission {
            if !self.is_participant(target) {
                return Err(PeerateError::validation(format!(
                    "cannot rate unknown participant '{target}'"
                )));
            }
            let self_rating = target == rater;
            for (topic, value) in by_topic {
                if !self.has_topic(topic) {
                    return Err(PeerateError::validation(format!("unknown topic '{topic}'")));
                }
                if let Some(score) = value.score() {
                    if !bounds.contains(score) {
                        return Err(PeerateError::validation(format!(
                            "score {score} for '{target}' on '{topic}' is outside {}..={}",
                            bounds.min, bounds.max
                        )));
                    }
                }
                if self_rating {
                    tracing::debug!(session_id = %self.id, rater, topic = %topic, "self rating dropped");
                    continue;
                }
                tuples.push(Rating {
                    rater: rater.to_string(),
                    target: target.clone(),
                    topic: topic.clone(),
                    value: *value,
                });
            }
        }

        if tuples.is_empty() {
            return Err(PeerateError::validation("a submission must contain at least one rating"));
        }
        Ok(tuples)
    }

    /// Names of players that have submitted, in roster order.
    pub fn submitted_players(&self) -> Vec<String> {
        let submitted: BTreeSet<&str> = self.ratings.submitted_raters();
        self.participants
            .iter()
            .filter(|p| submitted.contains(p.as_str()))
            .cloned()
            .collect()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now().to_rfc3339();
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn session(participants: &[&str], topics: &[&str], mode: SessionMode) -> Session {
        let participants: Vec<String> = participants.iter().map(|p| p.to_string()).collect();
        let now = Utc::now().to_rfc3339();
        Session {
            id: "session-1".to_string(),
            tokens: TokenRegistry::issue(&participants, 8),
            participants,
            topics: topics.iter().map(|t| t.to_string()).collect(),
            timer_seconds: Some(1),
            mode,
            phase: SessionPhase::Waiting,
            timer_started: false,
            timer_started_at: None,
            created_at: now.clone(),
            updated_at: now,
            ratings: RatingLedger::default(),
        }
    }
}
