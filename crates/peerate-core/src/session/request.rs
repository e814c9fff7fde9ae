//! Session creation request and validation.

use super::model::{Session, SessionMode, SessionPhase};
use super::rating::RatingLedger;
use super::token::TokenRegistry;
use crate::config::PeerateConfig;
use crate::error::{PeerateError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Name reserved for the admin pseudo-identity.
pub const ADMIN_NAME: &str = "admin";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub participants: Vec<String>,
    #[serde(default)]
    pub timer_seconds: Option<u64>,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub is_game_mode: bool,
    pub topics: Vec<String>,
}

impl CreateSessionRequest {
    pub fn mode(&self) -> SessionMode {
        SessionMode::from_flags(self.is_anonymous, self.is_game_mode)
    }

    /// Validates the request and builds a fresh session with newly issued tokens.
    ///
    /// Names and topics are trimmed. Nothing is persisted here.
    pub fn into_session(self, config: &PeerateConfig) -> Result<Session> {
        let mode = self.mode();
        let participants = normalize_labels(self.participants, "participant")?;
        let topics = normalize_labels(self.topics, "topic")?;

        let minimum = if self.is_anonymous {
            config.min_anonymous_participants
        } else {
            config.min_participants
        };
        if participants.len() < minimum {
            return Err(PeerateError::validation(format!(
                "{mode:?} sessions need at least {minimum} participants, got {}",
                participants.len()
            )));
        }
        if topics.is_empty() {
            return Err(PeerateError::validation("at least one topic is required"));
        }
        if participants
            .iter()
            .any(|p| p.eq_ignore_ascii_case(ADMIN_NAME))
        {
            return Err(PeerateError::validation(format!(
                "'{ADMIN_NAME}' is reserved and cannot be a participant"
            )));
        }
        if self.timer_seconds == Some(0) {
            return Err(PeerateError::validation("timer_seconds must be positive"));
        }

        let now = chrono::Utc::now().to_rfc3339();
        Ok(Session {
            id: Uuid::new_v4().to_string(),
            tokens: TokenRegistry::issue(&participants, config.token_bytes),
            participants,
            topics,
            timer_seconds: self.timer_seconds,
            mode,
            phase: SessionPhase::Waiting,
            timer_started: false,
            timer_started_at: None,
            created_at: now.clone(),
            updated_at: now,
            ratings: RatingLedger::default(),
        })
    }
}

/// Trims labels and rejects empty entries and case-insensitive duplicates.
fn normalize_labels(raw: Vec<String>, what: &str) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut labels = Vec::with_capacity(raw.len());
    for label in raw {
        let label = label.trim().to_string();
        if label.is_empty() {
            return Err(PeerateError::validation(format!("{what} names must not be empty")));
        }
        if !seen.insert(label.to_lowercase()) {
            return Err(PeerateError::validation(format!("duplicate {what} '{label}'")));
        }
        labels.push(label);
    }
    Ok(labels)
}
