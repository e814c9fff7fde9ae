use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::aggregate::PlayerResults;
use super::model::SessionPhase;
use super::rating::Rating;

/// Events pushed to connected clients through the broadcast gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoundEvent {
    /// Phase or submission progress changed.
    SessionState {
        phase: SessionPhase,
        submitted: usize,
        participants: usize,
    },
    /// The countdown was (re)started.
    TimerStarted {
        started_at: DateTime<Utc>,
        seconds: Option<u64>,
    },
    /// Raw ledger for public and game sessions.
    Results {
        ratings: Vec<Rating>,
        complete: bool,
    },
    /// One player's own aggregate in an anonymous session.
    PrivateResults { results: PlayerResults },
    /// Every player's aggregate, for the admin of an anonymous session.
    AdminResults { results: Vec<PlayerResults> },
}

impl RoundEvent {
    /// Event name handed to the gateway alongside the payload.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SessionState { .. } => "session_state",
            Self::TimerStarted { .. } => "timer_started",
            Self::Results { .. } => "results",
            Self::PrivateResults { .. } => "private_results",
            Self::AdminResults { .. } => "admin_results",
        }
    }

    pub fn payload(&self) -> crate::error::Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
