//! Configuration model for Peerate.
//!
//! The configuration is read from `config.toml` by the infrastructure layer. Every field has a
//! default so that a missing or partial file still yields a usable configuration.

use crate::error::{PeerateError, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::PathBuf;

/// Smallest number of random bytes a participant token may carry.
pub const MIN_TOKEN_BYTES: usize = 8;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PeerateConfig {
    /// Base URL used to build participant and admin links.
    pub base_url: String,
    /// Accepted score range.
    pub rating: RatingBounds,
    /// Random bytes per participant token (hex-encoded, so the token is twice as long).
    pub token_bytes: usize,
    /// Minimum participant count for public and game sessions.
    pub min_participants: usize,
    /// Minimum participant count for anonymous sessions.
    pub min_anonymous_participants: usize,
    /// Countdown used by the CLI when none is given explicitly.
    pub default_timer_seconds: Option<u64>,
    /// Default `tracing` filter when `RUST_LOG` is not set.
    pub log_level: String,
    /// Emit logs as JSON lines.
    pub log_json: bool,
    /// Directory for the TOML session store. `None` means the platform data directory.
    pub store_dir: Option<PathBuf>,
}

impl Default for PeerateConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            rating: RatingBounds::default(),
            token_bytes: 16,
            min_participants: 2,
            min_anonymous_participants: 4,
            default_timer_seconds: None,
            log_level: "info".to_string(),
            log_json: false,
            store_dir: None,
        }
    }
}

impl PeerateConfig {
    /// Checks cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.rating.min > self.rating.max {
            return Err(PeerateError::config(format!(
                "rating.min ({}) must not exceed rating.max ({})",
                self.rating.min, self.rating.max
            )));
        }
        if self.token_bytes < MIN_TOKEN_BYTES {
            return Err(PeerateError::config(format!(
                "token_bytes must be at least {MIN_TOKEN_BYTES}, got {}",
                self.token_bytes
            )));
        }
        if self.min_participants < 2 {
            return Err(PeerateError::config("min_participants must be at least 2"));
        }
        if self.min_anonymous_participants < self.min_participants {
            return Err(PeerateError::config(
                "min_anonymous_participants must not be lower than min_participants",
            ));
        }
        Ok(())
    }

    /// Link handed to a participant.
    pub fn participant_link(&self, session_id: &str, token: &str) -> String {
        format!(
            "{}/session/{}?token={}",
            self.base_url.trim_end_matches('/'),
            session_id,
            token
        )
    }

    /// Link handed to the session creator.
    pub fn admin_link(&self, session_id: &str) -> String {
        format!(
            "{}/session/{}?admin=true",
            self.base_url.trim_end_matches('/'),
            session_id
        )
    }
}

/// Inclusive bounds for a numeric rating.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingBounds {
    pub min: u8,
    pub max: u8,
}

impl Default for RatingBounds {
    fn default() -> Self {
        Self { min: 1, max: 10 }
    }
}

impl RatingBounds {
    pub fn range(&self) -> RangeInclusive<u8> {
        self.min..=self.max
    }

    pub fn contains(&self, score: u8) -> bool {
        self.range().contains(&score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: PeerateConfig = toml::from_str(
            r#"
            base_url = "https://rate.example.com/"

            [rating]
            min = 0
            max = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.rating, RatingBounds { min: 0, max: 5 });
        assert_eq!(config.token_bytes, 16);
        assert_eq!(config.min_anonymous_participants, 4);
        assert!(config.validate().is_ok());
        assert_eq!(
            config.participant_link("s1", "abcd"),
            "https://rate.example.com/session/s1?token=abcd"
        );
        assert_eq!(
            config.admin_link("s1"),
            "https://rate.example.com/session/s1?admin=true"
        );
    }

    #[test]
    fn test_validate_rejects_short_tokens() {
        let config = PeerateConfig {
            token_bytes: 4,
            ..PeerateConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_bounds() {
        let config = PeerateConfig {
            rating: RatingBounds { min: 9, max: 3 },
            ..PeerateConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
