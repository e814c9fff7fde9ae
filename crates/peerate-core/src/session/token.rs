//! Participant credentials.
//!
//! Tokens are issued once when a session is created and never change afterwards. The admin
//! identity does not hold a token; it is granted through [`Credential::Admin`].

use crate::config::MIN_TOKEN_BYTES;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Participant name → opaque credential.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenRegistry {
    tokens: BTreeMap<String, String>,
}

impl TokenRegistry {
    /// Generates one random, hex-encoded token per participant.
    ///
    /// `token_bytes` below [`MIN_TOKEN_BYTES`] is raised to the floor.
    pub fn issue(participants: &[String], token_bytes: usize) -> Self {
        let mut rng = rand::thread_rng();
        let len = token_bytes.max(MIN_TOKEN_BYTES);
        let tokens = participants
            .iter()
            .map(|name| {
                let mut bytes = vec![0u8; len];
                rng.fill_bytes(&mut bytes);
                (name.clone(), hex::encode(bytes))
            })
            .collect();
        Self { tokens }
    }

    /// Finds the participant owning `token`. The first match wins.
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.tokens
            .iter()
            .find(|(_, candidate)| candidate.as_str() == token)
            .map(|(name, _)| name.as_str())
    }

    pub fn token_for(&self, participant: &str) -> Option<&str> {
        self.tokens.get(participant).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// What a connecting client presents when joining.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Credential {
    Token(String),
    Admin,
}

/// Who is looking at a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Viewer {
    Admin,
    Participant(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn roster() -> Vec<String> {
        ["alice", "bob", "carol", "dave"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_issue_one_distinct_token_per_participant() {
        let registry = TokenRegistry::issue(&roster(), 16);
        assert_eq!(registry.len(), 4);

        let tokens: Vec<&str> = roster()
            .iter()
            .map(|name| registry.token_for(name).unwrap())
            .collect();
        let distinct: HashSet<&str> = tokens.iter().copied().collect();
        assert_eq!(distinct.len(), 4);
        assert!(tokens.iter().all(|t| t.len() == 32));
    }

    #[test]
    fn test_issue_enforces_minimum_length() {
        let registry = TokenRegistry::issue(&roster(), 2);
        let token = registry.token_for("alice").unwrap();
        assert_eq!(token.len(), MIN_TOKEN_BYTES * 2);
    }

    #[test]
    fn test_resolve() {
        let registry = TokenRegistry::issue(&roster(), 8);
        let bob_token = registry.token_for("bob").unwrap().to_string();
        assert_eq!(registry.resolve(&bob_token), Some("bob"));
        assert_eq!(registry.resolve("not-a-token"), None);
    }
}
