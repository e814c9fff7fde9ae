//! In-memory `SessionRepository`.

use async_trait::async_trait;
use peerate_core::error::{PeerateError, Result};
use peerate_core::session::{Session, SessionRepository};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Keeps sessions in a process-local map. Sessions vanish when the process exits.
#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(session_id).cloned())
    }

    async fn create(&self, session: &Session) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.id) {
            return Err(PeerateError::conflict("Session", session.id.clone()));
        }
        sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn save(&self, session: &Session) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peerate_core::config::PeerateConfig;
    use peerate_core::session::CreateSessionRequest;

    fn new_session() -> Session {
        CreateSessionRequest {
            participants: vec!["a".into(), "b".into()],
            timer_seconds: None,
            is_anonymous: false,
            is_game_mode: true,
            topics: vec!["x".into()],
        }
        .into_session(&PeerateConfig::default())
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_find_save() {
        let repo = InMemorySessionRepository::new();
        let mut session = new_session();

        repo.create(&session).await.unwrap();
        assert_eq!(repo.find_by_id(&session.id).await.unwrap(), Some(session.clone()));

        session.timer_started = true;
        repo.save(&session).await.unwrap();
        let stored = repo.find_by_id(&session.id).await.unwrap().unwrap();
        assert!(stored.timer_started);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_create_conflict() {
        let repo = InMemorySessionRepository::new();
        let session = new_session();
        repo.create(&session).await.unwrap();
        let err = repo.create(&session).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_find_missing() {
        let repo = InMemorySessionRepository::new();
        assert!(repo.find_by_id("nope").await.unwrap().is_none());
    }
}
