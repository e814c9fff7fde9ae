//! Session updater helper for the common "find → update → save" pattern.

use peerate_core::error::{PeerateError, Result};
use peerate_core::session::{Session, SessionRepository};
use std::sync::Arc;

/// Encapsulates one read-modify-write cycle against the session store:
/// 1. Loading a session from storage
/// 2. Applying updates
/// 3. Updating the timestamp
/// 4. Saving back to storage
///
/// Callers must hold the session's gate; the updater itself does no locking.
pub struct SessionUpdater {
    repository: Arc<dyn SessionRepository>,
}

impl SessionUpdater {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// Loads a session or fails with `NotFound`.
    pub async fn load(&self, session_id: &str) -> Result<Session> {
        self.repository
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| PeerateError::not_found("Session", session_id))
    }

    /// Updates a session by applying the given updater function.
    ///
    /// The mutation happens on an owned copy; if `updater` fails nothing is saved.
    /// Returns the saved session together with the updater's output.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The session doesn't exist
    /// - The updater function returns an error
    /// - Saving to storage fails
    pub async fn update<F, T>(&self, session_id: &str, updater: F) -> Result<(Session, T)>
    where
        F: FnOnce(&mut Session) -> Result<T>,
    {
        tracing::debug!("[SessionUpdater] update() called for session_id: {}", session_id);

        let mut session = self.load(session_id).await?;

        tracing::debug!(
            "[SessionUpdater] Loaded session: id={}, phase={:?}, ratings={}",
            session.id,
            session.phase,
            session.ratings.len()
        );

        let output = updater(&mut session)?;

        session.touch();
        self.repository.save(&session).await?;

        tracing::debug!(
            "[SessionUpdater] Session saved: id={}, phase={:?}, ratings={}",
            session.id,
            session.phase,
            session.ratings.len()
        );

        Ok((session, output))
    }

    /// Like [`update`](Self::update), but the updater decides whether anything is saved.
    ///
    /// Returning `Ok(None)` leaves the store untouched and hands back the session as loaded,
    /// together with `None`.
    pub async fn update_if<F, T>(&self, session_id: &str, updater: F) -> Result<(Session, Option<T>)>
    where
        F: FnOnce(&mut Session) -> Result<Option<T>>,
    {
        let loaded = self.load(session_id).await?;
        let mut session = loaded.clone();

        let Some(output) = updater(&mut session)? else {
            tracing::debug!("[SessionUpdater] Nothing to save for session_id: {}", session_id);
            return Ok((loaded, None));
        };

        session.touch();
        self.repository.save(&session).await?;

        tracing::debug!(
            "[SessionUpdater] Session saved: id={}, phase={:?}, ratings={}",
            session.id,
            session.phase,
            session.ratings.len()
        );

        Ok((session, Some(output)))
    }
}
