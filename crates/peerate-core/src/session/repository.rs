//! Session repository trait.
//!
//! Defines the interface for session persistence operations.

use super::model::Session;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for managing session persistence.
///
/// This trait decouples the rating engine from the specific storage mechanism
/// (e.g., in-memory map, TOML files, database).
///
/// # Implementation Notes
///
/// Implementations need not serialize concurrent writers to the same session; the application
/// layer guarantees at most one in-flight mutation per session id. Last write wins.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Finds a session by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Session))`: Session found
    /// - `Ok(None)`: Session not found
    /// - `Err(_)`: Error occurred during retrieval
    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>>;

    /// Stores a new session.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Session stored
    /// - `Err(PeerateError::Conflict)`: A session with the same ID already exists
    /// - `Err(_)`: Error occurred during storage
    async fn create(&self, session: &Session) -> Result<()>;

    /// Saves an existing session, replacing the stored copy.
    async fn save(&self, session: &Session) -> Result<()>;
}
