//! TOML directory `SessionRepository`.
//!
//! Directory structure:
//! ```text
//! base_dir/
//! └── sessions/
//!     ├── 5f0c...-session-id-1.toml
//!     └── 9a41...-session-id-2.toml
//! ```

use crate::paths::PeeratePaths;
use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use peerate_core::error::{PeerateError, Result};
use peerate_core::session::{Session, SessionRepository};
use std::path::{Path, PathBuf};

pub struct TomlSessionRepository {
    sessions_dir: PathBuf,
}

impl TomlSessionRepository {
    /// Creates a repository rooted at `base_dir`, creating `base_dir/sessions` if needed.
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let sessions_dir = base_dir.as_ref().join("sessions");
        tokio::fs::create_dir_all(&sessions_dir).await?;
        tracing::debug!(dir = %sessions_dir.display(), "session store ready");
        Ok(Self { sessions_dir })
    }

    /// Creates a repository at the configured store directory or the platform data directory.
    pub async fn default_location(configured: Option<&PathBuf>) -> Result<Self> {
        let base_dir = PeeratePaths::store_dir(configured)?;
        Self::new(base_dir).await
    }

    pub fn sessions_dir(&self) -> &Path {
        &self.sessions_dir
    }

    /// Maps a session ID to its file, refusing IDs that could escape the directory.
    fn file_for(&self, session_id: &str) -> Option<AtomicTomlFile<Session>> {
        let valid = !session_id.is_empty()
            && session_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| AtomicTomlFile::new(self.sessions_dir.join(format!("{session_id}.toml"))))
    }

    fn file_for_session(&self, session: &Session) -> Result<AtomicTomlFile<Session>> {
        self.file_for(&session.id).ok_or_else(|| {
            PeerateError::validation(format!("session id '{}' is not storable", session.id))
        })
    }
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| PeerateError::internal(format!("storage task failed: {e}")))?
}

#[async_trait]
impl SessionRepository for TomlSessionRepository {
    async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>> {
        let Some(file) = self.file_for(session_id) else {
            return Ok(None);
        };
        blocking(move || Ok(file.load()?)).await
    }

    async fn create(&self, session: &Session) -> Result<()> {
        let file = self.file_for_session(session)?;
        let snapshot = session.clone();
        let created = blocking(move || Ok(file.create_new(&snapshot)?)).await?;
        if created {
            Ok(())
        } else {
            Err(PeerateError::conflict("Session", session.id.clone()))
        }
    }

    async fn save(&self, session: &Session) -> Result<()> {
        let file = self.file_for_session(session)?;
        let session = session.clone();
        blocking(move || Ok(file.save(&session)?)).await
    }
}
