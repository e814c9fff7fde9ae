//! Configuration service implementation.
//!
//! Loads `PeerateConfig` from `config.toml` (by default `~/.config/peerate/config.toml`) and
//! caches it. A missing or empty file yields the defaults.

use crate::paths::PeeratePaths;
use crate::storage::AtomicTomlFile;
use peerate_core::config::PeerateConfig;
use peerate_core::error::{PeerateError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<PeerateConfig>>>,
}

impl ConfigService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// A service reading the platform default config file.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(PeeratePaths::config_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<PeerateConfig> {
        {
            let read_lock = self
                .config
                .read()
                .map_err(|_| PeerateError::internal("config cache poisoned"))?;
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_config()?;

        let mut write_lock = self
            .config
            .write()
            .map_err(|_| PeerateError::internal("config cache poisoned"))?;
        *write_lock = Some(loaded.clone());

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }

    fn load_config(&self) -> Result<PeerateConfig> {
        let file = AtomicTomlFile::<PeerateConfig>::new(self.path.clone());
        let config = match file.load()? {
            Some(config) => {
                tracing::info!(path = %self.path.display(), "loaded configuration");
                config
            }
            None => {
                tracing::debug!(path = %self.path.display(), "no configuration file, using defaults");
                PeerateConfig::default()
            }
        };
        config.validate()?;
        Ok(config)
    }
}
