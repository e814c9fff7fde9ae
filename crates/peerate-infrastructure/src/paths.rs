//! Path resolution for Peerate configuration and session data.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/peerate/           # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/peerate/      # Data directory
//! └── sessions/                # One TOML file per session
//!     └── <session-id>.toml
//! ```

use std::path::PathBuf;

const APP_NAME: &str = "peerate";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for peerate_core::PeerateError {
    fn from(e: PathError) -> Self {
        Self::config(e.to_string())
    }
}

pub struct PeeratePaths;

impl PeeratePaths {
    /// Returns the Peerate configuration directory (e.g., `~/.config/peerate/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_NAME))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the Peerate data directory (e.g., `~/.local/share/peerate/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_NAME))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the session store root, preferring an explicit override.
    pub fn store_dir(configured: Option<&PathBuf>) -> Result<PathBuf, PathError> {
        match configured {
            Some(dir) => Ok(dir.clone()),
            None => Self::data_dir(),
        }
    }
}
