use anyhow::{Context, Result};
use peerate_application::SessionUseCase;
use peerate_core::config::PeerateConfig;
use peerate_core::session::SessionRepository;
use peerate_infrastructure::{ChannelBroadcaster, ConfigService, TomlSessionRepository};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Loads the configuration from `path`, or from the platform default location.
pub fn load_config(path: Option<&PathBuf>) -> Result<PeerateConfig> {
    let service = match path {
        Some(path) => ConfigService::new(path.clone()),
        None => ConfigService::default_location().context("Failed to locate config directory")?,
    };
    service
        .get_config()
        .with_context(|| format!("Failed to load config from {}", service.path().display()))
}

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_logging(config: &PeerateConfig, force_json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if force_json || config.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Parses a comma-separated or repeated list argument into trimmed, non-empty entries.
pub fn split_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

/// A use case backed by the on-disk session store.
pub async fn stored_usecase(
    config: &PeerateConfig,
) -> Result<(Arc<SessionUseCase>, Arc<ChannelBroadcaster>)> {
    let repository = TomlSessionRepository::default_location(config.store_dir.as_ref())
        .await
        .context("Failed to open session store")?;
    tracing::debug!(dir = %repository.sessions_dir().display(), "using session store");

    let repository: Arc<dyn SessionRepository> = Arc::new(repository);
    let broadcaster = Arc::new(ChannelBroadcaster::new());
    let usecase = Arc::new(SessionUseCase::new(
        repository,
        broadcaster.clone(),
        config.clone(),
    ));
    Ok((usecase, broadcaster))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_accepts_commas_and_repeats() {
        let values = vec!["Ann, Ben".to_string(), "Cid".to_string(), " ,".to_string()];
        assert_eq!(split_list(&values), vec!["Ann", "Ben", "Cid"]);
    }

    #[test]
    fn test_load_config_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("config.toml"))).unwrap();
        assert_eq!(config, PeerateConfig::default());
    }
}
