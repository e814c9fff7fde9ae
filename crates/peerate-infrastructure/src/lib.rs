//! Infrastructure layer for Peerate.
//!
//! Concrete session stores, the channel-backed broadcast gateway and configuration loading.

pub mod channel_broadcaster;
pub mod config_service;
pub mod memory_session_repository;
pub mod paths;
pub mod storage;
pub mod toml_session_repository;

pub use channel_broadcaster::{ChannelBroadcaster, OutboundMessage, OutboundReceiver};
pub use config_service::ConfigService;
pub use memory_session_repository::InMemorySessionRepository;
pub use paths::PeeratePaths;
pub use toml_session_repository::TomlSessionRepository;
