//! Session application services.
//!
//! This module contains the building blocks `SessionUseCase` coordinates: per-session locking,
//! the read-modify-write updater, countdown scheduling, connection bookkeeping and result
//! delivery.

mod connections;
mod gate;
mod reveal;
mod timer;
mod updater;

pub use connections::ConnectionDirectory;
pub use gate::{SessionGate, SessionGuard};
pub use reveal::RevealDispatcher;
pub use timer::SessionTimer;
pub use updater::SessionUpdater;
