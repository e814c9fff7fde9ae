//! Domain layer for Peerate.
//!
//! Sessions, participant credentials, the rating ledger, aggregation and the completion rules
//! live here, together with the repository and broadcast traits the outer layers implement.

pub mod broadcast;
pub mod config;
pub mod error;
pub mod session;

// Re-export common error type
pub use error::PeerateError;
