//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`Session`, `SessionMode`, `SessionPhase`)
//! - `token`: Participant credentials (`TokenRegistry`, `Credential`, `Viewer`)
//! - `rating`: Rating tuples and the per-session ledger
//! - `aggregate`: Per-player, per-topic statistics
//! - `completion`: Mode-dependent reveal rules (`CompletionEvaluator`)
//! - `event`: Events pushed to connected clients
//! - `snapshot`: Viewer-specific session view
//! - `request`: Session creation request and validation
//! - `repository`: Repository trait for session persistence

pub mod aggregate;
mod completion;
mod event;
mod model;
mod rating;
mod repository;
mod request;
mod snapshot;
mod token;

// Re-export public API
pub use aggregate::{PlayerResults, TopicAverage};
pub use completion::{CompletionEvaluator, Evaluation, Reveal};
pub use event::RoundEvent;
pub use model::{Session, SessionMode, SessionPhase};
pub use rating::{Rating, RatingLedger, RatingSubmission, RatingValue, SKIPPED_LABEL};
pub use repository::SessionRepository;
pub use request::{ADMIN_NAME, CreateSessionRequest};
pub use snapshot::{SessionSnapshot, SnapshotResults};
pub use token::{Credential, TokenRegistry, Viewer};
