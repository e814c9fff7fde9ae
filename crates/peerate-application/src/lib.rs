//! Application layer for Peerate.
//!
//! This crate provides the inbound actions of a rating round (create, join, start timer,
//! submit) on top of the domain model and the store and gateway abstractions.

pub mod session;
pub mod session_usecase;

pub use session_usecase::{CreatedSession, ParticipantLink, SessionUseCase};
