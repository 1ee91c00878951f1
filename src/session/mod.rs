//! Match session controller: one in-progress match end to end.

/// Session configuration.
pub mod config;
/// Session controller and its error type.
pub mod controller;

pub use config::SessionConfig;
pub use controller::{MatchSession, SessionError};
