//! Scoring state machine.

/// Submission, undo, and explicit end transitions.
pub mod machine;
/// Final results and standings.
pub mod result;
/// Live match aggregate.
pub mod state;
/// Per-seat statistics derived from the ledger.
pub mod stats;
