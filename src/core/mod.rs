//! Append-only, undo-capable round ledger.

/// Round ledger and replay.
pub mod ledger;
