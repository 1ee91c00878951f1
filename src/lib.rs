//! Turn-based live scorekeeping for darts, dominos, uno, and custom games.
//!
//! Every accepted submission becomes an immutable round in an undo-capable
//! ledger. Running values are always the result of replaying that ledger, and
//! a session controller writes a full snapshot after every accepted mutation
//! so a match can be resumed after a restart.
//!
//! # Examples
//!
//! Pure state machine with [`engine::state::MatchScoringState`]:
//! ```
//! use scorekeep::{
//!     engine::{machine::Rejection, state::MatchScoringState},
//!     round::RoundInput,
//!     types::Seat,
//!     variant::GameVariant,
//! };
//!
//! let seats = vec![Seat::new(0, 1, "Ann"), Seat::new(1, 2, "Bo")];
//! let mut state = MatchScoringState::new(GameVariant::X01 { start: 501 }, seats).expect("start");
//! state.submit(0, &RoundInput::score(60)).expect("submit");
//! state.submit(1, &RoundInput::darts([60, 20, 0])).expect("submit");
//! assert_eq!(state.tally(0).map(|t| t.score), Some(441));
//! assert_eq!(state.tally(1).map(|t| t.score), Some(421));
//!
//! let undone = state.undo().expect("round");
//! assert_eq!(undone.seat, 1);
//! assert_eq!(state.active_seat(), 1);
//! assert!(matches!(
//!     state.submit(1, &RoundInput::darts([61])),
//!     Err(Rejection::Invalid(_))
//! ));
//! ```
//!
//! Persisted session with the SQLite store:
//! ```no_run
//! use scorekeep::{
//!     persist::sqlite::SqliteMatchStore,
//!     round::RoundInput,
//!     session::{MatchSession, SessionConfig},
//!     types::Seat,
//!     variant::VariantId,
//! };
//!
//! let store = SqliteMatchStore::open("scores.db").expect("open sqlite");
//! let seats = vec![Seat::new(0, 1, "Ann"), Seat::new(1, 2, "Bo")];
//! let mut session = MatchSession::create(store, VariantId::Dominos, seats, SessionConfig::default())
//!     .expect("create");
//! session.submit_and_persist(0, &RoundInput::game([80, 40])).expect("submit");
//! session.pause().expect("pause");
//! ```
#![deny(missing_docs)]

/// Append-only round ledger.
pub mod core;
/// Scoring state machine, results, and statistics.
pub mod engine;
/// Storage collaborator contract and implementations.
pub mod persist;
/// Ledger entries and submissions.
pub mod round;
/// Single-writer async runtime handle and events.
pub mod runtime;
/// Match session controller.
pub mod session;
/// Versioned serialized game data.
pub mod snapshot;
/// Shared primitive types.
pub mod types;
/// Game variant registry and rules.
pub mod variant;
