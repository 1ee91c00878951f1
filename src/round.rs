//! Ledger entry, raw submission, and normalized submission types.

use serde::{Deserialize, Serialize};

use crate::types::{RoundIndex, SeatIndex, SeatTally};

/// Raw scoring submission as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoundInput {
    /// Single aggregate value.
    Score {
        /// Aggregate value.
        value: i64,
    },
    /// Up to three granular dart values.
    Darts {
        /// Dart values in throw order.
        darts: Vec<i64>,
        /// Optional aggregate that must equal the dart sum.
        total: Option<i64>,
    },
    /// One discrete game of a multi-game series.
    Game(GameScores),
}

impl RoundInput {
    /// Shorthand for [`RoundInput::Score`].
    pub fn score(value: i64) -> Self {
        Self::Score { value }
    }

    /// Shorthand for [`RoundInput::Darts`] without an aggregate.
    pub fn darts(darts: impl Into<Vec<i64>>) -> Self {
        Self::Darts {
            darts: darts.into(),
            total: None,
        }
    }

    /// Shorthand for [`RoundInput::Game`] with per-seat scores only.
    pub fn game(scores: impl Into<Vec<i64>>) -> Self {
        Self::Game(GameScores {
            scores: scores.into(),
            winner: None,
            pips: Vec::new(),
        })
    }
}

/// Per-seat result of one discrete game.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameScores {
    /// Score delta per seat, indexed by seat.
    pub scores: Vec<i64>,
    /// Explicit game winner; derived from the highest delta when absent.
    pub winner: Option<SeatIndex>,
    /// Pip counts per seat (dominos); empty when not tracked.
    #[serde(default)]
    pub pips: Vec<u32>,
}

/// Submission after variant validation, ready to be applied to tallies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scored {
    /// One value credited to (or subtracted from) the acting seat.
    Points {
        /// Validated aggregate.
        value: i64,
        /// Granular darts, empty when entered as an aggregate.
        #[serde(default)]
        darts: Vec<i64>,
    },
    /// One discrete game with a resolved winner.
    Game {
        /// Score delta per seat.
        scores: Vec<i64>,
        /// Resolved game winner.
        winner: SeatIndex,
        /// Pip counts per seat, possibly empty.
        #[serde(default)]
        pips: Vec<u32>,
    },
}

impl Scored {
    /// Aggregate value credited by this submission to `seat`.
    pub fn value_for(&self, seat: SeatIndex) -> i64 {
        match self {
            Self::Points { value, .. } => *value,
            Self::Game { scores, .. } => scores.get(seat).copied().unwrap_or(0),
        }
    }

    /// Winner of a discrete game, if this is one.
    pub fn game_winner(&self) -> Option<SeatIndex> {
        match self {
            Self::Points { .. } => None,
            Self::Game { winner, .. } => Some(*winner),
        }
    }
}

/// Immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// Sequential position in the ledger, starting at 0.
    pub index: RoundIndex,
    /// Seat that made the submission.
    pub seat: SeatIndex,
    /// Normalized submission.
    pub scored: Scored,
    /// Running values of every seat after this round.
    pub tallies_after: Vec<SeatTally>,
    /// True when this round satisfied the terminal condition.
    pub terminal: bool,
    /// Submission timestamp in milliseconds since epoch.
    pub ts_ms: u64,
}
