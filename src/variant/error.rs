//! Validation and identifier parse errors raised by variant policies.

use crate::types::SeatIndex;

/// Input shape or range problem. Never mutates match state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Seat index beyond the seat list.
    #[error("seat {seat} is out of range for {seats} seats")]
    SeatOutOfRange {
        /// Seat supplied.
        seat: SeatIndex,
        /// Seats in the match.
        seats: usize,
    },

    /// X01 needs a score of at least 1.
    #[error("score must be positive, got {0}")]
    NonPositiveScore(i64),

    /// Negative value where the variant forbids it.
    #[error("negative scores are not allowed, got {0}")]
    NegativeScore(i64),

    /// More than three darts can make.
    #[error("score {score} exceeds the per-round maximum of {max}")]
    ScoreAboveMaximum {
        /// Score supplied.
        score: i64,
        /// Per-round maximum.
        max: i64,
    },

    /// More than three darts listed.
    #[error("at most {max} darts per round, got {got}")]
    TooManyDarts {
        /// Darts allowed.
        max: usize,
        /// Darts supplied.
        got: usize,
    },

    /// Empty dart list.
    #[error("a round needs at least one dart")]
    NoDarts,

    /// Value no single dart can score.
    #[error("{0} is not a score a single dart can make")]
    InvalidDart(i64),

    /// Dart values disagree with the supplied total.
    #[error("darts sum to {darts_sum} but the total says {total}")]
    DartsTotalMismatch {
        /// Sum of the darts.
        darts_sum: i64,
        /// Total supplied.
        total: i64,
    },

    /// Input kind the variant does not take.
    #[error("{variant} expects {expected} input")]
    WrongInputShape {
        /// Variant name.
        variant: &'static str,
        /// Accepted input kind.
        expected: &'static str,
    },

    /// Game scores not given for exactly every seat.
    #[error("expected one score per seat ({expected}), got {got}")]
    ScoreCountMismatch {
        /// Seats in the match.
        expected: usize,
        /// Scores supplied.
        got: usize,
    },

    /// Pip counts not given for exactly every seat.
    #[error("expected one pip count per seat ({expected}), got {got}")]
    PipCountMismatch {
        /// Seats in the match.
        expected: usize,
        /// Pip counts supplied.
        got: usize,
    },

    /// Pip counts for a variant that has none.
    #[error("{variant} does not track pip counts")]
    PipsNotTracked {
        /// Variant name.
        variant: &'static str,
    },

    /// Explicit game winner beyond the seat list.
    #[error("game winner {seat} is out of range for {seats} seats")]
    WinnerOutOfRange {
        /// Winner supplied.
        seat: SeatIndex,
        /// Seats in the match.
        seats: usize,
    },

    /// No positive score and no explicit winner.
    #[error("a game where nobody scored needs an explicit winner")]
    UndecidedGame,

    /// Applying the score would overflow a running value.
    #[error("score would overflow the running value of seat {seat}")]
    ScoreOverflow {
        /// Seat whose value would overflow.
        seat: SeatIndex,
    },
}

/// Unrecognised variant identifier string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VariantParseError {
    /// Unrecognised variant name.
    #[error("unknown game variant `{0}`")]
    Unknown(String),

    /// X01 start outside 301/401/501/701/901.
    #[error("unsupported x01 starting value `{0}`")]
    X01Start(String),

    /// Cricket mode other than standard or cut-throat.
    #[error("unknown cricket mode `{0}`")]
    CricketMode(String),

    /// Custom config id that is not a number.
    #[error("invalid custom config id `{0}`")]
    ConfigId(String),
}
