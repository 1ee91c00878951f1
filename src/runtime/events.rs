//! Runtime event stream payloads.

use crate::types::{RoundIndex, SeatIndex};

/// Events emitted from the single-writer runtime loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreEvent {
    /// A round was appended.
    RoundRecorded {
        /// Ledger index of the round.
        round: RoundIndex,
        /// Seat that scored.
        seat: SeatIndex,
    },
    /// An x01 submission overshot; the turn moved on.
    Bust {
        /// Seat that bust.
        seat: SeatIndex,
        /// Seat now active.
        next_seat: SeatIndex,
    },
    /// The latest round was retracted.
    Undone {
        /// Ledger index of the retracted round.
        round: RoundIndex,
        /// Seat that is active again.
        seat: SeatIndex,
    },
    /// The match reached a terminal condition or was ended.
    Completed {
        /// Winning seats.
        winners: Vec<SeatIndex>,
    },
    /// Participant results were written.
    Finalized,
    /// A snapshot write failed; state is kept in memory.
    SaveFailed {
        /// Error description.
        message: String,
    },
}
