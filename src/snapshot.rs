//! Serialized game data written after every accepted mutation.

use serde::{Deserialize, Serialize};

use crate::{
    engine::state::{MatchScoringState, StateError},
    round::Round,
    types::{MatchStatus, Seat, SeatIndex, SeatTally},
    variant::GameVariant,
};

/// Version number for serialized [`SnapshotEnvelope`] payloads.
pub const SNAPSHOT_FORMAT_VERSION: u16 = 1;

/// Full state of one match: ledger, running values, and active seat marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    /// Resolved ruleset captured when the match started.
    pub variant: GameVariant,
    /// Ledger entries in order.
    pub rounds: Vec<Round>,
    /// Running values at save time.
    pub tallies: Vec<SeatTally>,
    /// Seat whose turn is active; derived from the ledger when absent.
    #[serde(default)]
    pub active_seat: Option<SeatIndex>,
    /// Match status at save time.
    pub status: MatchStatus,
}

impl MatchSnapshot {
    /// Captures the current state.
    pub fn capture(state: &MatchScoringState) -> Self {
        Self {
            variant: state.variant().clone(),
            rounds: state.rounds().to_vec(),
            tallies: state.tallies(),
            active_seat: Some(state.active_seat()),
            status: state.status(),
        }
    }

    /// Rebuilds live state by replaying the stored ledger.
    pub fn restore(self, seats: Vec<Seat>) -> Result<MatchScoringState, StateError> {
        MatchScoringState::resume(
            self.variant,
            seats,
            self.rounds,
            self.active_seat,
            self.status,
        )
    }
}

/// Versioned wrapper for stable on-disk payload decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEnvelope {
    /// Payload format version.
    pub format_version: u16,
    /// Wrapped snapshot.
    pub snapshot: MatchSnapshot,
}

impl SnapshotEnvelope {
    /// Constructs an envelope using [`SNAPSHOT_FORMAT_VERSION`].
    pub fn new(snapshot: MatchSnapshot) -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            snapshot,
        }
    }
}
