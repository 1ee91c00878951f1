//! Shared primitive IDs, seats, and per-seat running values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Storage row identifier of a match.
pub type MatchId = u64;
/// Stable 0-based turn slot of a participant.
pub type SeatIndex = usize;
/// Sequential position of a round within a ledger.
pub type RoundIndex = u32;
/// Storage row identifier of a custom game configuration.
pub type ConfigId = u64;
/// Storage row identifier of a player.
pub type PlayerId = u64;

/// Overall match lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Scoring is live; submissions are accepted.
    InProgress,
    /// A terminal condition was reached.
    Completed,
}

impl MatchStatus {
    /// Column value used by storage backends.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Parses a storage column value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A participant bound to a seat for the lifetime of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    /// Turn slot, equal to the seat's position in the seat list.
    pub index: SeatIndex,
    /// Player identity occupying the seat.
    pub player_id: PlayerId,
    /// Display name captured when the match started.
    pub name: String,
}

impl Seat {
    /// Builds a seat.
    pub fn new(index: SeatIndex, player_id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            index,
            player_id,
            name: name.into(),
        }
    }
}

/// Running value of one seat.
///
/// `score` holds the remaining value for x01 and accumulated points for every
/// other variant. `wins` counts discrete games won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SeatTally {
    /// Remaining value or accumulated points.
    pub score: i64,
    /// Discrete games won.
    pub wins: u32,
}

impl SeatTally {
    /// Tally with the given score and no wins.
    pub const fn with_score(score: i64) -> Self {
        Self { score, wins: 0 }
    }
}
