use serde::{Deserialize, Serialize};

use crate::{
    types::{SeatIndex, SeatTally},
    variant::GameVariant,
};

/// Final placement of one seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    /// Seat being ranked.
    pub seat: SeatIndex,
    /// Final score (remaining value for x01).
    pub score: i64,
    /// Discrete games won.
    pub wins: u32,
    /// Competition rank, 1-based; ties share a position.
    pub position: u32,
    /// Whether the seat is among the winners.
    pub is_winner: bool,
}

/// Terminal, immutable outcome of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalResult {
    /// Winning seats; several when the rules allow a tie.
    pub winners: Vec<SeatIndex>,
    /// Final running values, indexed by seat.
    pub tallies: Vec<SeatTally>,
    /// Ledger length at completion.
    pub round_count: usize,
    /// Every seat ranked, ordered by seat index.
    pub standings: Vec<Standing>,
}

impl FinalResult {
    pub(crate) fn compute(
        variant: &GameVariant,
        tallies: Vec<SeatTally>,
        winners: Vec<SeatIndex>,
        round_count: usize,
    ) -> Self {
        let lower_is_better = variant.lower_is_better();
        let beats = |a: i64, b: i64| if lower_is_better { a < b } else { a > b };

        let standings = tallies
            .iter()
            .enumerate()
            .map(|(seat, tally)| {
                let is_winner = winners.contains(&seat);
                let position = if is_winner {
                    1
                } else {
                    let ahead = tallies
                        .iter()
                        .enumerate()
                        .filter(|(other, t)| winners.contains(other) || beats(t.score, tally.score))
                        .count();
                    u32::try_from(ahead).unwrap_or(u32::MAX).saturating_add(1)
                };
                Standing {
                    seat,
                    score: tally.score,
                    wins: tally.wins,
                    position,
                    is_winner,
                }
            })
            .collect();

        Self {
            winners,
            tallies,
            round_count,
            standings,
        }
    }

    /// True when `seat` is among the winners.
    pub fn is_winner(&self, seat: SeatIndex) -> bool {
        self.winners.contains(&seat)
    }
}
