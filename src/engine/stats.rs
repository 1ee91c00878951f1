use serde::{Deserialize, Serialize};

use crate::{
    round::Scored,
    types::SeatIndex,
    variant::input::DARTS_PER_ROUND,
};

use super::state::MatchScoringState;

/// Per-seat figures derived from the ledger. Busts leave no trace and are
/// not counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeatStats {
    /// Seat described.
    pub seat: SeatIndex,
    /// Rounds this seat took part in.
    pub rounds: u32,
    /// Points the seat itself scored.
    pub points: i64,
    /// Highest single-round score.
    pub best_round: i64,
    /// Discrete games won.
    pub games_won: u32,
    /// Darts thrown; aggregate entries count as a full turn.
    pub darts: u32,
}

impl SeatStats {
    /// Points per three darts, for darts variants.
    pub fn three_dart_average(&self) -> Option<f64> {
        if self.darts == 0 {
            return None;
        }
        Some(self.points as f64 * DARTS_PER_ROUND as f64 / f64::from(self.darts))
    }
}

impl MatchScoringState {
    /// Statistics for every seat, ordered by seat index.
    pub fn seat_stats(&self) -> Vec<SeatStats> {
        let darts_variant = self.variant.is_darts();
        let mut stats: Vec<SeatStats> = (0..self.seats.len())
            .map(|seat| SeatStats {
                seat,
                ..SeatStats::default()
            })
            .collect();

        for round in self.ledger.rounds() {
            match &round.scored {
                Scored::Points { value, darts } => {
                    let Some(s) = stats.get_mut(round.seat) else {
                        continue;
                    };
                    s.rounds += 1;
                    s.points = s.points.saturating_add(*value);
                    s.best_round = s.best_round.max(*value);
                    if darts_variant {
                        let thrown = if darts.is_empty() {
                            DARTS_PER_ROUND
                        } else {
                            darts.len()
                        };
                        s.darts += u32::try_from(thrown).unwrap_or(0);
                    }
                }
                Scored::Game { scores, winner, .. } => {
                    for (seat, s) in stats.iter_mut().enumerate() {
                        let delta = scores.get(seat).copied().unwrap_or(0);
                        s.rounds += 1;
                        s.points = s.points.saturating_add(delta);
                        s.best_round = s.best_round.max(delta);
                        if seat == *winner {
                            s.games_won += 1;
                        }
                    }
                }
            }
        }
        stats
    }
}
