//! Input normalization shared by the variant policies.

use crate::{
    round::{GameScores, RoundInput, Scored},
    types::{SeatIndex, SeatTally},
};

use super::error::ValidationError;

/// Darts thrown per turn.
pub const DARTS_PER_ROUND: usize = 3;

/// Returns true when a single dart can score `value`.
pub fn is_valid_dart(value: i64) -> bool {
    match value {
        0..=20 | 25 | 50 => true,
        21..=40 => value % 2 == 0,
        41..=60 => value % 3 == 0,
        _ => false,
    }
}

/// Collapses a `Score` or `Darts` submission into one aggregate value.
///
/// Range checks on the aggregate are left to the calling policy.
pub fn points_input(variant: &'static str, input: &RoundInput) -> Result<Scored, ValidationError> {
    match input {
        RoundInput::Score { value } => Ok(Scored::Points {
            value: *value,
            darts: Vec::new(),
        }),
        RoundInput::Darts { darts, total } => {
            if darts.is_empty() {
                return Err(ValidationError::NoDarts);
            }
            if darts.len() > DARTS_PER_ROUND {
                return Err(ValidationError::TooManyDarts {
                    max: DARTS_PER_ROUND,
                    got: darts.len(),
                });
            }
            if let Some(bad) = darts.iter().copied().find(|d| !is_valid_dart(*d)) {
                return Err(ValidationError::InvalidDart(bad));
            }
            let darts_sum: i64 = darts.iter().sum();
            if let Some(total) = *total {
                if total != darts_sum {
                    return Err(ValidationError::DartsTotalMismatch { darts_sum, total });
                }
            }
            Ok(Scored::Points {
                value: darts_sum,
                darts: darts.clone(),
            })
        }
        RoundInput::Game(_) => Err(ValidationError::WrongInputShape {
            variant,
            expected: "a score or darts",
        }),
    }
}

/// Rules that differ between the games-based variants.
#[derive(Debug, Clone, Copy)]
pub struct GameRules {
    /// Variant name used in error messages.
    pub variant: &'static str,
    /// Whether negative deltas are accepted.
    pub allow_negative: bool,
    /// Whether pip counts may be supplied.
    pub track_pips: bool,
}

/// Validates a `Game` submission and resolves its winner.
pub fn game_input(
    rules: GameRules,
    seats: usize,
    input: &RoundInput,
) -> Result<Scored, ValidationError> {
    let RoundInput::Game(GameScores {
        scores,
        winner,
        pips,
    }) = input
    else {
        return Err(ValidationError::WrongInputShape {
            variant: rules.variant,
            expected: "per-game scores",
        });
    };

    if scores.len() != seats {
        return Err(ValidationError::ScoreCountMismatch {
            expected: seats,
            got: scores.len(),
        });
    }
    if !rules.allow_negative {
        if let Some(bad) = scores.iter().copied().find(|s| *s < 0) {
            return Err(ValidationError::NegativeScore(bad));
        }
    }
    if !pips.is_empty() {
        if !rules.track_pips {
            return Err(ValidationError::PipsNotTracked {
                variant: rules.variant,
            });
        }
        if pips.len() != seats {
            return Err(ValidationError::PipCountMismatch {
                expected: seats,
                got: pips.len(),
            });
        }
    }

    let winner = match *winner {
        Some(seat) if seat >= seats => {
            return Err(ValidationError::WinnerOutOfRange { seat, seats });
        }
        Some(seat) => seat,
        None => top_scorer(scores).ok_or(ValidationError::UndecidedGame)?,
    };

    Ok(Scored::Game {
        scores: scores.clone(),
        winner,
        pips: pips.clone(),
    })
}

/// Fails when adding any `(seat, delta)` would overflow that seat's score.
pub fn check_headroom(
    tallies: &[SeatTally],
    deltas: impl IntoIterator<Item = (SeatIndex, i64)>,
) -> Result<(), ValidationError> {
    for (seat, delta) in deltas {
        let Some(tally) = tallies.get(seat) else {
            continue;
        };
        if tally.score.checked_add(delta).is_none() {
            return Err(ValidationError::ScoreOverflow { seat });
        }
    }
    Ok(())
}

/// Seat with the highest strictly-positive delta, lowest index on ties.
fn top_scorer(scores: &[i64]) -> Option<SeatIndex> {
    let mut best: Option<(SeatIndex, i64)> = None;
    for (seat, score) in scores.iter().copied().enumerate() {
        if score <= 0 {
            continue;
        }
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((seat, score));
        }
    }
    best.map(|(seat, _)| seat)
}

/// Seats whose score equals the extreme selected by `lower_is_better`.
pub fn extreme_seats(
    scores: impl IntoIterator<Item = (SeatIndex, i64)>,
    lower_is_better: bool,
) -> Vec<SeatIndex> {
    let scores: Vec<(SeatIndex, i64)> = scores.into_iter().collect();
    let best = if lower_is_better {
        scores.iter().map(|(_, s)| *s).min()
    } else {
        scores.iter().map(|(_, s)| *s).max()
    };
    let Some(best) = best else {
        return Vec::new();
    };
    scores
        .into_iter()
        .filter(|(_, s)| *s == best)
        .map(|(seat, _)| seat)
        .collect()
}
