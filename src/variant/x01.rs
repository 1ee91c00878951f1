use crate::{
    round::{RoundInput, Scored},
    types::{SeatIndex, SeatTally},
};

use super::{
    GameVariant, ValidationError, VariantPolicy, Verdict,
    input::points_input,
};

/// Highest score three darts can make.
pub const MAX_ROUND_SCORE: i64 = 180;

/// X01 rule table.
pub static POLICY: VariantPolicy = VariantPolicy {
    name: "x01",
    strict_turns: true,
    starting_tallies,
    validate,
    apply,
    target_reached,
    winners,
};

fn starting_tallies(variant: &GameVariant, seats: usize) -> Vec<SeatTally> {
    let start = match variant {
        GameVariant::X01 { start } => *start,
        _ => 0,
    };
    vec![SeatTally::with_score(start); seats]
}

fn validate(
    _: &GameVariant,
    tallies: &[SeatTally],
    seat: SeatIndex,
    input: &RoundInput,
) -> Result<Verdict, ValidationError> {
    let remaining = tallies
        .get(seat)
        .ok_or(ValidationError::SeatOutOfRange {
            seat,
            seats: tallies.len(),
        })?
        .score;

    let scored = points_input(POLICY.name, input)?;
    let value = scored.value_for(seat);
    if value <= 0 {
        return Err(ValidationError::NonPositiveScore(value));
    }
    // Overshooting the remaining value is a bust even past the three-dart maximum.
    if value > remaining {
        return Ok(Verdict::Bust);
    }
    if value > MAX_ROUND_SCORE {
        return Err(ValidationError::ScoreAboveMaximum {
            score: value,
            max: MAX_ROUND_SCORE,
        });
    }
    Ok(Verdict::Accept(scored))
}

fn apply(_: &GameVariant, tallies: &mut [SeatTally], seat: SeatIndex, scored: &Scored) {
    let Some(tally) = tallies.get_mut(seat) else {
        return;
    };
    tally.score -= scored.value_for(seat);
    if tally.score == 0 {
        tally.wins = tally.wins.saturating_add(1);
    }
}

// Checkout is exactly zero; any positive remainder keeps the leg open.
fn target_reached(_: &GameVariant, tallies: &[SeatTally]) -> bool {
    tallies.iter().any(|t| t.score == 0)
}

fn winners(_: &GameVariant, tallies: &[SeatTally]) -> Vec<SeatIndex> {
    tallies
        .iter()
        .enumerate()
        .filter(|(_, t)| t.score == 0)
        .map(|(seat, _)| seat)
        .collect()
}
