use crate::{
    round::{RoundInput, Scored},
    types::{SeatIndex, SeatTally},
};

use super::{
    GameVariant, ValidationError, VariantPolicy, Verdict,
    input::{GameRules, check_headroom, extreme_seats, game_input},
    zero_tallies,
};

/// Dominos and uno rule table.
///
/// One ledger entry is one discrete game. Any seat may record a game; the
/// active seat still rotates so the next starter is tracked.
pub static POLICY: VariantPolicy = VariantPolicy {
    name: "series",
    strict_turns: false,
    starting_tallies: zero_tallies,
    validate,
    apply,
    target_reached,
    winners,
};

fn rules(variant: &GameVariant) -> GameRules {
    match variant {
        GameVariant::Dominos { .. } => GameRules {
            variant: "dominos",
            allow_negative: false,
            track_pips: true,
        },
        _ => GameRules {
            variant: "uno",
            allow_negative: false,
            track_pips: false,
        },
    }
}

fn target(variant: &GameVariant) -> i64 {
    match variant {
        GameVariant::Dominos { target } | GameVariant::Uno { target } => *target,
        _ => i64::MAX,
    }
}

fn validate(
    variant: &GameVariant,
    tallies: &[SeatTally],
    seat: SeatIndex,
    input: &RoundInput,
) -> Result<Verdict, ValidationError> {
    if seat >= tallies.len() {
        return Err(ValidationError::SeatOutOfRange {
            seat,
            seats: tallies.len(),
        });
    }
    let scored = game_input(rules(variant), tallies.len(), input)?;
    check_headroom(
        tallies,
        (0..tallies.len()).map(|other| (other, scored.value_for(other))),
    )?;
    Ok(Verdict::Accept(scored))
}

fn apply(_: &GameVariant, tallies: &mut [SeatTally], _: SeatIndex, scored: &Scored) {
    for (seat, tally) in tallies.iter_mut().enumerate() {
        tally.score = tally.score.saturating_add(scored.value_for(seat));
    }
    if let Some(winner) = scored.game_winner().and_then(|w| tallies.get_mut(w)) {
        winner.wins = winner.wins.saturating_add(1);
    }
}

fn target_reached(variant: &GameVariant, tallies: &[SeatTally]) -> bool {
    let target = target(variant);
    tallies.iter().any(|t| t.score >= target)
}

// Highest total among seats at or over the target; ties share the win.
fn winners(variant: &GameVariant, tallies: &[SeatTally]) -> Vec<SeatIndex> {
    let target = target(variant);
    extreme_seats(
        tallies
            .iter()
            .enumerate()
            .filter(|(_, t)| t.score >= target)
            .map(|(seat, t)| (seat, t.score)),
        false,
    )
}
