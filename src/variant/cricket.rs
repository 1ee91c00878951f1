use crate::{
    round::{RoundInput, Scored},
    types::{SeatIndex, SeatTally},
};

use super::{
    CricketMode, GameVariant, ValidationError, VariantPolicy, Verdict,
    input::{check_headroom, extreme_seats, points_input},
    zero_tallies,
};

/// Cricket rule table.
///
/// Rounds carry points only. Standard cricket credits the thrower, cut-throat
/// credits every opponent instead; the ledger mechanics are identical.
pub static POLICY: VariantPolicy = VariantPolicy {
    name: "cricket",
    strict_turns: true,
    starting_tallies: zero_tallies,
    validate,
    apply,
    target_reached,
    winners,
};

fn params(variant: &GameVariant) -> (CricketMode, i64) {
    match variant {
        GameVariant::Cricket { mode, target } => (*mode, *target),
        _ => (CricketMode::Standard, i64::MAX),
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
    let scored = points_input(POLICY.name, input)?;
    let value = scored.value_for(seat);
    if value < 0 {
        return Err(ValidationError::NegativeScore(value));
    }
    match params(variant).0 {
        CricketMode::Standard => check_headroom(tallies, [(seat, value)])?,
        CricketMode::CutThroat => check_headroom(
            tallies,
            (0..tallies.len())
                .filter(|other| *other != seat)
                .map(|other| (other, value)),
        )?,
    }
    Ok(Verdict::Accept(scored))
}

fn apply(variant: &GameVariant, tallies: &mut [SeatTally], seat: SeatIndex, scored: &Scored) {
    let value = scored.value_for(seat);
    match params(variant).0 {
        CricketMode::Standard => {
            if let Some(tally) = tallies.get_mut(seat) {
                tally.score = tally.score.saturating_add(value);
            }
        }
        CricketMode::CutThroat => {
            for (idx, tally) in tallies.iter_mut().enumerate() {
                if idx != seat {
                    tally.score = tally.score.saturating_add(value);
                }
            }
        }
    }
}

fn target_reached(variant: &GameVariant, tallies: &[SeatTally]) -> bool {
    let (_, target) = params(variant);
    tallies.iter().any(|t| t.score >= target)
}

fn winners(variant: &GameVariant, tallies: &[SeatTally]) -> Vec<SeatIndex> {
    let lower_is_better = params(variant).0 == CricketMode::CutThroat;
    extreme_seats(
        tallies.iter().enumerate().map(|(seat, t)| (seat, t.score)),
        lower_is_better,
    )
}
