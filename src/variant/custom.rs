use serde::{Deserialize, Serialize};

use crate::{
    round::{RoundInput, Scored},
    types::{ConfigId, SeatIndex, SeatTally},
};

use super::{
    GameVariant, ValidationError, VariantPolicy, Verdict,
    input::{GameRules, check_headroom, extreme_seats, game_input},
    zero_tallies,
};

/// What a seat's running score counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMethod {
    /// Sum of submitted points.
    Points,
    /// One point per game won.
    GamesWon,
    /// One point per round won.
    Rounds,
}

/// When a custom match is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinCondition {
    /// First to reach `target_value`.
    TargetScore,
    /// Majority of `target_value` games.
    BestOfGames,
    /// Highest score when the match is explicitly ended.
    MostPoints,
}

/// Stored configuration of a user-defined game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomGameConfig {
    /// Storage row id.
    pub id: ConfigId,
    /// Display name.
    pub name: String,
    /// What the running score counts.
    pub scoring_method: ScoringMethod,
    /// Terminal condition.
    pub win_condition: WinCondition,
    /// Target score, or N for best-of-N.
    pub target_value: i64,
    /// Ledger entries are discrete games rather than raw scores.
    #[serde(default)]
    pub track_individual_games: bool,
    /// Negative submissions are accepted.
    #[serde(default)]
    pub allow_negative: bool,
    /// Minimum participants.
    #[serde(default = "default_min_players")]
    pub min_players: usize,
    /// Maximum participants.
    #[serde(default = "default_max_players")]
    pub max_players: usize,
}

fn default_min_players() -> usize {
    1
}

fn default_max_players() -> usize {
    16
}

impl CustomGameConfig {
    /// Config with default player bounds and untracked games.
    pub fn new(
        id: ConfigId,
        name: impl Into<String>,
        scoring_method: ScoringMethod,
        win_condition: WinCondition,
        target_value: i64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            scoring_method,
            win_condition,
            target_value,
            track_individual_games: false,
            allow_negative: false,
            min_players: default_min_players(),
            max_players: default_max_players(),
        }
    }

    /// Games needed to take a best-of-N match.
    pub fn games_to_win(&self) -> u32 {
        let n = u32::try_from(self.target_value.max(0)).unwrap_or(u32::MAX);
        n / 2 + 1
    }

    fn games_won(&self, tally: &SeatTally) -> i64 {
        if self.track_individual_games {
            i64::from(tally.wins)
        } else {
            tally.score
        }
    }
}

/// Custom game rule table, parameterised by [`CustomGameConfig`].
pub static POLICY: VariantPolicy = VariantPolicy {
    name: "custom",
    strict_turns: false,
    starting_tallies: zero_tallies,
    validate,
    apply,
    target_reached,
    winners,
};

fn config(variant: &GameVariant) -> Option<&CustomGameConfig> {
    match variant {
        GameVariant::Custom(config) => Some(config),
        _ => None,
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
    let Some(config) = config(variant) else {
        return Err(ValidationError::WrongInputShape {
            variant: POLICY.name,
            expected: "a custom configuration",
        });
    };

    if config.track_individual_games {
        let rules = GameRules {
            variant: POLICY.name,
            allow_negative: config.allow_negative,
            track_pips: false,
        };
        let scored = game_input(rules, tallies.len(), input)?;
        match (&scored, config.scoring_method) {
            (_, ScoringMethod::Points) => check_headroom(
                tallies,
                (0..tallies.len()).map(|other| (other, scored.value_for(other))),
            )?,
            (Scored::Game { winner, .. }, _) => check_headroom(tallies, [(*winner, 1)])?,
            (Scored::Points { .. }, _) => {}
        }
        return Ok(Verdict::Accept(scored));
    }

    let RoundInput::Score { value } = *input else {
        return Err(ValidationError::WrongInputShape {
            variant: POLICY.name,
            expected: "a single score",
        });
    };
    if value < 0 && !config.allow_negative {
        return Err(ValidationError::NegativeScore(value));
    }
    check_headroom(tallies, [(seat, value)])?;
    Ok(Verdict::Accept(Scored::Points {
        value,
        darts: Vec::new(),
    }))
}

fn apply(variant: &GameVariant, tallies: &mut [SeatTally], seat: SeatIndex, scored: &Scored) {
    let Some(config) = config(variant) else {
        return;
    };
    match scored {
        Scored::Points { value, .. } => {
            if let Some(tally) = tallies.get_mut(seat) {
                tally.score = tally.score.saturating_add(*value);
            }
        }
        Scored::Game { winner, .. } => {
            if config.scoring_method == ScoringMethod::Points {
                for (idx, tally) in tallies.iter_mut().enumerate() {
                    tally.score = tally.score.saturating_add(scored.value_for(idx));
                }
            }
            if let Some(tally) = tallies.get_mut(*winner) {
                tally.wins = tally.wins.saturating_add(1);
                if config.scoring_method != ScoringMethod::Points {
                    tally.score = tally.score.saturating_add(1);
                }
            }
        }
    }
}

fn target_reached(variant: &GameVariant, tallies: &[SeatTally]) -> bool {
    let Some(config) = config(variant) else {
        return false;
    };
    match config.win_condition {
        WinCondition::TargetScore => tallies.iter().any(|t| t.score >= config.target_value),
        WinCondition::BestOfGames => {
            let needed = i64::from(config.games_to_win());
            tallies.iter().any(|t| config.games_won(t) >= needed)
        }
        WinCondition::MostPoints => false,
    }
}

fn winners(variant: &GameVariant, tallies: &[SeatTally]) -> Vec<SeatIndex> {
    let Some(config) = config(variant) else {
        return Vec::new();
    };
    let seats = tallies.iter().enumerate();
    match config.win_condition {
        WinCondition::TargetScore => extreme_seats(
            seats
                .filter(|(_, t)| t.score >= config.target_value)
                .map(|(seat, t)| (seat, t.score)),
            false,
        ),
        WinCondition::BestOfGames => {
            let needed = i64::from(config.games_to_win());
            extreme_seats(
                seats
                    .map(|(seat, t)| (seat, config.games_won(t)))
                    .filter(|(_, won)| *won >= needed),
                false,
            )
        }
        WinCondition::MostPoints => extreme_seats(seats.map(|(seat, t)| (seat, t.score)), false),
    }
}
