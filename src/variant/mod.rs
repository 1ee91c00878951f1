//! Game variant registry.
//!
//! Each supported game kind is a [`VariantPolicy`]: a plain table of pure
//! functions. [`GameVariant::policy`] maps a resolved variant to its table.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    round::{RoundInput, Scored},
    types::{ConfigId, SeatIndex, SeatTally},
};

/// Cricket darts policy.
pub mod cricket;
/// Custom game configuration and policy.
pub mod custom;
/// Validation and parse errors.
pub mod error;
/// Input normalization helpers.
pub mod input;
/// Dominos and uno multi-game series policy.
pub mod series;
/// X01 darts policy.
pub mod x01;

pub use custom::{CustomGameConfig, ScoringMethod, WinCondition};
pub use error::{ValidationError, VariantParseError};

/// X01 starting values.
pub const X01_STARTS: [i64; 5] = [301, 401, 501, 701, 901];

/// Cricket sub-variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CricketMode {
    /// Points go to the thrower; highest wins.
    Standard,
    /// Points go to every opponent; lowest wins.
    CutThroat,
}

/// How a variant decides that a match is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetKind {
    /// A seat's remaining value reaches exactly zero.
    ExactZero,
    /// A seat's score reaches or exceeds a target.
    ThresholdReached,
    /// A seat wins a majority of N games.
    BestOfN,
    /// Only ended explicitly; highest score wins.
    MostPoints,
}

/// Inclusive participant count bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatBounds {
    /// Minimum participants.
    pub min: usize,
    /// Maximum participants.
    pub max: usize,
}

impl SeatBounds {
    /// Returns true when `count` lies within the bounds.
    pub fn contains(&self, count: usize) -> bool {
        (self.min..=self.max).contains(&count)
    }
}

/// Variant identifier as stored with a match row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VariantId {
    /// X01 darts with the given starting value.
    X01(i64),
    /// Cricket darts.
    Cricket(CricketMode),
    /// Dominos series.
    Dominos,
    /// Uno series.
    Uno,
    /// User-defined game resolved from stored configuration.
    Custom(ConfigId),
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X01(start) => write!(f, "x01:{start}"),
            Self::Cricket(CricketMode::Standard) => f.write_str("cricket:standard"),
            Self::Cricket(CricketMode::CutThroat) => f.write_str("cricket:cut-throat"),
            Self::Dominos => f.write_str("dominos"),
            Self::Uno => f.write_str("uno"),
            Self::Custom(id) => write!(f, "custom:{id}"),
        }
    }
}

impl FromStr for VariantId {
    type Err = VariantParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (head, tail) = match s.split_once(':') {
            Some((head, tail)) => (head, Some(tail)),
            None => (s, None),
        };
        match (head, tail) {
            ("x01", None) => Ok(Self::X01(501)),
            ("x01", Some(start)) => start
                .parse::<i64>()
                .ok()
                .filter(|v| X01_STARTS.contains(v))
                .map(Self::X01)
                .ok_or_else(|| VariantParseError::X01Start(start.to_string())),
            ("cricket", None | Some("standard")) => Ok(Self::Cricket(CricketMode::Standard)),
            ("cricket", Some("cut-throat")) => Ok(Self::Cricket(CricketMode::CutThroat)),
            ("cricket", Some(mode)) => Err(VariantParseError::CricketMode(mode.to_string())),
            ("dominos", None) => Ok(Self::Dominos),
            ("uno", None) => Ok(Self::Uno),
            ("custom", Some(id)) => id
                .parse::<ConfigId>()
                .map(Self::Custom)
                .map_err(|_| VariantParseError::ConfigId(id.to_string())),
            _ => Err(VariantParseError::Unknown(s.to_string())),
        }
    }
}

impl TryFrom<String> for VariantId {
    type Error = VariantParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VariantId> for String {
    fn from(value: VariantId) -> Self {
        value.to_string()
    }
}

impl VariantId {
    /// Resolves the ruleset, loading custom configurations with `load_custom`.
    pub fn resolve<E>(
        &self,
        settings: &VariantSettings,
        load_custom: impl FnOnce(ConfigId) -> Result<CustomGameConfig, E>,
    ) -> Result<GameVariant, E> {
        Ok(match *self {
            Self::X01(start) => GameVariant::X01 { start },
            Self::Cricket(mode) => GameVariant::Cricket {
                mode,
                target: settings.cricket_target,
            },
            Self::Dominos => GameVariant::Dominos {
                target: settings.dominos_target,
            },
            Self::Uno => GameVariant::Uno {
                target: settings.uno_target,
            },
            Self::Custom(id) => GameVariant::Custom(load_custom(id)?),
        })
    }

    /// Resolves a built-in variant; `None` for custom ids.
    pub fn resolve_builtin(&self, settings: &VariantSettings) -> Option<GameVariant> {
        self.resolve(settings, |_| Err(())).ok()
    }
}

/// Default targets for built-in variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantSettings {
    /// Points needed to end a cricket match.
    pub cricket_target: i64,
    /// Points needed to end a dominos match.
    pub dominos_target: i64,
    /// Points needed to end an uno match.
    pub uno_target: i64,
}

impl Default for VariantSettings {
    fn default() -> Self {
        Self {
            cricket_target: 200,
            dominos_target: 150,
            uno_target: 500,
        }
    }
}

/// Fully resolved ruleset. Immutable once a match starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameVariant {
    /// X01 darts.
    X01 {
        /// Starting remaining value.
        start: i64,
    },
    /// Cricket darts.
    Cricket {
        /// Sub-variant.
        mode: CricketMode,
        /// Points that end the match.
        target: i64,
    },
    /// Dominos series.
    Dominos {
        /// Points that end the match.
        target: i64,
    },
    /// Uno series.
    Uno {
        /// Points that end the match.
        target: i64,
    },
    /// User-defined game.
    Custom(CustomGameConfig),
}

impl GameVariant {
    /// Identifier stored with the match row.
    pub fn id(&self) -> VariantId {
        match self {
            Self::X01 { start } => VariantId::X01(*start),
            Self::Cricket { mode, .. } => VariantId::Cricket(*mode),
            Self::Dominos { .. } => VariantId::Dominos,
            Self::Uno { .. } => VariantId::Uno,
            Self::Custom(config) => VariantId::Custom(config.id),
        }
    }

    /// Rule table for this variant.
    pub fn policy(&self) -> &'static VariantPolicy {
        match self {
            Self::X01 { .. } => &x01::POLICY,
            Self::Cricket { .. } => &cricket::POLICY,
            Self::Dominos { .. } | Self::Uno { .. } => &series::POLICY,
            Self::Custom(_) => &custom::POLICY,
        }
    }

    /// Participant count bounds.
    pub fn seat_bounds(&self) -> SeatBounds {
        match self {
            Self::X01 { .. } => SeatBounds { min: 1, max: 8 },
            Self::Cricket { .. } | Self::Dominos { .. } => SeatBounds { min: 2, max: 4 },
            Self::Uno { .. } => SeatBounds { min: 2, max: 10 },
            Self::Custom(config) => SeatBounds {
                min: config.min_players,
                max: config.max_players,
            },
        }
    }

    /// Terminal condition kind.
    pub fn target_kind(&self) -> TargetKind {
        match self {
            Self::X01 { .. } => TargetKind::ExactZero,
            Self::Cricket { .. } | Self::Dominos { .. } | Self::Uno { .. } => {
                TargetKind::ThresholdReached
            }
            Self::Custom(config) => match config.win_condition {
                WinCondition::TargetScore => TargetKind::ThresholdReached,
                WinCondition::BestOfGames => TargetKind::BestOfN,
                WinCondition::MostPoints => TargetKind::MostPoints,
            },
        }
    }

    /// True when a lower final score ranks higher.
    pub fn lower_is_better(&self) -> bool {
        matches!(
            self,
            Self::X01 { .. }
                | Self::Cricket {
                    mode: CricketMode::CutThroat,
                    ..
                }
        )
    }

    /// True for darts variants, which report a three-dart average.
    pub fn is_darts(&self) -> bool {
        matches!(self, Self::X01 { .. } | Self::Cricket { .. })
    }
}

/// Outcome of validating a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Submission is valid and will be appended.
    Accept(Scored),
    /// X01 overshoot: turn is lost, nothing is recorded.
    Bust,
}

/// Strategy table describing one variant's rules.
///
/// Every function is pure; state only flows through arguments.
pub struct VariantPolicy {
    /// Human-readable policy name.
    pub name: &'static str,
    /// Whether only the active seat may submit.
    pub strict_turns: bool,
    /// Running values at the start of a match.
    pub starting_tallies: fn(&GameVariant, usize) -> Vec<SeatTally>,
    /// Checks a submission against the current running values.
    pub validate:
        fn(&GameVariant, &[SeatTally], SeatIndex, &RoundInput) -> Result<Verdict, ValidationError>,
    /// Applies a validated submission to the running values.
    pub apply: fn(&GameVariant, &mut [SeatTally], SeatIndex, &Scored),
    /// Terminal condition.
    pub target_reached: fn(&GameVariant, &[SeatTally]) -> bool,
    /// Winner selection once terminal (or explicitly ended).
    pub winners: fn(&GameVariant, &[SeatTally]) -> Vec<SeatIndex>,
}

impl fmt::Debug for VariantPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantPolicy")
            .field("name", &self.name)
            .field("strict_turns", &self.strict_turns)
            .finish_non_exhaustive()
    }
}

pub(crate) fn zero_tallies(_: &GameVariant, seats: usize) -> Vec<SeatTally> {
    vec![SeatTally::default(); seats]
}
