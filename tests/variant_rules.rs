mod common;

use scorekeep::{
    round::{GameScores, RoundInput, Scored},
    types::SeatTally,
    variant::{
        CricketMode, GameVariant, TargetKind, ValidationError, VariantId, VariantParseError,
        VariantSettings, Verdict, input::is_valid_dart,
    },
};

use common::{running_score_config, tracked_games_config};

fn validate(
    variant: &GameVariant,
    tallies: &[SeatTally],
    seat: usize,
    input: &RoundInput,
) -> Result<Verdict, ValidationError> {
    (variant.policy().validate)(variant, tallies, seat, input)
}

#[test]
fn variant_ids_round_trip_through_strings() {
    for raw in [
        "x01:301",
        "x01:901",
        "cricket:standard",
        "cricket:cut-throat",
        "dominos",
        "uno",
        "custom:42",
    ] {
        let id: VariantId = raw.parse().expect("parse");
        assert_eq!(id.to_string(), raw);
    }
    assert_eq!("x01".parse::<VariantId>(), Ok(VariantId::X01(501)));
    assert_eq!(
        "cricket".parse::<VariantId>(),
        Ok(VariantId::Cricket(CricketMode::Standard))
    );
}

#[test]
fn unknown_variant_ids_are_rejected() {
    assert!(matches!(
        "x01:500".parse::<VariantId>(),
        Err(VariantParseError::X01Start(_))
    ));
    assert!(matches!(
        "cricket:mickey".parse::<VariantId>(),
        Err(VariantParseError::CricketMode(_))
    ));
    assert!(matches!(
        "custom:abc".parse::<VariantId>(),
        Err(VariantParseError::ConfigId(_))
    ));
    assert!(matches!(
        "poker".parse::<VariantId>(),
        Err(VariantParseError::Unknown(_))
    ));
}

#[test]
fn builtins_resolve_with_settings() {
    let settings = VariantSettings {
        dominos_target: 250,
        ..VariantSettings::default()
    };
    assert_eq!(
        VariantId::Dominos.resolve_builtin(&settings),
        Some(GameVariant::Dominos { target: 250 })
    );
    assert_eq!(VariantId::Custom(3).resolve_builtin(&settings), None);
    assert_eq!(
        VariantId::X01(701).resolve_builtin(&settings),
        Some(GameVariant::X01 { start: 701 })
    );
}

#[test]
fn x01_starts_at_its_numeric_name() {
    let variant = GameVariant::X01 { start: 301 };
    let start = (variant.policy().starting_tallies)(&variant, 3);
    assert_eq!(start, vec![SeatTally::with_score(301); 3]);
    assert_eq!(variant.target_kind(), TargetKind::ExactZero);
}

#[test]
fn single_dart_values() {
    for ok in [0, 1, 20, 25, 50, 22, 40, 42, 57, 60] {
        assert!(is_valid_dart(ok), "{ok} should be valid");
    }
    for bad in [-1, 21, 23, 41, 44, 59, 61, 75] {
        assert!(!is_valid_dart(bad), "{bad} should be invalid");
    }
}

#[test]
fn x01_rejects_non_positive_and_over_maximum_scores() {
    let variant = GameVariant::X01 { start: 501 };
    let tallies = [SeatTally::with_score(501)];
    assert_eq!(
        validate(&variant, &tallies, 0, &RoundInput::score(0)),
        Err(ValidationError::NonPositiveScore(0))
    );
    assert_eq!(
        validate(&variant, &tallies, 0, &RoundInput::score(-5)),
        Err(ValidationError::NonPositiveScore(-5))
    );
    assert_eq!(
        validate(&variant, &tallies, 0, &RoundInput::score(181)),
        Err(ValidationError::ScoreAboveMaximum {
            score: 181,
            max: 180
        })
    );
}

#[test]
fn x01_overshoot_is_a_bust_not_an_error() {
    let variant = GameVariant::X01 { start: 501 };
    let tallies = [SeatTally::with_score(60)];
    assert_eq!(
        validate(&variant, &tallies, 0, &RoundInput::score(65)),
        Ok(Verdict::Bust)
    );
    assert!(matches!(
        validate(&variant, &tallies, 0, &RoundInput::score(60)),
        Ok(Verdict::Accept(_))
    ));
}

#[test]
fn granular_darts_must_match_their_total() {
    let variant = GameVariant::X01 { start: 501 };
    let tallies = [SeatTally::with_score(501)];

    let ok = validate(
        &variant,
        &tallies,
        0,
        &RoundInput::Darts {
            darts: vec![60, 60, 57],
            total: Some(177),
        },
    );
    assert_eq!(
        ok,
        Ok(Verdict::Accept(Scored::Points {
            value: 177,
            darts: vec![60, 60, 57],
        }))
    );

    assert_eq!(
        validate(
            &variant,
            &tallies,
            0,
            &RoundInput::Darts {
                darts: vec![20, 20],
                total: Some(60),
            }
        ),
        Err(ValidationError::DartsTotalMismatch {
            darts_sum: 40,
            total: 60
        })
    );
    assert_eq!(
        validate(&variant, &tallies, 0, &RoundInput::darts([20, 20, 20, 20])),
        Err(ValidationError::TooManyDarts { max: 3, got: 4 })
    );
    assert_eq!(
        validate(&variant, &tallies, 0, &RoundInput::darts([61])),
        Err(ValidationError::InvalidDart(61))
    );
    assert_eq!(
        validate(&variant, &tallies, 0, &RoundInput::darts(Vec::<i64>::new())),
        Err(ValidationError::NoDarts)
    );
}

#[test]
fn darts_variants_refuse_game_input() {
    let variant = GameVariant::X01 { start: 501 };
    let err = validate(
        &variant,
        &[SeatTally::with_score(501), SeatTally::with_score(501)],
        0,
        &RoundInput::game([10, 0]),
    )
    .unwrap_err();
    assert!(matches!(err, ValidationError::WrongInputShape { .. }));
}

#[test]
fn cricket_credits_thrower_or_opponents() {
    let standard = GameVariant::Cricket {
        mode: CricketMode::Standard,
        target: 200,
    };
    let cut_throat = GameVariant::Cricket {
        mode: CricketMode::CutThroat,
        target: 200,
    };
    let scored = Scored::Points {
        value: 40,
        darts: vec![],
    };

    let mut tallies = vec![SeatTally::default(); 3];
    (standard.policy().apply)(&standard, &mut tallies, 1, &scored);
    assert_eq!(
        tallies.iter().map(|t| t.score).collect::<Vec<_>>(),
        vec![0, 40, 0]
    );

    let mut tallies = vec![SeatTally::default(); 3];
    (cut_throat.policy().apply)(&cut_throat, &mut tallies, 1, &scored);
    assert_eq!(
        tallies.iter().map(|t| t.score).collect::<Vec<_>>(),
        vec![40, 0, 40]
    );

    assert!(cut_throat.lower_is_better());
    assert!(!standard.lower_is_better());
}

#[test]
fn cricket_accepts_zero_point_rounds() {
    let variant = GameVariant::Cricket {
        mode: CricketMode::Standard,
        target: 200,
    };
    let tallies = [SeatTally::default(), SeatTally::default()];
    assert!(matches!(
        validate(&variant, &tallies, 0, &RoundInput::score(0)),
        Ok(Verdict::Accept(_))
    ));
    assert_eq!(
        validate(&variant, &tallies, 0, &RoundInput::score(-1)),
        Err(ValidationError::NegativeScore(-1))
    );
}

#[test]
fn dominos_game_winner_defaults_to_top_scorer() {
    let variant = GameVariant::Dominos { target: 150 };
    let tallies = vec![SeatTally::default(); 3];
    let verdict = validate(&variant, &tallies, 2, &RoundInput::game([15, 35, 35])).unwrap();
    assert_eq!(
        verdict,
        Verdict::Accept(Scored::Game {
            scores: vec![15, 35, 35],
            winner: 1,
            pips: vec![],
        })
    );
}

#[test]
fn dominos_tracks_pips_but_uno_does_not() {
    let dominos = GameVariant::Dominos { target: 150 };
    let uno = GameVariant::Uno { target: 500 };
    let tallies = vec![SeatTally::default(); 2];
    let with_pips = RoundInput::Game(GameScores {
        scores: vec![25, 0],
        winner: Some(0),
        pips: vec![0, 23],
    });

    assert!(validate(&dominos, &tallies, 0, &with_pips).is_ok());
    assert_eq!(
        validate(&uno, &tallies, 0, &with_pips),
        Err(ValidationError::PipsNotTracked { variant: "uno" })
    );
    assert_eq!(
        validate(
            &dominos,
            &tallies,
            0,
            &RoundInput::Game(GameScores {
                scores: vec![25, 0],
                winner: None,
                pips: vec![3],
            })
        ),
        Err(ValidationError::PipCountMismatch {
            expected: 2,
            got: 1
        })
    );
}

#[test]
fn series_games_validate_shape_and_sign() {
    let variant = GameVariant::Uno { target: 500 };
    let tallies = vec![SeatTally::default(); 3];
    assert_eq!(
        validate(&variant, &tallies, 0, &RoundInput::game([10, 0])),
        Err(ValidationError::ScoreCountMismatch {
            expected: 3,
            got: 2
        })
    );
    assert_eq!(
        validate(&variant, &tallies, 0, &RoundInput::game([10, -3, 0])),
        Err(ValidationError::NegativeScore(-3))
    );
    assert_eq!(
        validate(&variant, &tallies, 0, &RoundInput::game([0, 0, 0])),
        Err(ValidationError::UndecidedGame)
    );
    assert_eq!(
        validate(
            &variant,
            &tallies,
            0,
            &RoundInput::Game(GameScores {
                scores: vec![0, 0, 0],
                winner: Some(5),
                pips: vec![],
            })
        ),
        Err(ValidationError::WinnerOutOfRange { seat: 5, seats: 3 })
    );
    assert_eq!(
        validate(&variant, &tallies, 0, &RoundInput::score(20)),
        Err(ValidationError::WrongInputShape {
            variant: "uno",
            expected: "per-game scores"
        })
    );
}

#[test]
fn custom_negative_scores_follow_config() {
    let strict = GameVariant::Custom(running_score_config(1, 500));
    let lenient = GameVariant::Custom(scorekeep::variant::CustomGameConfig {
        allow_negative: true,
        ..running_score_config(2, 500)
    });
    let tallies = vec![SeatTally::default(); 2];

    assert_eq!(
        validate(&strict, &tallies, 0, &RoundInput::score(-10)),
        Err(ValidationError::NegativeScore(-10))
    );
    assert!(validate(&lenient, &tallies, 0, &RoundInput::score(-10)).is_ok());
    assert!(matches!(
        validate(&strict, &tallies, 0, &RoundInput::darts([20])),
        Err(ValidationError::WrongInputShape { .. })
    ));
}

#[test]
fn custom_best_of_needs_a_majority() {
    use scorekeep::variant::{ScoringMethod, WinCondition};

    let config = tracked_games_config(3, ScoringMethod::GamesWon, WinCondition::BestOfGames, 5);
    assert_eq!(config.games_to_win(), 3);
    let variant = GameVariant::Custom(config);
    let policy = variant.policy();

    let two_wins = vec![
        SeatTally { score: 2, wins: 2 },
        SeatTally { score: 2, wins: 2 },
    ];
    assert!(!(policy.target_reached)(&variant, &two_wins));

    let three_wins = vec![
        SeatTally { score: 3, wins: 3 },
        SeatTally { score: 2, wins: 2 },
    ];
    assert!((policy.target_reached)(&variant, &three_wins));
    assert_eq!((policy.winners)(&variant, &three_wins), vec![0]);
}

#[test]
fn seat_bounds_per_variant() {
    assert!(GameVariant::X01 { start: 501 }.seat_bounds().contains(1));
    assert!(!GameVariant::Dominos { target: 150 }.seat_bounds().contains(5));
    assert!(GameVariant::Uno { target: 500 }.seat_bounds().contains(10));
    let config = running_score_config(9, 100);
    assert!(GameVariant::Custom(config).seat_bounds().contains(16));
}

#[test]
fn running_values_near_the_limit_refuse_to_overflow() {
    let near_max = SeatTally {
        score: i64::MAX - 10,
        wins: 0,
    };
    let tallies = vec![SeatTally::default(), near_max];

    let dominos = GameVariant::Dominos { target: i64::MAX };
    assert!(validate(&dominos, &tallies, 0, &RoundInput::game([25, 10])).is_ok());
    assert_eq!(
        validate(&dominos, &tallies, 0, &RoundInput::game([25, 11])),
        Err(ValidationError::ScoreOverflow { seat: 1 })
    );

    let standard = GameVariant::Cricket {
        mode: CricketMode::Standard,
        target: i64::MAX,
    };
    assert!(validate(&standard, &tallies, 0, &RoundInput::score(60)).is_ok());
    assert_eq!(
        validate(&standard, &tallies, 1, &RoundInput::score(11)),
        Err(ValidationError::ScoreOverflow { seat: 1 })
    );

    // Cut-throat points land on the other seats.
    let cut_throat = GameVariant::Cricket {
        mode: CricketMode::CutThroat,
        target: i64::MAX,
    };
    assert!(validate(&cut_throat, &tallies, 1, &RoundInput::score(60)).is_ok());
    assert_eq!(
        validate(&cut_throat, &tallies, 0, &RoundInput::score(11)),
        Err(ValidationError::ScoreOverflow { seat: 1 })
    );
}
