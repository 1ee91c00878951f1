#![allow(dead_code)]

use std::sync::Once;

use scorekeep::{
    types::Seat,
    variant::{CustomGameConfig, ScoringMethod, WinCondition},
};

static LOGGING: Once = Once::new();

/// Routes tracing output through the test harness. `TEST_LOG` or `RUST_LOG`
/// pick the level; quiet by default.
pub fn init_logging() {
    LOGGING.call_once(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "warn".to_string());
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

pub fn seats(n: usize) -> Vec<Seat> {
    (0..n)
        .map(|i| Seat::new(i, 100 + i as u64, format!("P{i}")))
        .collect()
}

pub fn running_score_config(id: u64, target: i64) -> CustomGameConfig {
    CustomGameConfig::new(
        id,
        "Backyard",
        ScoringMethod::Points,
        WinCondition::TargetScore,
        target,
    )
}

pub fn tracked_games_config(
    id: u64,
    scoring_method: ScoringMethod,
    win_condition: WinCondition,
    target: i64,
) -> CustomGameConfig {
    CustomGameConfig {
        track_individual_games: true,
        ..CustomGameConfig::new(id, "Table league", scoring_method, win_condition, target)
    }
}
