use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use scorekeep::{
    core::ledger::replay,
    engine::state::MatchScoringState,
    round::RoundInput,
    types::Seat,
    variant::GameVariant,
};

fn seats(n: usize) -> Vec<Seat> {
    (0..n)
        .map(|i| Seat::new(i, i as u64, format!("P{i}")))
        .collect()
}

// Long uno series that never reaches its target.
fn played_series(games: usize) -> MatchScoringState {
    let mut state = MatchScoringState::new(GameVariant::Uno { target: i64::MAX }, seats(4))
        .expect("uno match");
    for i in 0..games {
        let mut scores = vec![0i64; 4];
        scores[i % 4] = 1 + (i % 50) as i64;
        state
            .submit_at(i % 4, &RoundInput::game(scores), i as u64)
            .expect("game");
    }
    state
}

fn bench_x01_submit_undo(c: &mut Criterion) {
    c.bench_function("x01_submit_undo_10k", |b| {
        b.iter(|| {
            let mut state = MatchScoringState::new(GameVariant::X01 { start: 901 }, seats(2))
                .expect("x01 match");
            for i in 0..10_000u64 {
                let seat = state.active_seat();
                let _ = state
                    .submit_at(seat, &RoundInput::darts([20, 20, 1]), i)
                    .expect("submit");
                let _ = state.undo();
            }
        });
    });
}

fn bench_series_submit(c: &mut Criterion) {
    c.bench_function("series_submit_10k", |b| {
        b.iter(|| played_series(10_000));
    });
}

fn bench_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("replay");
    for n in [100usize, 1_000, 10_000] {
        let state = played_series(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &state, |b, state| {
            b.iter(|| replay(state.variant(), state.starting_tallies(), state.rounds()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_x01_submit_undo, bench_series_submit, bench_replay);
criterion_main!(benches);
