mod common;

use tempfile::TempDir;

use scorekeep::{
    engine::machine::{Rejection, Transition},
    persist::{
        MatchStore, PersistError, decode_snapshot, encode_snapshot, sqlite::SqliteMatchStore,
    },
    round::RoundInput,
    session::{MatchSession, SessionConfig, SessionError},
    types::MatchStatus,
    variant::{GameVariant, VariantId},
};

use common::{init_logging, running_score_config, seats};

fn open_store(tmp: &TempDir) -> SqliteMatchStore {
    SqliteMatchStore::open(tmp.path().join("scores.db")).expect("open sqlite")
}

#[test]
fn x01_match_resumes_from_disk() {
    init_logging();
    let tmp = TempDir::new().expect("tmp");

    let match_id = {
        let mut session = MatchSession::create(
            open_store(&tmp),
            VariantId::X01(501),
            seats(2),
            SessionConfig::default(),
        )
        .expect("create");
        session.submit_and_persist(0, &RoundInput::score(60)).expect("round 0");
        session.submit_and_persist(1, &RoundInput::score(80)).expect("round 1");
        assert!(session.is_saved());
        session.match_id()
    };

    let session = MatchSession::open(open_store(&tmp), match_id, SessionConfig::default())
        .expect("reopen");
    let state = session.state();
    assert_eq!(state.variant(), &GameVariant::X01 { start: 501 });
    assert_eq!(state.rounds().len(), 2);
    let scores: Vec<i64> = state.tallies().iter().map(|t| t.score).collect();
    assert_eq!(scores, vec![441, 421]);
    assert_eq!(state.active_seat(), 0);
    assert_eq!(state.seats()[1].name, "P1");
    assert!(session.is_saved());
}

#[test]
fn bust_and_pause_keep_the_active_seat() {
    init_logging();
    let tmp = TempDir::new().expect("tmp");

    let match_id = {
        let mut session = MatchSession::create(
            open_store(&tmp),
            VariantId::X01(301),
            seats(3),
            SessionConfig::default(),
        )
        .expect("create");
        session.submit_and_persist(0, &RoundInput::score(180)).expect("round");
        session.submit_and_persist(1, &RoundInput::score(100)).expect("round");
        session.submit_and_persist(2, &RoundInput::score(41)).expect("round");
        let bust = session.submit_and_persist(0, &RoundInput::score(150)).expect("bust");
        assert_eq!(
            bust,
            Transition::Bust {
                seat: 0,
                next_seat: 1
            }
        );
        session.pause().expect("pause");
        session.match_id()
    };

    let mut session = MatchSession::open(open_store(&tmp), match_id, SessionConfig::default())
        .expect("reopen");
    assert_eq!(session.state().active_seat(), 1);
    assert_eq!(session.state().rounds().len(), 3);
    session
        .submit_and_persist(1, &RoundInput::score(20))
        .expect("seat 1 continues");
}

#[test]
fn finalize_writes_participant_rows() {
    init_logging();
    let tmp = TempDir::new().expect("tmp");
    let mut session = MatchSession::create(
        open_store(&tmp),
        VariantId::Dominos,
        seats(3),
        SessionConfig::default(),
    )
    .expect("create");

    assert!(matches!(session.finalize(), Err(SessionError::NotComplete)));

    session.submit_and_persist(0, &RoundInput::game([80, 40, 10])).expect("game");
    session.submit_and_persist(1, &RoundInput::game([75, 30, 10])).expect("game");
    let result = session.finalize().expect("finalize");
    assert_eq!(result.winners, vec![0]);

    let match_id = session.match_id();
    let store = session.into_store();
    let stored = store.load_match_state(match_id).expect("load");
    assert_eq!(stored.status, MatchStatus::Completed);

    let rows = store.load_participants(match_id).expect("participants");
    assert_eq!(rows.len(), 3);
    assert_eq!((rows[0].score, rows[0].is_winner, rows[0].finish_position), (155, true, 1));
    assert_eq!((rows[1].score, rows[1].is_winner, rows[1].finish_position), (70, false, 2));
    assert_eq!((rows[2].score, rows[2].is_winner, rows[2].finish_position), (20, false, 3));
}

#[test]
fn completed_match_reopens_as_completed() {
    init_logging();
    let tmp = TempDir::new().expect("tmp");
    let match_id = {
        let mut session = MatchSession::create(
            open_store(&tmp),
            VariantId::X01(301),
            seats(1),
            SessionConfig::default(),
        )
        .expect("create");
        session.submit_and_persist(0, &RoundInput::score(180)).expect("round");
        let done = session.submit_and_persist(0, &RoundInput::score(121)).expect("checkout");
        assert!(matches!(done, Transition::Completed { .. }));
        session.match_id()
    };

    let mut session = MatchSession::open(open_store(&tmp), match_id, SessionConfig::default())
        .expect("reopen");
    assert!(session.state().is_complete());
    assert!(matches!(
        session.submit_and_persist(0, &RoundInput::score(1)),
        Err(SessionError::Rejected(_))
    ));
    let result = session.finalize().expect("finalize after resume");
    assert_eq!(result.round_count, 2);
}

#[test]
fn finalized_match_reopens_locked() {
    init_logging();
    let tmp = TempDir::new().expect("tmp");
    let match_id = {
        let mut session = MatchSession::create(
            open_store(&tmp),
            VariantId::X01(301),
            seats(2),
            SessionConfig::default(),
        )
        .expect("create");
        session.submit_and_persist(0, &RoundInput::score(180)).expect("round");
        session.submit_and_persist(1, &RoundInput::score(100)).expect("round");
        session.submit_and_persist(0, &RoundInput::score(121)).expect("checkout");
        session.finalize().expect("finalize");
        session.match_id()
    };

    let mut session = MatchSession::open(open_store(&tmp), match_id, SessionConfig::default())
        .expect("reopen");
    assert!(session.is_finalized());
    assert!(matches!(
        session.undo_and_persist(),
        Err(SessionError::Rejected(Rejection::MatchAlreadyComplete))
    ));
    assert_eq!(session.state().rounds().len(), 3);

    let store = session.into_store();
    let stored = store.load_match_state(match_id).expect("load");
    assert_eq!(stored.status, MatchStatus::Completed);
    assert_eq!(store.load_participants(match_id).expect("participants").len(), 2);
}

#[test]
fn custom_variants_resolve_from_stored_config() {
    init_logging();
    let tmp = TempDir::new().expect("tmp");
    let mut store = open_store(&tmp);
    let config = running_score_config(42, 300);
    store.save_custom_config(&config).expect("save config");

    let mut session = MatchSession::create(
        store,
        VariantId::Custom(42),
        seats(2),
        SessionConfig::default(),
    )
    .expect("create");
    session.submit_and_persist(1, &RoundInput::score(120)).expect("round");
    let match_id = session.match_id();
    drop(session);

    let session = MatchSession::open(open_store(&tmp), match_id, SessionConfig::default())
        .expect("reopen");
    assert_eq!(session.state().variant(), &GameVariant::Custom(config));
    assert_eq!(session.state().tally(1).map(|t| t.score), Some(120));

    let missing = MatchSession::create(
        open_store(&tmp),
        VariantId::Custom(7),
        seats(2),
        SessionConfig::default(),
    );
    assert!(matches!(
        missing,
        Err(SessionError::Persistence(PersistError::NotFound { id: 7, .. }))
    ));
}

#[test]
fn tampered_game_data_refuses_to_resume() {
    init_logging();
    let tmp = TempDir::new().expect("tmp");
    let match_id = {
        let mut session = MatchSession::create(
            open_store(&tmp),
            VariantId::Uno,
            seats(2),
            SessionConfig::default(),
        )
        .expect("create");
        session.submit_and_persist(0, &RoundInput::game([50, 0])).expect("game");
        session.submit_and_persist(1, &RoundInput::game([0, 35])).expect("game");
        session.match_id()
    };

    let mut store = open_store(&tmp);
    let stored = store.load_match_state(match_id).expect("load");
    let mut snapshot = decode_snapshot(stored.game_data.as_deref().expect("game data"))
        .expect("decode");
    snapshot.tallies[0].score += 10;
    let payload = encode_snapshot(&snapshot).expect("encode");
    store
        .save_match_state(match_id, &payload, MatchStatus::InProgress)
        .expect("overwrite");

    let reopened = MatchSession::open(store, match_id, SessionConfig::default());
    assert!(matches!(
        reopened,
        Err(SessionError::ReplayDivergence { match_id: id }) if id == match_id
    ));

    let mut store = open_store(&tmp);
    let mut snapshot = decode_snapshot(stored.game_data.as_deref().expect("game data"))
        .expect("decode");
    snapshot.rounds[0].tallies_after[1].score = 99;
    let payload = encode_snapshot(&snapshot).expect("encode");
    store
        .save_match_state(match_id, &payload, MatchStatus::InProgress)
        .expect("overwrite");
    assert!(matches!(
        MatchSession::open(store, match_id, SessionConfig::default()),
        Err(SessionError::ReplayDivergence { .. })
    ));
}

#[test]
fn unknown_snapshot_versions_are_rejected() {
    let tmp = TempDir::new().expect("tmp");
    let match_id = {
        let session = MatchSession::create(
            open_store(&tmp),
            VariantId::Uno,
            seats(2),
            SessionConfig::default(),
        )
        .expect("create");
        session.match_id()
    };

    let mut store = open_store(&tmp);
    let stored = store.load_match_state(match_id).expect("load");
    let mut envelope: serde_json::Value =
        serde_json::from_str(stored.game_data.as_deref().expect("game data")).expect("json");
    envelope["format_version"] = serde_json::json!(9);
    let payload = envelope.to_string();
    store
        .save_match_state(match_id, &payload, MatchStatus::InProgress)
        .expect("overwrite");

    assert!(matches!(
        decode_snapshot(&payload),
        Err(PersistError::UnsupportedFormat(9))
    ));
    assert!(matches!(
        MatchSession::open(store, match_id, SessionConfig::default()),
        Err(SessionError::Persistence(PersistError::UnsupportedFormat(9)))
    ));
}

#[test]
fn rows_without_game_data_start_fresh() {
    let tmp = TempDir::new().expect("tmp");
    let mut store = open_store(&tmp);
    let match_id = store
        .create_match(VariantId::Cricket(scorekeep::variant::CricketMode::Standard), &seats(2))
        .expect("create row");

    let session = MatchSession::open(store, match_id, SessionConfig::default()).expect("open");
    assert!(session.state().rounds().is_empty());
    assert!(session.is_saved());
    let stored = session.store().load_match_state(match_id).expect("load");
    assert!(stored.game_data.is_some());
}
