use tracing::{debug, info, warn};

use crate::{
    core::ledger::LedgerError,
    engine::{
        machine::{Rejection, Transition},
        result::FinalResult,
        state::{MatchScoringState, StateError},
    },
    persist::{MatchStore, ParticipantResult, PersistError, decode_snapshot, encode_snapshot},
    round::{Round, RoundInput},
    snapshot::MatchSnapshot,
    types::{MatchId, MatchStatus, Seat, SeatIndex},
    variant::{GameVariant, VariantId, VariantSettings},
};

use super::config::SessionConfig;

/// Failure of a session operation.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The state machine refused the mutation; nothing changed.
    #[error(transparent)]
    Rejected(#[from] Rejection),
    /// The mutation is kept in memory; [`MatchSession::retry_save`] can
    /// write it again.
    #[error("failed to save progress: {0}")]
    Persistence(#[from] PersistError),
    /// A submission was applied in memory but its snapshot was not written.
    /// `transition` is what the submission did.
    #[error("failed to save progress: {source}")]
    Unsaved {
        /// Outcome of the applied submission.
        transition: Box<Transition>,
        /// Underlying write failure.
        #[source]
        source: PersistError,
    },
    /// Saved running values disagree with a replay of the saved ledger.
    #[error("stored ledger for match {match_id} does not replay to its saved running values")]
    ReplayDivergence {
        /// Match that failed to resume.
        match_id: MatchId,
    },
    /// The match row and its game data name different variants.
    #[error("match {match_id} is stored as {stored} but its game data is {snapshot}")]
    VariantMismatch {
        /// Match that failed to open.
        match_id: MatchId,
        /// Variant in the match row.
        stored: VariantId,
        /// Variant in the game data.
        snapshot: VariantId,
    },
    /// `finalize` was called before a terminal condition.
    #[error("match is still in progress")]
    NotComplete,
    /// Seats or ledger could not form a valid match.
    #[error(transparent)]
    State(#[from] StateError),
}

impl SessionError {
    /// True when in-memory state is ahead of storage.
    pub fn is_save_failure(&self) -> bool {
        matches!(self, Self::Persistence(_) | Self::Unsaved { .. })
    }
}

/// Owns the live state of one match and writes it through to storage after
/// every accepted mutation.
pub struct MatchSession<S: MatchStore> {
    store: S,
    match_id: MatchId,
    state: MatchScoringState,
    config: SessionConfig,
    unsaved: bool,
    finalized: bool,
}

impl<S: MatchStore> MatchSession<S> {
    /// Creates a match row and starts scoring it.
    pub fn create(
        mut store: S,
        variant: VariantId,
        seats: Vec<Seat>,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        let resolved = resolve_variant(&store, variant, &config.variants)?;
        // Validate seats before a row is written.
        MatchScoringState::new(resolved.clone(), seats.clone())?;
        let match_id = store.create_match(variant, &seats)?;
        Self::start(store, match_id, resolved, seats, config)
    }

    /// Starts a fresh ledger for an existing match row.
    pub fn start(
        store: S,
        match_id: MatchId,
        variant: GameVariant,
        seats: Vec<Seat>,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        let state = MatchScoringState::new(variant, seats)?;
        let mut session = Self {
            store,
            match_id,
            state,
            config,
            unsaved: true,
            finalized: false,
        };
        session.persist()?;
        info!(
            match_id,
            variant = %session.state.variant().id(),
            seats = session.state.seat_count(),
            "match started"
        );
        Ok(session)
    }

    /// Opens a stored match, resuming its ledger when one was saved.
    ///
    /// A match whose participant rows were already written opens finalized
    /// and refuses further mutation.
    pub fn open(store: S, match_id: MatchId, config: SessionConfig) -> Result<Self, SessionError> {
        let stored = store.load_match_state(match_id)?;
        let finalized = stored.status == MatchStatus::Completed
            && !store.load_participants(match_id)?.is_empty();
        let mut session = match stored.game_data.as_deref() {
            Some(payload) => {
                let snapshot = decode_snapshot(payload)?;
                if snapshot.variant.id() != stored.variant {
                    return Err(SessionError::VariantMismatch {
                        match_id,
                        stored: stored.variant,
                        snapshot: snapshot.variant.id(),
                    });
                }
                Self::resume(store, match_id, snapshot, stored.seats, config)?
            }
            None => {
                let variant = resolve_variant(&store, stored.variant, &config.variants)?;
                Self::start(store, match_id, variant, stored.seats, config)?
            }
        };
        session.finalized = finalized && session.state.is_complete();
        Ok(session)
    }

    /// Rebuilds live state from a persisted snapshot.
    ///
    /// The ledger is replayed and compared with the saved running values;
    /// any difference refuses the resume.
    pub fn resume(
        store: S,
        match_id: MatchId,
        snapshot: MatchSnapshot,
        seats: Vec<Seat>,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        let saved_tallies = snapshot.tallies.clone();
        let state = snapshot.restore(seats).map_err(|err| match err {
            StateError::Ledger(LedgerError::Divergence { .. } | LedgerError::TallyWidth { .. }) => {
                SessionError::ReplayDivergence { match_id }
            }
            other => SessionError::State(other),
        })?;
        if state.tallies() != saved_tallies {
            return Err(SessionError::ReplayDivergence { match_id });
        }

        info!(
            match_id,
            rounds = state.rounds().len(),
            active_seat = state.active_seat(),
            status = %state.status(),
            "match resumed"
        );
        Ok(Self {
            store,
            match_id,
            state,
            config,
            unsaved: false,
            finalized: false,
        })
    }

    /// Storage row id of the match.
    pub fn match_id(&self) -> MatchId {
        self.match_id
    }

    /// Live scoring state.
    pub fn state(&self) -> &MatchScoringState {
        &self.state
    }

    /// Storage collaborator.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable storage collaborator.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Releases the storage collaborator.
    pub fn into_store(self) -> S {
        self.store
    }

    /// True once participant results were written. No further mutation is
    /// accepted.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// False while an accepted mutation has not reached storage.
    pub fn is_saved(&self) -> bool {
        !self.unsaved
    }

    /// Applies a submission, then writes the snapshot.
    ///
    /// Busts are written too, so the active seat survives a restart.
    pub fn submit_and_persist(
        &mut self,
        seat: SeatIndex,
        input: &RoundInput,
    ) -> Result<Transition, SessionError> {
        self.ensure_open()?;
        let transition = self.state.submit(seat, input)?;
        match &transition {
            Transition::Recorded { round, seat, .. } => {
                debug!(match_id = self.match_id, round, seat, "round recorded");
            }
            Transition::Bust { seat, next_seat } => {
                debug!(match_id = self.match_id, seat, next_seat, "bust");
            }
            Transition::Completed { round, seat, result } => {
                info!(
                    match_id = self.match_id,
                    round,
                    seat,
                    winners = ?result.winners,
                    "terminal condition reached"
                );
            }
        }
        self.unsaved = true;
        match self.persist() {
            Ok(()) => Ok(transition),
            Err(SessionError::Persistence(source)) => Err(SessionError::Unsaved {
                transition: Box::new(transition),
                source,
            }),
            Err(err) => Err(err),
        }
    }

    /// Retracts the latest round, then writes the snapshot.
    ///
    /// An empty ledger is a no-op and writes nothing.
    pub fn undo_and_persist(&mut self) -> Result<Option<Round>, SessionError> {
        self.ensure_open()?;
        let Some(round) = self.state.undo() else {
            return Ok(None);
        };
        debug!(
            match_id = self.match_id,
            round = round.index,
            seat = round.seat,
            "round retracted"
        );
        self.unsaved = true;
        self.persist()?;
        Ok(Some(round))
    }

    /// Ends a most-points match on request, then writes the snapshot.
    pub fn end_match(&mut self) -> Result<FinalResult, SessionError> {
        self.ensure_open()?;
        let result = self.state.end_match()?;
        info!(match_id = self.match_id, winners = ?result.winners, "match ended");
        self.unsaved = true;
        self.persist()?;
        Ok(result)
    }

    /// Saves the ledger and active seat for a later resume.
    pub fn pause(&mut self) -> Result<(), SessionError> {
        self.ensure_open()?;
        self.unsaved = true;
        self.persist()?;
        info!(
            match_id = self.match_id,
            rounds = self.state.rounds().len(),
            "match paused"
        );
        Ok(())
    }

    /// Writes a snapshot that previously failed to save.
    pub fn retry_save(&mut self) -> Result<(), SessionError> {
        if self.unsaved {
            self.persist()?;
        }
        Ok(())
    }

    /// Writes participant results and marks the match completed.
    ///
    /// Calling it again on a finalized match returns the same result
    /// without writing.
    pub fn finalize(&mut self) -> Result<FinalResult, SessionError> {
        let result = self.state.final_result().ok_or(SessionError::NotComplete)?;
        if self.finalized {
            return Ok(result);
        }
        self.retry_save()?;

        let rows: Vec<ParticipantResult> = result
            .standings
            .iter()
            .map(|s| ParticipantResult {
                seat_index: s.seat,
                score: s.score,
                is_winner: s.is_winner,
                finish_position: s.position,
            })
            .collect();

        let match_id = self.match_id;
        self.with_attempts("finalize", |store| store.finalize_match(match_id, &rows))?;
        self.finalized = true;
        info!(
            match_id,
            winners = ?result.winners,
            rounds = result.round_count,
            "match finalized"
        );
        Ok(result)
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.finalized {
            return Err(Rejection::MatchAlreadyComplete.into());
        }
        Ok(())
    }

    fn persist(&mut self) -> Result<(), SessionError> {
        let snapshot = MatchSnapshot::capture(&self.state);
        let payload = encode_snapshot(&snapshot)?;
        let status = self.state.status();
        let match_id = self.match_id;
        self.with_attempts("save", |store| {
            store.save_match_state(match_id, &payload, status)
        })?;
        self.unsaved = false;
        Ok(())
    }

    fn with_attempts(
        &mut self,
        op: &'static str,
        mut write: impl FnMut(&mut S) -> Result<(), PersistError>,
    ) -> Result<(), SessionError> {
        let attempts = self.config.save_attempts.max(1);
        let mut attempt = 1;
        loop {
            match write(&mut self.store) {
                Ok(()) => return Ok(()),
                Err(err) if attempt < attempts => {
                    warn!(match_id = self.match_id, op, attempt, error = %err, "write failed, retrying");
                    attempt += 1;
                }
                Err(err) => {
                    warn!(match_id = self.match_id, op, attempt, error = %err, "write failed");
                    return Err(err.into());
                }
            }
        }
    }
}

fn resolve_variant<S: MatchStore>(
    store: &S,
    id: VariantId,
    settings: &VariantSettings,
) -> Result<GameVariant, SessionError> {
    Ok(id.resolve(settings, |config_id| store.load_custom_config(config_id))?)
}
