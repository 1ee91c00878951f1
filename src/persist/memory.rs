//! In-memory match store with write-failure injection.

use hashbrown::HashMap;

use crate::{
    types::{ConfigId, MatchId, MatchStatus, Seat},
    variant::{CustomGameConfig, VariantId},
};

use super::{MatchStore, ParticipantResult, PersistError, PersistResult, StoredMatch};

#[derive(Debug, Clone)]
struct MatchRow {
    variant: VariantId,
    seats: Vec<Seat>,
    game_data: Option<String>,
    status: MatchStatus,
    participants: Vec<ParticipantResult>,
}

/// Volatile [`MatchStore`] backed by hash maps.
#[derive(Debug, Default)]
pub struct MemoryMatchStore {
    matches: HashMap<MatchId, MatchRow>,
    configs: HashMap<ConfigId, CustomGameConfig>,
    next_id: MatchId,
    fail_writes: u32,
    writes: u64,
}

impl MemoryMatchStore {
    /// Empty store; match ids start at 1.
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    /// Makes the next `n` snapshot or finalize writes fail.
    pub fn fail_next_writes(&mut self, n: u32) {
        self.fail_writes = n;
    }

    /// Successful snapshot and finalize writes so far.
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    fn check_write(&mut self) -> PersistResult<()> {
        if self.fail_writes > 0 {
            self.fail_writes -= 1;
            return Err(PersistError::Message("injected write failure".to_string()));
        }
        Ok(())
    }

    fn row_mut(&mut self, id: MatchId) -> PersistResult<&mut MatchRow> {
        self.matches
            .get_mut(&id)
            .ok_or(PersistError::NotFound { what: "match", id })
    }
}

impl MatchStore for MemoryMatchStore {
    fn create_match(&mut self, variant: VariantId, seats: &[Seat]) -> PersistResult<MatchId> {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.matches.insert(
            id,
            MatchRow {
                variant,
                seats: seats.to_vec(),
                game_data: None,
                status: MatchStatus::InProgress,
                participants: Vec::new(),
            },
        );
        Ok(id)
    }

    fn load_match_state(&self, id: MatchId) -> PersistResult<StoredMatch> {
        let row = self
            .matches
            .get(&id)
            .ok_or(PersistError::NotFound { what: "match", id })?;
        Ok(StoredMatch {
            id,
            variant: row.variant,
            seats: row.seats.clone(),
            game_data: row.game_data.clone(),
            status: row.status,
        })
    }

    fn save_match_state(
        &mut self,
        id: MatchId,
        game_data: &str,
        status: MatchStatus,
    ) -> PersistResult<()> {
        self.row_mut(id)?;
        self.check_write()?;
        let row = self.row_mut(id)?;
        row.game_data = Some(game_data.to_string());
        row.status = status;
        self.writes += 1;
        Ok(())
    }

    fn finalize_match(&mut self, id: MatchId, results: &[ParticipantResult]) -> PersistResult<()> {
        self.row_mut(id)?;
        self.check_write()?;
        let row = self.row_mut(id)?;
        row.participants = results.to_vec();
        row.status = MatchStatus::Completed;
        self.writes += 1;
        Ok(())
    }

    fn load_participants(&self, id: MatchId) -> PersistResult<Vec<ParticipantResult>> {
        self.matches
            .get(&id)
            .map(|row| row.participants.clone())
            .ok_or(PersistError::NotFound { what: "match", id })
    }

    fn save_custom_config(&mut self, config: &CustomGameConfig) -> PersistResult<()> {
        self.configs.insert(config.id, config.clone());
        Ok(())
    }

    fn load_custom_config(&self, id: ConfigId) -> PersistResult<CustomGameConfig> {
        self.configs.get(&id).cloned().ok_or(PersistError::NotFound {
            what: "custom game config",
            id,
        })
    }
}
