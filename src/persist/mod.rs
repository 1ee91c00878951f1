//! Storage collaborator contract and snapshot encoding.

/// Volatile store for tests and embedding.
pub mod memory;
/// SQLite store.
pub mod sqlite;

use serde::{Deserialize, Serialize};

use crate::{
    snapshot::{MatchSnapshot, SNAPSHOT_FORMAT_VERSION, SnapshotEnvelope},
    types::{ConfigId, MatchId, MatchStatus, Seat, SeatIndex},
    variant::{CustomGameConfig, VariantId},
};

/// Storage failure.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// SQLite error.
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Game data or config payload could not be (de)serialized.
    #[error("serde: {0}")]
    Serde(#[from] serde_json::Error),
    /// Missing row.
    #[error("{what} {id} not found")]
    NotFound {
        /// Kind of row.
        what: &'static str,
        /// Row id.
        id: u64,
    },
    /// Game data written by an unknown format version.
    #[error("unsupported snapshot format version {0}")]
    UnsupportedFormat(u16),
    /// Other storage failure.
    #[error("{0}")]
    Message(String),
}

/// Result alias for storage operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Match row as read back from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMatch {
    /// Row id.
    pub id: MatchId,
    /// Variant the match was created with.
    pub variant: VariantId,
    /// Seats in turn order.
    pub seats: Vec<Seat>,
    /// Serialized [`SnapshotEnvelope`], absent until the first save.
    pub game_data: Option<String>,
    /// Stored lifecycle status.
    pub status: MatchStatus,
}

/// Final per-seat row written when a match is finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantResult {
    /// Seat described.
    pub seat_index: SeatIndex,
    /// Final running value.
    pub score: i64,
    /// Whether the seat won.
    pub is_winner: bool,
    /// Competition rank, 1-based.
    pub finish_position: u32,
}

/// Storage collaborator used by the session controller.
///
/// `save_match_state` overwrites the full snapshot; `finalize_match` writes
/// every participant row and flips the status in one step.
pub trait MatchStore: Send {
    /// Inserts a match row with its seats and no game data.
    fn create_match(&mut self, variant: VariantId, seats: &[Seat]) -> PersistResult<MatchId>;
    /// Reads a match row.
    fn load_match_state(&self, id: MatchId) -> PersistResult<StoredMatch>;
    /// Overwrites the game data and status of a match.
    fn save_match_state(
        &mut self,
        id: MatchId,
        game_data: &str,
        status: MatchStatus,
    ) -> PersistResult<()>;
    /// Writes final participant rows and marks the match completed.
    fn finalize_match(&mut self, id: MatchId, results: &[ParticipantResult]) -> PersistResult<()>;
    /// Reads final participant rows, ordered by seat; empty before finalize.
    fn load_participants(&self, id: MatchId) -> PersistResult<Vec<ParticipantResult>>;
    /// Inserts or replaces a custom game configuration.
    fn save_custom_config(&mut self, config: &CustomGameConfig) -> PersistResult<()>;
    /// Reads a custom game configuration.
    fn load_custom_config(&self, id: ConfigId) -> PersistResult<CustomGameConfig>;
}

impl<S: MatchStore + ?Sized> MatchStore for Box<S> {
    fn create_match(&mut self, variant: VariantId, seats: &[Seat]) -> PersistResult<MatchId> {
        (**self).create_match(variant, seats)
    }
    fn load_match_state(&self, id: MatchId) -> PersistResult<StoredMatch> {
        (**self).load_match_state(id)
    }
    fn save_match_state(
        &mut self,
        id: MatchId,
        game_data: &str,
        status: MatchStatus,
    ) -> PersistResult<()> {
        (**self).save_match_state(id, game_data, status)
    }
    fn finalize_match(&mut self, id: MatchId, results: &[ParticipantResult]) -> PersistResult<()> {
        (**self).finalize_match(id, results)
    }
    fn load_participants(&self, id: MatchId) -> PersistResult<Vec<ParticipantResult>> {
        (**self).load_participants(id)
    }
    fn save_custom_config(&mut self, config: &CustomGameConfig) -> PersistResult<()> {
        (**self).save_custom_config(config)
    }
    fn load_custom_config(&self, id: ConfigId) -> PersistResult<CustomGameConfig> {
        (**self).load_custom_config(id)
    }
}

/// Serializes a snapshot inside a versioned envelope.
pub fn encode_snapshot(snapshot: &MatchSnapshot) -> PersistResult<String> {
    Ok(serde_json::to_string(&SnapshotEnvelope::new(snapshot.clone()))?)
}

/// Decodes an envelope written by [`encode_snapshot`].
pub fn decode_snapshot(payload: &str) -> PersistResult<MatchSnapshot> {
    let envelope: SnapshotEnvelope = serde_json::from_str(payload)?;
    if envelope.format_version != SNAPSHOT_FORMAT_VERSION {
        return Err(PersistError::UnsupportedFormat(envelope.format_version));
    }
    Ok(envelope.snapshot)
}
