//! SQLite-backed match store.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use crate::{
    types::{ConfigId, MatchId, MatchStatus, Seat},
    variant::{CustomGameConfig, VariantId},
};

use super::{MatchStore, ParticipantResult, PersistError, PersistResult, StoredMatch};

/// SQLite implementation of [`crate::persist::MatchStore`].
pub struct SqliteMatchStore {
    conn: Connection,
}

impl SqliteMatchStore {
    /// Opens or creates a SQLite-backed store at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory SQLite store.
    pub fn open_in_memory() -> PersistResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> PersistResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self { conn })
    }

    fn load_seats(&self, id: MatchId) -> PersistResult<Vec<Seat>> {
        let mut stmt = self.conn.prepare(
            "SELECT seat_index, player_id, name FROM match_seats WHERE match_id = ?1 ORDER BY seat_index ASC",
        )?;
        let rows = stmt.query_map(params![id as i64], |row| {
            let index: i64 = row.get(0)?;
            let player_id: i64 = row.get(1)?;
            let name: String = row.get(2)?;
            Ok(Seat::new(index as usize, player_id as u64, name))
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

impl MatchStore for SqliteMatchStore {
    fn create_match(&mut self, variant: VariantId, seats: &[Seat]) -> PersistResult<MatchId> {
        let ts_ms = now_ms() as i64;
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO matches(variant, status, game_data, created_ms, updated_ms) VALUES (?1, ?2, NULL, ?3, ?3)",
            params![variant.to_string(), MatchStatus::InProgress.as_str(), ts_ms],
        )?;
        let id = tx.last_insert_rowid();
        {
            let mut stmt = tx.prepare(
                "INSERT INTO match_seats(match_id, seat_index, player_id, name) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for seat in seats {
                stmt.execute(params![
                    id,
                    seat.index as i64,
                    seat.player_id as i64,
                    seat.name,
                ])?;
            }
        }
        tx.commit()?;
        debug!(match_id = id, %variant, seats = seats.len(), "match created");
        Ok(id as MatchId)
    }

    fn load_match_state(&self, id: MatchId) -> PersistResult<StoredMatch> {
        let row: Option<(String, String, Option<String>)> = self
            .conn
            .query_row(
                "SELECT variant, status, game_data FROM matches WHERE id = ?1",
                params![id as i64],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        let Some((variant, status, game_data)) = row else {
            return Err(PersistError::NotFound { what: "match", id });
        };

        let variant = variant
            .parse::<VariantId>()
            .map_err(|err| PersistError::Message(format!("match {id}: {err}")))?;
        let status = MatchStatus::parse(&status)
            .ok_or_else(|| PersistError::Message(format!("match {id}: bad status `{status}`")))?;

        Ok(StoredMatch {
            id,
            variant,
            seats: self.load_seats(id)?,
            game_data,
            status,
        })
    }

    fn save_match_state(
        &mut self,
        id: MatchId,
        game_data: &str,
        status: MatchStatus,
    ) -> PersistResult<()> {
        let updated = self.conn.execute(
            "UPDATE matches SET game_data = ?1, status = ?2, updated_ms = ?3 WHERE id = ?4",
            params![game_data, status.as_str(), now_ms() as i64, id as i64],
        )?;
        if updated == 0 {
            return Err(PersistError::NotFound { what: "match", id });
        }
        Ok(())
    }

    fn finalize_match(&mut self, id: MatchId, results: &[ParticipantResult]) -> PersistResult<()> {
        let tx = self.conn.transaction()?;
        let updated = tx.execute(
            "UPDATE matches SET status = ?1, updated_ms = ?2 WHERE id = ?3",
            params![MatchStatus::Completed.as_str(), now_ms() as i64, id as i64],
        )?;
        if updated == 0 {
            return Err(PersistError::NotFound { what: "match", id });
        }
        tx.execute(
            "DELETE FROM match_participants WHERE match_id = ?1",
            params![id as i64],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO match_participants(match_id, seat_index, score, is_winner, finish_position) VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for result in results {
                stmt.execute(params![
                    id as i64,
                    result.seat_index as i64,
                    result.score,
                    result.is_winner,
                    result.finish_position,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn load_participants(&self, id: MatchId) -> PersistResult<Vec<ParticipantResult>> {
        let mut stmt = self.conn.prepare(
            "SELECT seat_index, score, is_winner, finish_position FROM match_participants WHERE match_id = ?1 ORDER BY seat_index ASC",
        )?;
        let rows = stmt.query_map(params![id as i64], |row| {
            let seat_index: i64 = row.get(0)?;
            Ok(ParticipantResult {
                seat_index: seat_index as usize,
                score: row.get(1)?,
                is_winner: row.get(2)?,
                finish_position: row.get(3)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn save_custom_config(&mut self, config: &CustomGameConfig) -> PersistResult<()> {
        let payload = serde_json::to_string(config)?;
        self.conn.execute(
            "INSERT INTO custom_game_configs(id, name, payload) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name, payload = excluded.payload",
            params![config.id as i64, config.name, payload],
        )?;
        Ok(())
    }

    fn load_custom_config(&self, id: ConfigId) -> PersistResult<CustomGameConfig> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM custom_game_configs WHERE id = ?1",
                params![id as i64],
                |row| row.get(0),
            )
            .optional()?;

        let Some(payload) = payload else {
            return Err(PersistError::NotFound {
                what: "custom game config",
                id,
            });
        };
        Ok(serde_json::from_str(&payload)?)
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
