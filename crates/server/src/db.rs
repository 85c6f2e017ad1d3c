//! SQLite persistence for the participants table.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use leaderboard_core::{Participant, ParticipantId};
use rusqlite::{Connection, OptionalExtension, params};
use uuid::Uuid;

/// SQLite-backed participant table.
///
/// A single connection behind a mutex is plenty at leaderboard scale; every
/// operation is a handful of rows.
pub struct Db {
    conn: Mutex<Connection>,
}

impl Db {
    /// Open (creating if missing) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, rusqlite::Error> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Private in-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, rusqlite::Error> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS participants (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                score INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// All participants, highest score first. Creation order breaks ties.
    pub fn list(&self) -> Result<Vec<Participant>, rusqlite::Error> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, name, score FROM participants
             ORDER BY score DESC, created_at ASC, id ASC",
        )?;
        let rows = stmt.query_map([], row_to_participant)?;
        rows.collect()
    }

    /// Insert a participant with a fresh UUID and a zero score.
    pub fn create(&self, name: &str) -> Result<Participant, rusqlite::Error> {
        let participant = Participant::new(
            ParticipantId::new(Uuid::new_v4().to_string()),
            name,
        );
        self.lock().execute(
            "INSERT INTO participants (id, name, score) VALUES (?1, ?2, ?3)",
            params![participant.id.as_str(), participant.name, participant.score],
        )?;
        Ok(participant)
    }

    /// Replace a participant's score. Returns `None` when the id is unknown.
    pub fn update_score(
        &self,
        id: &str,
        score: u32,
    ) -> Result<Option<Participant>, rusqlite::Error> {
        let conn = self.lock();
        let changed = conn.execute(
            "UPDATE participants SET score = ?1 WHERE id = ?2",
            params![score, id],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        conn.query_row(
            "SELECT id, name, score FROM participants WHERE id = ?1",
            params![id],
            row_to_participant,
        )
        .optional()
    }

    /// Delete by id. Returns whether a row was removed.
    pub fn delete(&self, id: &str) -> Result<bool, rusqlite::Error> {
        let changed = self
            .lock()
            .execute("DELETE FROM participants WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}

fn row_to_participant(row: &rusqlite::Row<'_>) -> Result<Participant, rusqlite::Error> {
    Ok(Participant {
        id: ParticipantId::new(row.get::<_, String>(0)?),
        name: row.get(1)?,
        score: row.get(2)?,
    })
}
