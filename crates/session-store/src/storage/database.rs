//! SQLite session table
//!
//! One table, `sessions(id, data)`. `data` holds the base64 text of an
//! encrypted record; `id` is assigned by SQLite. Rows are addressed by their
//! `data` text because that is the only handle the catalog sees after
//! decryption. Rows whose value is not UTF-8 text have no such handle and
//! are addressed by `id`.

use rusqlite::types::ValueRef;
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::debug;

use crate::error::{Result, SessionStoreError};

/// A raw catalog row, before decryption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRow {
    /// Store-assigned primary key
    pub id: i64,
    /// Base64 rendering of the encrypted record; `None` when the stored
    /// value is NULL, numeric, or not valid UTF-8
    pub data: Option<String>,
}

/// Handle on the session database
pub struct SessionDb {
    conn: Connection,
}

impl SessionDb {
    /// Open (or create) the database file and ensure the table exists
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| {
            SessionStoreError::StoreUnavailable(format!("open {}: {}", path.display(), e))
        })?;

        let db = Self { conn };
        db.run_migrations()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| SessionStoreError::StoreUnavailable(e.to_string()))?;

        let db = Self { conn };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get a reference to the underlying connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Create the sessions table; safe to run on every open
    fn run_migrations(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "
                CREATE TABLE IF NOT EXISTS sessions (
                    id      INTEGER PRIMARY KEY AUTOINCREMENT,
                    data    TEXT NOT NULL
                );
                ",
            )
            .map_err(|e| SessionStoreError::StoreUnavailable(format!("create table: {}", e)))?;

        Ok(())
    }

    /// Append a row, returning its id
    pub fn insert(&self, data: &str) -> Result<i64> {
        self.conn
            .execute("INSERT INTO sessions (data) VALUES (?1)", params![data])?;

        let id = self.conn.last_insert_rowid();
        debug!("Inserted session row {}", id);
        Ok(id)
    }

    /// All rows in id order
    ///
    /// Values are read raw, so one unreadable row never fails the whole
    /// query. BLOBs holding UTF-8 (left by older writers or external edits)
    /// still reach the decoder as text.
    pub fn rows(&self) -> Result<Vec<StoredRow>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, data FROM sessions ORDER BY id")?;

        let rows = stmt
            .query_map([], |row| {
                let data = match row.get_ref(1)? {
                    ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                        std::str::from_utf8(bytes).ok().map(str::to_owned)
                    }
                    _ => None,
                };
                Ok(StoredRow {
                    id: row.get(0)?,
                    data,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!("Read {} session rows", rows.len());
        Ok(rows)
    }

    /// Delete every row whose `data` equals the given text
    pub fn delete_by_data(&self, data: &str) -> Result<usize> {
        let deleted = self.conn.execute(
            "DELETE FROM sessions WHERE COALESCE(CAST(data AS TEXT), '') = ?1",
            params![data],
        )?;

        debug!("Deleted {} session row(s)", deleted);
        Ok(deleted)
    }

    /// Delete one row by primary key
    pub fn delete_by_id(&self, id: i64) -> Result<usize> {
        let deleted = self
            .conn
            .execute("DELETE FROM sessions WHERE id = ?1", params![id])?;

        debug!("Deleted {} session row(s) by id", deleted);
        Ok(deleted)
    }

    /// Number of rows in the table
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT count(*) FROM sessions", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
