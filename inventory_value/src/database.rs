//! Value history: the running record of computed inventory totals
//!
//! Uses parameterized queries exclusively (no SQL string concatenation).
//! Timestamps are assigned by SQLite, not by the caller.

use crate::error::{Result, ValueError};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Result type for database operations
pub type DbResult<T> = rusqlite::Result<T>;

/// Somewhere a computed total can be recorded
pub trait ValueSink {
    /// Append `value` for `identity`, timestamped by the store
    fn append_total(&mut self, identity: &str, value: f64) -> Result<()>;

    /// Most recently recorded total for `identity`, if the store can tell
    fn latest_total(&self, _identity: &str) -> Result<Option<f64>> {
        Ok(None)
    }
}

/// A sink that could not be opened refuses every write
impl<S: ValueSink> ValueSink for Option<S> {
    fn append_total(&mut self, identity: &str, value: f64) -> Result<()> {
        match self {
            Some(sink) => sink.append_total(identity, value),
            None => Err(ValueError::SinkUnavailable(
                "value history was not opened".to_string(),
            )),
        }
    }

    fn latest_total(&self, identity: &str) -> Result<Option<f64>> {
        match self {
            Some(sink) => sink.latest_total(identity),
            None => Ok(None),
        }
    }
}

/// Initialize the database schema
///
/// Creates the `inventory_values` table if it doesn't exist: one row per
/// recorded total, keyed by identity.
pub fn init_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS inventory_values (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            identity TEXT NOT NULL,
            value REAL NOT NULL,
            captured_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_inventory_values_identity ON inventory_values(identity);
        ",
    )?;

    log::debug!("Database schema initialized");
    Ok(())
}

/// One recorded total
#[derive(Debug, Clone, PartialEq)]
pub struct ValueRecord {
    pub value: f64,
    pub captured_at: String,
}

/// SQLite-backed value history
pub struct ValueHistory {
    conn: Connection,
}

impl ValueHistory {
    /// Open (and create if needed) the database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ValueError::SinkUnavailable(e.to_string()))?;
                log::info!("Created directory: {}", parent.display());
            }
        }

        let conn = Connection::open(path)?;
        init_schema(&conn)?;
        log::info!("Opened value history: {}", path.display());
        Ok(Self { conn })
    }

    /// In-memory history, gone when dropped
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Recorded totals for `identity`, newest first
    pub fn history(&self, identity: &str, limit: usize) -> Result<Vec<ValueRecord>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT value, captured_at FROM inventory_values
             WHERE identity = ?1
             ORDER BY id DESC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![identity, limit as i64], |row| {
            Ok(ValueRecord {
                value: row.get(0)?,
                captured_at: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<DbResult<Vec<_>>>()?)
    }
}

impl ValueSink for ValueHistory {
    fn append_total(&mut self, identity: &str, value: f64) -> Result<()> {
        self.conn.execute(
            "INSERT INTO inventory_values (identity, value) VALUES (?1, ?2)",
            params![identity, value],
        )?;
        log::debug!("Recorded total {:.2} for {}", value, identity);
        Ok(())
    }

    fn latest_total(&self, identity: &str) -> Result<Option<f64>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM inventory_values WHERE identity = ?1 ORDER BY id DESC LIMIT 1",
                params![identity],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }
}
