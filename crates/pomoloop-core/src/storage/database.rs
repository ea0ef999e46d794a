//! SQLite-backed persistence for the cycle record.
//!
//! The entire persisted surface is one flat record in a key-value
//! table: settings plus the two completion counters. Phase and
//! remaining time are session state and never written.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::timer::TimerSettings;

use super::data_dir;

/// Fixed kv key under which the cycle record is stored.
pub const RECORD_KEY: &str = "cycle_record";

/// The single flat record that survives across sessions.
///
/// Unknown fields are ignored and missing fields fall back to their
/// defaults, so records written by older builds still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedRecord {
    #[serde(default)]
    pub settings: TimerSettings,
    #[serde(default)]
    pub completed_pomodoros: u64,
    #[serde(default)]
    pub pomos_since_long: u32,
}

impl Default for PersistedRecord {
    fn default() -> Self {
        Self {
            settings: TimerSettings::default(),
            completed_pomodoros: 0,
            pomos_since_long: 0,
        }
    }
}

/// SQLite database holding the cycle record.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/pomoloop/pomoloop.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        let path = data_dir()?.join("pomoloop.db");
        Self::open_at(&path)
    }

    /// Open the database at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: PathBuf::from(path),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Load the cycle record, if one exists.
    ///
    /// A missing or unreadable record yields `Ok(None)`; the caller
    /// falls back to defaults rather than refusing to start.
    pub fn load_record(&self) -> Result<Option<PersistedRecord>, StorageError> {
        match self.kv_get(RECORD_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw).ok()),
            None => Ok(None),
        }
    }

    /// Write the cycle record, replacing any previous one.
    pub fn save_record(&self, record: &PersistedRecord) -> Result<(), StorageError> {
        let raw = serde_json::to_string(record)?;
        self.kv_set(RECORD_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_roundtrip() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.kv_get("missing").unwrap(), None);
        db.kv_set("k", "v1").unwrap();
        assert_eq!(db.kv_get("k").unwrap(), Some("v1".to_string()));
        db.kv_set("k", "v2").unwrap();
        assert_eq!(db.kv_get("k").unwrap(), Some("v2".to_string()));
    }

    #[test]
    fn record_roundtrip() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.load_record().unwrap(), None);

        let record = PersistedRecord {
            settings: TimerSettings {
                focus_min: 50,
                short_break_min: 10,
                long_break_min: 20,
                pomos_before_long: 2,
            },
            completed_pomodoros: 7,
            pomos_since_long: 1,
        };
        db.save_record(&record).unwrap();
        assert_eq!(db.load_record().unwrap(), Some(record));
    }

    #[test]
    fn malformed_record_loads_as_none() {
        let db = Database::open_memory().unwrap();
        db.kv_set(RECORD_KEY, "{not json").unwrap();
        assert_eq!(db.load_record().unwrap(), None);
    }

    #[test]
    fn partial_record_fills_defaults() {
        let db = Database::open_memory().unwrap();
        db.kv_set(RECORD_KEY, r#"{"completed_pomodoros": 3}"#).unwrap();
        let record = db.load_record().unwrap().unwrap();
        assert_eq!(record.completed_pomodoros, 3);
        assert_eq!(record.pomos_since_long, 0);
        assert_eq!(record.settings, TimerSettings::default());
    }
}
