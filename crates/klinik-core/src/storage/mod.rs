//! Client-local persisted key/value storage.
//!
//! Plays the role browser `localStorage` plays for a web front end: values
//! survive restarts and are shared by every process that opens the same file.

mod schema;

pub use schema::*;

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use thiserror::Error;

/// Storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Key/value store backed by a single SQLite table.
pub struct LocalStorage {
    conn: Connection,
}

impl LocalStorage {
    /// Open storage at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        let storage = Self { conn };
        storage.initialize()?;
        Ok(storage)
    }

    /// Create in-memory storage (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        let storage = Self { conn };
        storage.initialize()?;
        Ok(storage)
    }

    fn initialize(&self) -> StorageResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get a stored value.
    pub fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?",
                [key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Set a stored value, replacing any previous one.
    pub fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO local_storage (key, value, updated_at) VALUES (?, ?, datetime('now'))",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a stored value. Returns whether it existed.
    pub fn remove_item(&self, key: &str) -> StorageResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM local_storage WHERE key = ?", [key])?;
        Ok(rows_affected > 0)
    }

    /// Counter that changes whenever another connection commits to this file.
    ///
    /// Writes made through this connection never change it, so a changed value
    /// means some other process touched storage since the last read.
    pub fn data_version(&self) -> StorageResult<i64> {
        self.conn
            .query_row("PRAGMA data_version", [], |row| row.get(0))
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_storage() -> LocalStorage {
        LocalStorage::open_in_memory().unwrap()
    }

    #[test]
    fn test_set_and_get() {
        let storage = setup_storage();

        assert_eq!(storage.get_item("access_token").unwrap(), None);

        storage.set_item("access_token", "T1").unwrap();
        assert_eq!(storage.get_item("access_token").unwrap(), Some("T1".into()));

        storage.set_item("access_token", "T2").unwrap();
        assert_eq!(storage.get_item("access_token").unwrap(), Some("T2".into()));
    }

    #[test]
    fn test_remove_item() {
        let storage = setup_storage();

        storage.set_item("access_token", "T1").unwrap();
        assert!(storage.remove_item("access_token").unwrap());
        assert!(!storage.remove_item("access_token").unwrap());
        assert_eq!(storage.get_item("access_token").unwrap(), None);
    }

    #[test]
    fn test_own_writes_keep_data_version() {
        let storage = setup_storage();

        let before = storage.data_version().unwrap();
        storage.set_item("k", "v").unwrap();
        assert_eq!(storage.data_version().unwrap(), before);
    }

    #[test]
    fn test_other_connection_changes_data_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.sqlite3");

        let first = LocalStorage::open(&path).unwrap();
        let second = LocalStorage::open(&path).unwrap();

        let before = first.data_version().unwrap();
        second.set_item("access_token", "T1").unwrap();

        assert_ne!(first.data_version().unwrap(), before);
        assert_eq!(first.get_item("access_token").unwrap(), Some("T1".into()));
    }
}
