// Key-value access to persisted state records
// DatabaseManager is the durable backend; MemoryStore stands in for it in tests

use rusqlite::{params, OptionalExtension};
use std::collections::HashMap;
use std::sync::Mutex;

use super::database::{DatabaseManager, StorageError, StorageResult};

/// A string-keyed store holding one serialized record per key.
pub trait KeyValueStore {
    fn get_state(&self, key: &str) -> StorageResult<Option<String>>;

    /// Insert or replace the value stored under `key`.
    fn set_state(&self, key: &str, value: &str) -> StorageResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get_state(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_state(key)
    }

    fn set_state(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set_state(key, value)
    }
}

impl KeyValueStore for DatabaseManager {
    fn get_state(&self, key: &str) -> StorageResult<Option<String>> {
        self.with_connection(|conn| {
            conn.query_row(
                "SELECT value FROM app_state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
        })
    }

    fn set_state(&self, key: &str, value: &str) -> StorageResult<()> {
        self.with_connection(|conn| {
            conn.execute(
                r#"
                INSERT INTO app_state (key, value, updated_at)
                VALUES (?1, ?2, datetime('now'))
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = datetime('now')
                "#,
                params![key, value],
            )?;
            Ok(())
        })
    }
}

/// Process-local store with the same semantics as the SQLite backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_state(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set_state(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
