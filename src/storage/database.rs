// Database connection manager for local SQLite storage
// Resolves the per-user data directory and owns the app_state table

use rusqlite::{Connection, Result as SqliteResult};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Failed to get app data directory")]
    AppDataDir,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Corrupt record under '{key}': {reason}")]
    CorruptRecord { key: String, reason: String },
    #[error("Storage lock poisoned")]
    LockPoisoned,
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Database manager for local SQLite storage
pub struct DatabaseManager {
    connection: Mutex<Connection>,
}

impl DatabaseManager {
    /// Create a new database manager with the given database path
    pub fn new(db_path: PathBuf) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let connection = Connection::open(&db_path)?;

        let manager = Self {
            connection: Mutex::new(connection),
        };

        manager.init_schema()?;

        Ok(manager)
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.connection.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Initialize the database schema
    fn init_schema(&self) -> StorageResult<()> {
        let conn = self.lock()?;

        conn.execute_batch(
            r#"
            -- Key-value state, one serialized record per key
            CREATE TABLE IF NOT EXISTS app_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;

        Ok(())
    }

    /// Execute a function with database connection access
    pub fn with_connection<F, T>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&Connection) -> SqliteResult<T>,
    {
        let conn = self.lock()?;
        f(&conn).map_err(StorageError::from)
    }
}

/// Get the default database path in the app data directory
pub fn get_default_db_path() -> StorageResult<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "pair-analytics", "pair-analytics")
        .ok_or(StorageError::AppDataDir)?;

    let data_dir = proj_dirs.data_dir();
    Ok(data_dir.join("local_state.db"))
}
