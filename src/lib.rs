// Local state for the pair analytics dashboard: pinned pairs and tokens,
// dismissed warnings, and the pair page values derived from fetched data

// Module declarations
pub mod commands;
pub mod pages;
pub mod storage;

use commands::AppState;
use std::path::PathBuf;
use storage::{get_default_db_path, DatabaseManager, PinnedStore, StorageResult};

/// Open local state in the per-user data directory
pub fn init_app_state() -> StorageResult<AppState> {
    init_app_state_at(get_default_db_path()?)
}

/// Open local state backed by the database at `db_path`
pub fn init_app_state_at(db_path: PathBuf) -> StorageResult<AppState> {
    log::info!("[Startup] Database path: {:?}", db_path);
    let db_manager = DatabaseManager::new(db_path)?;

    let pinned = PinnedStore::new(&db_manager).load();
    log::info!(
        "[Startup] Pinned items: {} pairs, {} tokens",
        pinned.pairs.len(),
        pinned.tokens.len()
    );

    Ok(AppState::new(db_manager))
}
