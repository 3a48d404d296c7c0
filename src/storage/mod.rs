// Local persistence for dashboard UI state
// This module handles saving/loading pinned pairs and tokens and dismissed warnings

pub mod database;
pub mod kv;
pub mod pinned;
pub mod dismissed;

pub use database::{DatabaseManager, StorageError, StorageResult, get_default_db_path};
pub use kv::{KeyValueStore, MemoryStore};
pub use pinned::{PinKind, PinnedPair, PinnedRecord, PinnedStore, PinnedToken, PINNED_INFO_KEY};
pub use dismissed::{DismissedPaths, DISMISSED_PATHS_KEY};
