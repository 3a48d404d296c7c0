// Per-route "warning dismissed" flags
// Stored as a JSON object of path -> true under the `dismissedPaths` key

use std::collections::BTreeMap;

use super::database::{StorageError, StorageResult};
use super::kv::KeyValueStore;

pub const DISMISSED_PATHS_KEY: &str = "dismissedPaths";

type PathFlags = BTreeMap<String, bool>;

pub struct DismissedPaths<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> DismissedPaths<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn try_load(&self) -> StorageResult<PathFlags> {
        match self.store.get_state(DISMISSED_PATHS_KEY)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| StorageError::CorruptRecord {
                key: DISMISSED_PATHS_KEY.to_string(),
                reason: e.to_string(),
            }),
            None => Ok(PathFlags::new()),
        }
    }

    fn load_for_update(&self) -> StorageResult<PathFlags> {
        match self.try_load() {
            Err(StorageError::CorruptRecord { reason, .. }) => {
                log::warn!("Replacing corrupt dismissed paths: {}", reason);
                Ok(PathFlags::new())
            }
            other => other,
        }
    }

    pub fn is_dismissed(&self, path: &str) -> bool {
        match self.try_load() {
            Ok(flags) => flags.get(path).copied().unwrap_or(false),
            Err(e) => {
                log::warn!("Ignoring dismissed paths: {}", e);
                false
            }
        }
    }

    /// Returns whether the flag changed.
    pub fn mark_dismissed(&self, path: &str) -> StorageResult<bool> {
        let mut flags = self.load_for_update()?;
        if flags.get(path).copied().unwrap_or(false) {
            return Ok(false);
        }
        flags.insert(path.to_string(), true);
        self.store
            .set_state(DISMISSED_PATHS_KEY, &serde_json::to_string(&flags)?)?;
        Ok(true)
    }

    /// Show the warning on `path` again.
    pub fn restore(&self, path: &str) -> StorageResult<bool> {
        let mut flags = self.load_for_update()?;
        if flags.remove(path).is_none() {
            return Ok(false);
        }
        self.store
            .set_state(DISMISSED_PATHS_KEY, &serde_json::to_string(&flags)?)?;
        Ok(true)
    }
}
