// Pinned pairs and tokens ("saved" items on the analytics pages)
// One JSON record under the `pinnedInfo` key holds both collections

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

use super::database::{StorageError, StorageResult};
use super::kv::KeyValueStore;

/// Storage key of the pinned record.
pub const PINNED_INFO_KEY: &str = "pinnedInfo";

/// Highest record layout this build reads and the one it writes.
/// Records without a `version` field use the unversioned layout (version 1).
pub const PINNED_SCHEMA_VERSION: u32 = 1;

/// Which collection of the record an address is looked up in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinKind {
    Token,
    Pair,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinnedToken {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Fields written by other clients, kept as-is on rewrite
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PinnedToken {
    pub fn new(address: impl Into<String>, symbol: Option<String>) -> Self {
        Self {
            address: address.into(),
            symbol,
            extra: Map::new(),
        }
    }
}

/// A pinned pair. Serialized with the field names the dashboard has always
/// stored (`address1`, `symbol1`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedPair {
    pub address: String,
    #[serde(rename = "address1", default)]
    pub token0_address: String,
    #[serde(rename = "address2", default)]
    pub token1_address: String,
    #[serde(rename = "symbol1", default)]
    pub token0_symbol: String,
    #[serde(rename = "symbol2", default)]
    pub token1_symbol: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PinnedRecord {
    #[serde(default)]
    pub tokens: Vec<PinnedToken>,
    #[serde(default)]
    pub pairs: Vec<PinnedPair>,
}

impl PinnedRecord {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.pairs.is_empty()
    }

    pub fn contains(&self, kind: PinKind, address: &str) -> bool {
        match kind {
            PinKind::Token => self.tokens.iter().any(|t| t.address == address),
            PinKind::Pair => self.pairs.iter().any(|p| p.address == address),
        }
    }

    /// Drop repeated addresses, keeping the first entry of each.
    /// Returns how many entries were removed.
    fn dedupe(&mut self) -> usize {
        let before = self.tokens.len() + self.pairs.len();

        let mut seen = HashSet::new();
        self.tokens.retain(|t| seen.insert(t.address.clone()));
        let mut seen = HashSet::new();
        self.pairs.retain(|p| seen.insert(p.address.clone()));

        before - (self.tokens.len() + self.pairs.len())
    }
}

#[derive(Deserialize)]
struct StoredRecord {
    #[serde(default = "legacy_version")]
    version: u32,
    #[serde(flatten)]
    record: PinnedRecord,
}

#[derive(Serialize)]
struct StoredRecordRef<'a> {
    version: u32,
    tokens: &'a [PinnedToken],
    pairs: &'a [PinnedPair],
}

fn legacy_version() -> u32 {
    1
}

/// Parse a stored `pinnedInfo` value, validating its layout version.
pub fn parse_record(raw: &str) -> StorageResult<PinnedRecord> {
    let corrupt = |reason: String| StorageError::CorruptRecord {
        key: PINNED_INFO_KEY.to_string(),
        reason,
    };

    let stored: StoredRecord = serde_json::from_str(raw).map_err(|e| corrupt(e.to_string()))?;

    if stored.version == 0 || stored.version > PINNED_SCHEMA_VERSION {
        return Err(corrupt(format!("unsupported version {}", stored.version)));
    }

    let mut record = stored.record;
    let dropped = record.dedupe();
    if dropped > 0 {
        log::debug!("Dropped {} duplicate pinned entries", dropped);
    }
    Ok(record)
}

/// Serialize a record in the current layout.
pub fn serialize_record(record: &PinnedRecord) -> StorageResult<String> {
    Ok(serde_json::to_string(&StoredRecordRef {
        version: PINNED_SCHEMA_VERSION,
        tokens: &record.tokens,
        pairs: &record.pairs,
    })?)
}

/// Bookmark store over any key-value backend.
///
/// Every mutation reloads the record, applies the change and writes the whole
/// record back. Reads never fail: a corrupt or unreadable record is treated as
/// empty.
pub struct PinnedStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> PinnedStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Strict read. `CorruptRecord` if the stored value has the wrong shape.
    pub fn try_load(&self) -> StorageResult<PinnedRecord> {
        match self.store.get_state(PINNED_INFO_KEY)? {
            Some(raw) => parse_record(&raw),
            None => Ok(PinnedRecord::default()),
        }
    }

    /// Fail-soft read; anything unreadable comes back as the empty record.
    pub fn load(&self) -> PinnedRecord {
        match self.try_load() {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Ignoring pinned items: {}", e);
                PinnedRecord::default()
            }
        }
    }

    pub fn is_pinned(&self, kind: PinKind, address: &str) -> bool {
        self.load().contains(kind, address)
    }

    pub fn pinned_pairs(&self) -> Vec<PinnedPair> {
        self.load().pairs
    }

    pub fn pinned_tokens(&self) -> Vec<PinnedToken> {
        self.load().tokens
    }

    /// Pin a pair unless one with the same address is already pinned.
    /// Returns whether the record changed.
    pub fn pin_pair(&self, pair: PinnedPair) -> StorageResult<bool> {
        self.update(|record| {
            if record.contains(PinKind::Pair, &pair.address) {
                return false;
            }
            record.pairs.push(pair);
            true
        })
    }

    /// Returns whether a pair was removed.
    pub fn unpin_pair(&self, address: &str) -> StorageResult<bool> {
        self.update(|record| match record.pairs.iter().position(|p| p.address == address) {
            Some(index) => {
                record.pairs.remove(index);
                true
            }
            None => false,
        })
    }

    /// Pin the pair if it is not pinned, unpin it otherwise.
    /// Returns the new pinned state.
    pub fn toggle_pair(&self, pair: PinnedPair) -> StorageResult<bool> {
        let address = pair.address.clone();
        let mut pinned = false;
        self.update(|record| {
            match record.pairs.iter().position(|p| p.address == address) {
                Some(index) => {
                    record.pairs.remove(index);
                }
                None => {
                    record.pairs.push(pair);
                    pinned = true;
                }
            }
            true
        })?;
        Ok(pinned)
    }

    pub fn pin_token(&self, token: PinnedToken) -> StorageResult<bool> {
        self.update(|record| {
            if record.contains(PinKind::Token, &token.address) {
                return false;
            }
            record.tokens.push(token);
            true
        })
    }

    pub fn unpin_token(&self, address: &str) -> StorageResult<bool> {
        self.update(|record| match record.tokens.iter().position(|t| t.address == address) {
            Some(index) => {
                record.tokens.remove(index);
                true
            }
            None => false,
        })
    }

    /// Read-modify-write. `apply` returns whether it changed the record;
    /// unchanged records are not written back.
    fn update<F>(&self, apply: F) -> StorageResult<bool>
    where
        F: FnOnce(&mut PinnedRecord) -> bool,
    {
        let mut record = match self.try_load() {
            Ok(record) => record,
            Err(StorageError::CorruptRecord { reason, .. }) => {
                log::warn!("Replacing corrupt pinned record: {}", reason);
                PinnedRecord::default()
            }
            Err(e) => return Err(e),
        };

        if !apply(&mut record) {
            return Ok(false);
        }

        self.store.set_state(PINNED_INFO_KEY, &serialize_record(&record)?)?;
        Ok(true)
    }
}
