// View-facing command handlers
// Each command locks the shared database, runs one storage operation and
// converts storage errors into strings for the UI. The embedding host wires
// these functions to its IPC or event layer.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use crate::pages::{PairOverview, PairSnapshot};
use crate::storage::{
    DatabaseManager, DismissedPaths, PinKind, PinnedPair, PinnedRecord, PinnedStore, PinnedToken,
};

/// Application state shared by all commands
pub struct AppState {
    pub db: Mutex<DatabaseManager>,
}

impl AppState {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db: Mutex::new(db) }
    }
}

/// Everything the pair page needs besides the fetched pair data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairPageState {
    pub overview: PairOverview,
    pub is_saved: bool,
    pub show_warning: bool,
}

// ============================================================================
// Pinned Item Commands
// ============================================================================

/// Get the pinned tokens and pairs (empty if nothing readable is stored)
pub fn get_pinned_info(state: &AppState) -> Result<PinnedRecord, String> {
    let db = state.db.lock().map_err(|e| e.to_string())?;
    Ok(PinnedStore::new(&*db).load())
}

/// Check whether a pair is pinned
pub fn is_pair_pinned(state: &AppState, address: String) -> Result<bool, String> {
    let db = state.db.lock().map_err(|e| e.to_string())?;
    Ok(PinnedStore::new(&*db).is_pinned(PinKind::Pair, &address))
}

/// Check whether a token is pinned
pub fn is_token_pinned(state: &AppState, address: String) -> Result<bool, String> {
    let db = state.db.lock().map_err(|e| e.to_string())?;
    Ok(PinnedStore::new(&*db).is_pinned(PinKind::Token, &address))
}

/// Pin a pair; returns false if it was already pinned
pub fn pin_pair(state: &AppState, pair: PinnedPair) -> Result<bool, String> {
    let db = state.db.lock().map_err(|e| e.to_string())?;
    PinnedStore::new(&*db).pin_pair(pair).map_err(|e| e.to_string())
}

/// Unpin a pair; returns false if it was not pinned
pub fn unpin_pair(state: &AppState, address: String) -> Result<bool, String> {
    let db = state.db.lock().map_err(|e| e.to_string())?;
    PinnedStore::new(&*db)
        .unpin_pair(&address)
        .map_err(|e| e.to_string())
}

/// Toggle the bookmark button on a pair page; returns the new pinned state
pub fn toggle_pair_pinned(state: &AppState, pair: PairSnapshot) -> Result<bool, String> {
    let db = state.db.lock().map_err(|e| e.to_string())?;
    PinnedStore::new(&*db)
        .toggle_pair(pair.to_pinned())
        .map_err(|e| e.to_string())
}

/// Pin a token; returns false if it was already pinned
pub fn pin_token(
    state: &AppState,
    address: String,
    symbol: Option<String>,
) -> Result<bool, String> {
    let db = state.db.lock().map_err(|e| e.to_string())?;
    PinnedStore::new(&*db)
        .pin_token(PinnedToken::new(address, symbol))
        .map_err(|e| e.to_string())
}

/// Unpin a token; returns false if it was not pinned
pub fn unpin_token(state: &AppState, address: String) -> Result<bool, String> {
    let db = state.db.lock().map_err(|e| e.to_string())?;
    PinnedStore::new(&*db)
        .unpin_token(&address)
        .map_err(|e| e.to_string())
}

// ============================================================================
// Warning Commands
// ============================================================================

/// Check whether the unlisted-token warning was dismissed on a route
pub fn is_path_dismissed(state: &AppState, path: String) -> Result<bool, String> {
    let db = state.db.lock().map_err(|e| e.to_string())?;
    Ok(DismissedPaths::new(&*db).is_dismissed(&path))
}

/// Hide the unlisted-token warning on a route
pub fn dismiss_path(state: &AppState, path: String) -> Result<bool, String> {
    let db = state.db.lock().map_err(|e| e.to_string())?;
    DismissedPaths::new(&*db)
        .mark_dismissed(&path)
        .map_err(|e| e.to_string())
}

/// Show the unlisted-token warning on a route again
pub fn restore_path_warning(state: &AppState, path: String) -> Result<bool, String> {
    let db = state.db.lock().map_err(|e| e.to_string())?;
    DismissedPaths::new(&*db).restore(&path).map_err(|e| e.to_string())
}

// ============================================================================
// Page Commands
// ============================================================================

/// Build the pair page header state for the route `path`
pub fn get_pair_page_state(
    state: &AppState,
    pair: PairSnapshot,
    eth_price: Option<f64>,
    listed_tokens: Option<Vec<String>>,
    path: String,
) -> Result<PairPageState, String> {
    let db = state.db.lock().map_err(|e| e.to_string())?;
    let dismissed = DismissedPaths::new(&*db).is_dismissed(&path);
    let is_saved = PinnedStore::new(&*db).is_pinned(PinKind::Pair, &pair.id);

    Ok(PairPageState {
        overview: pair.overview(eth_price),
        is_saved,
        show_warning: pair.show_unlisted_warning(listed_tokens.as_deref(), dismissed),
    })
}
