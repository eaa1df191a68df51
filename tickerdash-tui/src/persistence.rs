//! App state persistence: JSON save/load across restarts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use tickerdash_core::domain::{Ticker, TimeRange};

use crate::app::{AppState, Overlay};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub last_ticker: Option<Ticker>,
    pub last_range: Option<TimeRange>,
    pub welcome_dismissed: bool,
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Extract persisted state from AppState. An unparseable ticker field keeps
/// nothing rather than an invalid symbol.
pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        last_ticker: Ticker::parse(&app.ticker_input).ok(),
        last_range: Some(app.range),
        welcome_dismissed: app.overlay != Overlay::Welcome,
    }
}

/// Apply persisted state to AppState.
pub fn apply(app: &mut AppState, state: PersistedState) {
    if let Some(ticker) = state.last_ticker {
        app.ticker_input = ticker.to_string();
    }
    if let Some(range) = state.last_range {
        app.range = range;
    }
    if !state.welcome_dismissed {
        app.overlay = Overlay::Welcome;
    }
}
