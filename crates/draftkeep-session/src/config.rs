//! Tunables for an editing session.

use std::time::Duration;

use draftkeep_core::content::DEFAULT_MIN_STATE_LEN;
use serde::{Deserialize, Serialize};

/// Storage key owned by the local history store
pub const HISTORY_KEY: &str = "editorHistory";

/// Maximum number of local snapshots kept
pub const MAX_HISTORY_ENTRIES: usize = 12;

/// Inactivity window before an autosave fires (5 minutes)
pub const AUTOSAVE_WINDOW: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub autosave_enabled: bool,
    /// Inactivity window in seconds
    pub autosave_window_secs: u64,
    pub max_history_entries: usize,
    pub min_state_len: usize,
    pub history_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            autosave_enabled: true,
            autosave_window_secs: AUTOSAVE_WINDOW.as_secs(),
            max_history_entries: MAX_HISTORY_ENTRIES,
            min_state_len: DEFAULT_MIN_STATE_LEN,
            history_key: HISTORY_KEY.to_string(),
        }
    }
}

impl SessionConfig {
    pub fn autosave_window(&self) -> Duration {
        Duration::from_secs(self.autosave_window_secs)
    }

    /// Sub-second parts of `window` are dropped
    pub fn with_autosave_window(mut self, window: Duration) -> Self {
        self.autosave_window_secs = window.as_secs();
        self
    }

    pub fn with_autosave(mut self, enabled: bool) -> Self {
        self.autosave_enabled = enabled;
        self
    }

    pub fn with_max_history_entries(mut self, max: usize) -> Self {
        self.max_history_entries = max;
        self
    }

    pub fn with_min_state_len(mut self, min_len: usize) -> Self {
        self.min_state_len = min_len;
        self
    }
}
