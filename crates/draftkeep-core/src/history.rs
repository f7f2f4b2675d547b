//! Snapshot records: local history entries and rows from the remote history API.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::content::to_canonical_string;
use crate::ids::HistoryId;

/// Milliseconds since the Unix epoch
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// One serialized editor snapshot in the local history stack.
///
/// The state is an opaque blob; nothing in the history path parses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    state: String,
    timestamp: u64,
}

impl HistoryEntry {
    /// Snapshot taken now
    pub fn new(state: impl Into<String>) -> Self {
        Self::with_timestamp(state, now_millis())
    }

    pub fn with_timestamp(state: impl Into<String>, timestamp: u64) -> Self {
        Self {
            state: state.into(),
            timestamp,
        }
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }
}

/// A row of the server-side document history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteHistoryEntry {
    pub history_id: HistoryId,
    pub history_date: String,
    pub user_name: String,
    pub action: String,
    /// Either a serialized string or a structured document object
    pub content: Value,
}

/// An entry of the version list shown to the user
#[derive(Debug, Clone, PartialEq)]
pub enum Version {
    Local(HistoryEntry),
    Remote(RemoteHistoryEntry),
}

impl Version {
    /// Document content in the string form editors load
    pub fn content(&self) -> String {
        match self {
            Self::Local(entry) => entry.state().to_string(),
            Self::Remote(entry) => to_canonical_string(&entry.content),
        }
    }

    /// Short description for version lists
    pub fn label(&self) -> String {
        match self {
            Self::Local(entry) => format!("local snapshot @ {}", entry.timestamp()),
            Self::Remote(entry) => format!(
                "{} by {} @ {}",
                entry.action, entry.user_name, entry.history_date
            ),
        }
    }

    /// Remote history id, if this version can be reverted to
    pub fn history_id(&self) -> Option<&HistoryId> {
        match self {
            Self::Local(_) => None,
            Self::Remote(entry) => Some(&entry.history_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entry_serializes_as_state_and_timestamp() {
        let entry = HistoryEntry::with_timestamp("abc", 17);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json, json!({"state": "abc", "timestamp": 17}));
    }

    #[test]
    fn remote_entry_decodes_backend_shape() {
        let raw = json!({
            "history_id": 3,
            "history_date": "2026-01-02T10:00:00Z",
            "user_name": "ana",
            "action": "update",
            "content": {"root": {"children": []}}
        });
        let entry: RemoteHistoryEntry = serde_json::from_value(raw).unwrap();
        assert_eq!(entry.history_id, HistoryId::new("3"));

        let version = Version::Remote(entry);
        assert_eq!(version.content(), r#"{"root":{"children":[]}}"#);
        assert_eq!(version.label(), "update by ana @ 2026-01-02T10:00:00Z");
        assert!(version.history_id().is_some());
    }

    #[test]
    fn local_versions_cannot_be_reverted_remotely() {
        let version = Version::Local(HistoryEntry::with_timestamp("s", 1));
        assert_eq!(version.history_id(), None);
        assert_eq!(version.content(), "s");
    }
}
