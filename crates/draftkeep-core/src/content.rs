//! Normalization of opaque document content.
//!
//! Content reaches the session from two places: local snapshots (always
//! strings) and the remote history API, which hands back either a string or
//! an already-decoded JSON object. [`to_canonical_string`] is the single
//! conversion point for both.

use serde_json::Value;

/// Serialized state of a blank document: a root holding one empty paragraph.
pub const EMPTY_DOCUMENT_STATE: &str = r#"{"root":{"children":[{"children":[],"direction":null,"format":"","indent":0,"type":"paragraph","version":1}],"direction":null,"format":"","indent":0,"type":"root","version":1}}"#;

/// Snapshots shorter than this are treated as an empty skeleton.
pub const DEFAULT_MIN_STATE_LEN: usize = 200;

/// Convert remote or local content into the string form editors load.
pub fn to_canonical_string(content: &Value) -> String {
    match content {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Whether a snapshot carries enough content to be worth keeping.
///
/// Only length and byte equality are checked; the payload is never parsed.
pub fn is_meaningful(state: &str, min_len: usize) -> bool {
    let trimmed = state.trim();
    if trimmed.is_empty() || trimmed.len() < min_len {
        return false;
    }
    trimmed != EMPTY_DOCUMENT_STATE
}
