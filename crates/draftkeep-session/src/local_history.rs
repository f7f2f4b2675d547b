//! Bounded stack of editor snapshots kept in profile-local storage.
//!
//! The stack belongs to the profile, not to a document: every session writes
//! to the same key. Reads always go back to storage so other writers in the
//! same profile are picked up.

use draftkeep_core::{HistoryEntry, KeyValueStore, is_meaningful};

use crate::config::SessionConfig;

/// What [`LocalHistory::append`] did with a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Written,
    /// Skeleton document or a repeat of the head
    Skipped,
    /// Storage rejected the write
    Failed,
}

impl AppendOutcome {
    pub fn is_written(self) -> bool {
        self == Self::Written
    }

    pub fn is_failed(self) -> bool {
        self == Self::Failed
    }
}

/// Local snapshot history, newest first
#[derive(Debug)]
pub struct LocalHistory<S> {
    store: S,
    key: String,
    max_entries: usize,
    min_state_len: usize,
}

impl<S: KeyValueStore> LocalHistory<S> {
    pub fn new(store: S, config: &SessionConfig) -> Self {
        Self {
            store,
            key: config.history_key.clone(),
            max_entries: config.max_history_entries,
            min_state_len: config.min_state_len,
        }
    }

    /// Push a snapshot onto the stack and persist it.
    ///
    /// Skeleton documents and repeats of the current head are skipped.
    /// Storage failures are logged and reported as [`AppendOutcome::Failed`].
    pub fn append(&self, state: &str) -> AppendOutcome {
        if !is_meaningful(state, self.min_state_len) {
            tracing::debug!(bytes = state.len(), "skipping empty snapshot");
            return AppendOutcome::Skipped;
        }

        let mut entries = self.list();
        if entries.first().is_some_and(|head| head.state() == state) {
            return AppendOutcome::Skipped;
        }

        entries.insert(0, HistoryEntry::new(state));
        entries.truncate(self.max_entries);

        let serialized = match serde_json::to_string(&entries) {
            Ok(serialized) => serialized,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode local history");
                return AppendOutcome::Failed;
            }
        };
        if let Err(e) = self.store.set(&self.key, &serialized) {
            tracing::warn!(error = %e, key = %self.key, "failed to persist local history");
            return AppendOutcome::Failed;
        }

        tracing::debug!(entries = entries.len(), "local snapshot stored");
        AppendOutcome::Written
    }

    /// All snapshots, newest first. Missing or unreadable storage reads as empty.
    pub fn list(&self) -> Vec<HistoryEntry> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, key = %self.key, "failed to read local history");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, key = %self.key, "local history is corrupt, ignoring");
                Vec::new()
            }
        }
    }

    pub fn latest(&self) -> Option<HistoryEntry> {
        self.list().into_iter().next()
    }

    pub fn len(&self) -> usize {
        self.list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.list().is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
