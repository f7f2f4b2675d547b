//! Save status of the live document.

use tokio::sync::watch;

/// Whether the in-memory document matches what was last persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Saved,
    Saving,
    Unsaved,
}

impl std::fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Saved => "saved",
            Self::Saving => "saving…",
            Self::Unsaved => "unsaved",
        };
        f.write_str(text)
    }
}

/// Dirty tracking, observable by any number of UI consumers.
#[derive(Debug)]
pub struct SaveTracker {
    tx: watch::Sender<SaveStatus>,
}

impl SaveTracker {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SaveStatus::Saved);
        Self { tx }
    }

    pub fn status(&self) -> SaveStatus {
        *self.tx.borrow()
    }

    /// Receiver that sees every later transition
    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.tx.subscribe()
    }

    pub fn mark_dirty(&self) {
        self.set(SaveStatus::Unsaved);
    }

    pub fn mark_saving(&self) {
        self.set(SaveStatus::Saving);
    }

    pub fn mark_saved(&self) {
        self.set(SaveStatus::Saved);
    }

    /// A failed persistence attempt leaves the document unsaved
    pub fn mark_failed(&self) {
        self.set(SaveStatus::Unsaved);
    }

    fn set(&self, status: SaveStatus) {
        self.tx.send_replace(status);
    }
}

impl Default for SaveTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Where the editing session sits in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    DraftClean,
    DraftDirty,
    PersistedClean,
    PersistedDirty,
    Saving,
    Reverting,
}

impl SessionPhase {
    /// Derive the phase from identity, status and an in-flight revert.
    pub fn derive(persisted: bool, status: SaveStatus, reverting: bool) -> Self {
        if reverting {
            return Self::Reverting;
        }
        match (persisted, status) {
            (_, SaveStatus::Saving) => Self::Saving,
            (false, SaveStatus::Saved) => Self::DraftClean,
            (false, SaveStatus::Unsaved) => Self::DraftDirty,
            (true, SaveStatus::Saved) => Self::PersistedClean,
            (true, SaveStatus::Unsaved) => Self::PersistedDirty,
        }
    }
}
