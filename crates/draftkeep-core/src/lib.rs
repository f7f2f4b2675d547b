//! Core types for draftkeep.
//!
//! Everything here is host-agnostic: serialized document snapshots are opaque
//! strings, persistence goes through the [`storage::KeyValueStore`] trait, and
//! the save status is a plain observable value.

pub mod content;
pub mod history;
pub mod ids;
pub mod status;
pub mod storage;

pub use content::{EMPTY_DOCUMENT_STATE, is_meaningful, to_canonical_string};
pub use history::{HistoryEntry, RemoteHistoryEntry, Version};
pub use ids::{DocumentId, DocumentIdentity, HistoryId};
pub use status::{SaveStatus, SaveTracker, SessionPhase};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
