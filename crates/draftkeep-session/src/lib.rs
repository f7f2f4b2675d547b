//! Autosave and version history around a document editor.
//!
//! A [`SaveController`] owns one editing session: it tracks dirtiness,
//! debounces autosaves, keeps a bounded local snapshot stack, pushes saves to
//! the remote document service once the document has an id, and reverts to
//! server-side versions on confirmation.

pub mod config;
pub mod controller;
pub mod editor;
pub mod events;
pub mod local_history;
pub mod remote;
pub mod scheduler;

pub use config::SessionConfig;
pub use controller::{PendingRevert, SaveController, SessionError};
pub use editor::Editor;
pub use events::{EventSink, SessionEvent};
pub use local_history::{AppendOutcome, LocalHistory};
pub use remote::{
    DocumentUpdate, Offline, RemoteDocument, RemoteDocuments, RemoteError, RevertedDocument,
};
pub use scheduler::{AutosaveScheduler, sleep_until_deadline};
