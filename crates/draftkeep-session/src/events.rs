//! Notifications from the session to its host UI.

use draftkeep_core::{DocumentId, HistoryId};
use tokio::sync::mpsc;

/// Events from the session to whatever renders status and toasts
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A save completed; hosts flash their "saved" indicator
    SavedPulse,
    /// The draft was created remotely and now has an id
    Created(DocumentId),
    /// The live document was replaced by a historical version
    Reverted(HistoryId),
    /// User-facing failure (failed save, revert or version fetch)
    Error(String),
}

/// Sending half used by the controller. Sending never fails loudly: a host
/// that dropped its receiver simply stops getting notifications.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<mpsc::UnboundedSender<SessionEvent>>,
}

impl EventSink {
    pub fn new(tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Sink with no listener
    pub fn detached() -> Self {
        Self { tx: None }
    }

    /// Create a sink and the receiver the host polls
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    pub fn emit(&self, event: SessionEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }

    pub fn toast(&self, message: impl Into<String>) {
        self.emit(SessionEvent::Error(message.into()));
    }
}
