//! The editing session: save, autosave, exit flush, version list, preview
//! and revert around one live editor.
//!
//! The controller is owned by a single task. Saves are awaited by that owner,
//! so at most one is in flight and responses cannot land out of order.

use draftkeep_core::{
    DocumentId, DocumentIdentity, HistoryId, KeyValueStore, RemoteHistoryEntry, SaveStatus,
    SaveTracker, SessionPhase, Version, to_canonical_string,
};
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::config::SessionConfig;
use crate::editor::{Editor, load_or_blank};
use crate::events::{EventSink, SessionEvent};
use crate::local_history::LocalHistory;
use crate::remote::{DocumentUpdate, RemoteDocuments, RemoteError};
use crate::scheduler::AutosaveScheduler;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("revert is only available for versions of a saved document")]
    RevertUnavailable,

    #[error("document already exists remotely as {0}")]
    AlreadyPersisted(DocumentId),

    #[error("document has not been created remotely yet")]
    NotPersisted,

    #[error("restored content could not be loaded: {0}")]
    InvalidContent(String),

    #[error("local snapshot could not be stored")]
    LocalStore,
}

/// A revert the user has been asked to confirm.
///
/// Only [`SaveController::request_revert`] creates one, and only
/// [`SaveController::confirm_revert`] consumes it.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "a revert only happens once the pending request is confirmed"]
pub struct PendingRevert {
    document_id: DocumentId,
    history_id: HistoryId,
    label: String,
}

impl PendingRevert {
    pub fn history_id(&self) -> &HistoryId {
        &self.history_id
    }

    /// Prompt text describing what will be restored
    pub fn label(&self) -> &str {
        &self.label
    }
}

pub struct SaveController<S, R, E> {
    history: LocalHistory<S>,
    tracker: SaveTracker,
    scheduler: AutosaveScheduler,
    identity: DocumentIdentity,
    remote: R,
    editor: E,
    events: EventSink,
    reverting: bool,
}

impl<S, R, E> SaveController<S, R, E>
where
    S: KeyValueStore,
    R: RemoteDocuments,
    E: Editor,
{
    pub fn new(store: S, remote: R, config: &SessionConfig, events: EventSink) -> Self {
        Self {
            history: LocalHistory::new(store, config),
            tracker: SaveTracker::new(),
            scheduler: AutosaveScheduler::new(config.autosave_window(), config.autosave_enabled),
            identity: DocumentIdentity::Draft,
            remote,
            editor: E::default(),
            events,
            reverting: false,
        }
    }

    /// Start editing `content` under `identity`. Undecodable content leaves
    /// a blank document.
    pub fn open(&mut self, identity: DocumentIdentity, content: Option<&str>) {
        match content {
            Some(content) => {
                load_or_blank(&mut self.editor, content);
            }
            None => self.editor.reset(),
        }
        self.identity = identity;
        self.scheduler.reset_latest(None);
        self.tracker.mark_saved();
        tracing::info!(document = ?self.identity.document_id(), "document opened");
    }

    /// Fetch a persisted document and start editing it
    pub async fn open_remote(&mut self, id: DocumentId) -> Result<(), SessionError> {
        match self.remote.fetch_document(&id).await {
            Ok(document) => {
                let content = to_canonical_string(&document.content);
                self.open(DocumentIdentity::Persisted(id), Some(&content));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(document = %id, error = %e, "failed to fetch document");
                self.events.toast(format!("Could not open document: {e}"));
                Err(e.into())
            }
        }
    }

    /// Feed a content-change event carrying the full serialized state
    pub fn on_change(&mut self, state: String) {
        self.on_change_at(state, Instant::now());
    }

    pub fn on_change_at(&mut self, state: String, now: Instant) {
        self.tracker.mark_dirty();
        self.scheduler.on_change_at(state, now);
    }

    /// Mutate the live document and report the change
    pub fn edit(&mut self, f: impl FnOnce(&mut E)) {
        f(&mut self.editor);
        let state = self.editor.serialize();
        self.on_change(state);
    }

    /// Persist `state` locally and, for saved documents, remotely.
    pub async fn save(&mut self, state: &str) -> Result<(), SessionError> {
        self.tracker.mark_saving();
        let local = self.history.append(state);

        if let Some(id) = self.identity.document_id() {
            if let Err(e) = self
                .remote
                .update_document(id, DocumentUpdate::content(state))
                .await
            {
                tracing::warn!(document = %id, error = %e, "remote save failed");
                self.tracker.mark_failed();
                self.events.toast(format!("Save failed: {e}"));
                return Err(e.into());
            }
            tracing::debug!(document = %id, bytes = state.len(), "remote save complete");
        } else if local.is_failed() {
            // A draft has no other copy, so the save did not happen
            self.tracker.mark_failed();
            return Err(SessionError::LocalStore);
        }

        self.tracker.mark_saved();
        self.events.emit(SessionEvent::SavedPulse);
        Ok(())
    }

    /// Save the latest state now, dropping any pending autosave
    pub async fn manual_save(&mut self) -> Result<(), SessionError> {
        self.scheduler.cancel();
        let state = self.current_state();
        self.save(&state).await
    }

    /// Run the autosave if its window has elapsed. Returns whether it ran.
    pub async fn fire_due_autosave(&mut self, now: Instant) -> bool {
        let Some(state) = self.scheduler.take_due(now) else {
            return false;
        };
        tracing::debug!("autosave window elapsed");
        // Failures were already reported by save
        let _ = self.save(&state).await;
        true
    }

    /// Last-chance local snapshot on teardown. Never touches the network.
    ///
    /// Returns whether a snapshot was written.
    pub fn flush_on_exit(&mut self) -> bool {
        if !self.scheduler.is_enabled() {
            return false;
        }
        self.scheduler.cancel();
        match self.scheduler.latest_state() {
            Some(state) => {
                let outcome = self.history.append(state);
                tracing::debug!(?outcome, "exit flush");
                outcome.is_written()
            }
            None => false,
        }
    }

    /// Versions to offer the user, newest first
    pub async fn list_versions(&self) -> Result<Vec<Version>, SessionError> {
        match self.identity.document_id() {
            Some(id) => match self.remote.document_history(id).await {
                Ok(entries) => Ok(entries.into_iter().map(Version::Remote).collect()),
                Err(e) => {
                    tracing::warn!(document = %id, error = %e, "failed to fetch history");
                    self.events.toast(format!("Could not load versions: {e}"));
                    Err(e.into())
                }
            },
            None => Ok(self.history.list().into_iter().map(Version::Local).collect()),
        }
    }

    /// Read-only copy of a version, rendered in a separate editor
    pub fn preview(&self, version: &Version) -> E {
        let mut preview = E::default();
        load_or_blank(&mut preview, &version.content());
        preview
    }

    /// Start a revert; the caller must get the user's confirmation before
    /// passing the result to [`Self::confirm_revert`].
    pub fn request_revert(&self, version: &Version) -> Result<PendingRevert, SessionError> {
        let (Some(document_id), Version::Remote(entry)) = (self.identity.document_id(), version)
        else {
            return Err(SessionError::RevertUnavailable);
        };
        Ok(Self::pending_for(document_id, entry))
    }

    fn pending_for(document_id: &DocumentId, entry: &RemoteHistoryEntry) -> PendingRevert {
        PendingRevert {
            document_id: document_id.clone(),
            history_id: entry.history_id.clone(),
            label: format!(
                "{} by {} @ {}",
                entry.action, entry.user_name, entry.history_date
            ),
        }
    }

    /// Replace the live document with the server's restored version.
    ///
    /// On any failure the live document is left exactly as it was.
    pub async fn confirm_revert(&mut self, pending: PendingRevert) -> Result<(), SessionError> {
        if self.identity.document_id() != Some(&pending.document_id) {
            return Err(SessionError::RevertUnavailable);
        }

        self.reverting = true;
        let result = self
            .remote
            .revert_document(&pending.document_id, &pending.history_id)
            .await;
        self.reverting = false;

        let restored = match result {
            Ok(restored) => restored,
            Err(e) => {
                tracing::warn!(document = %pending.document_id, error = %e, "revert failed");
                self.events.toast(format!("Revert failed: {e}"));
                return Err(e.into());
            }
        };

        let content = to_canonical_string(&restored.content);
        let mut editor = E::default();
        if let Err(e) = editor.load(&content) {
            tracing::warn!(
                document = %pending.document_id,
                error = %e,
                "restored content is unreadable"
            );
            self.events.toast(format!("Revert failed: {e}"));
            return Err(SessionError::InvalidContent(e.to_string()));
        }

        self.editor = editor;
        self.scheduler.reset_latest(Some(self.editor.serialize()));
        self.tracker.mark_saved();
        tracing::info!(document = %pending.document_id, history = %pending.history_id, "reverted");
        self.events.emit(SessionEvent::Reverted(pending.history_id));
        Ok(())
    }

    /// Create the draft on the server; later saves also go remote.
    pub async fn create_remote(&mut self, title: &str) -> Result<DocumentId, SessionError> {
        if let Some(id) = self.identity.document_id() {
            return Err(SessionError::AlreadyPersisted(id.clone()));
        }

        let state = self.current_state();
        self.tracker.mark_saving();
        match self.remote.create_document(title, &state).await {
            Ok(id) => {
                self.identity = DocumentIdentity::Persisted(id.clone());
                self.history.append(&state);
                self.scheduler.cancel();
                self.tracker.mark_saved();
                tracing::info!(document = %id, "draft created remotely");
                self.events.emit(SessionEvent::Created(id.clone()));
                Ok(id)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to create document");
                self.tracker.mark_failed();
                self.events.toast(format!("Could not create document: {e}"));
                Err(e.into())
            }
        }
    }

    /// Switch a draft to an id the host obtained on its own
    pub fn adopt_document_id(&mut self, id: DocumentId) -> Result<(), SessionError> {
        if let Some(existing) = self.identity.document_id() {
            return Err(SessionError::AlreadyPersisted(existing.clone()));
        }
        tracing::info!(document = %id, "draft adopted remote id");
        self.identity = DocumentIdentity::Persisted(id);
        Ok(())
    }

    pub async fn rename(&mut self, title: &str) -> Result<(), SessionError> {
        let Some(id) = self.identity.document_id() else {
            return Err(SessionError::NotPersisted);
        };
        if let Err(e) = self
            .remote
            .update_document(id, DocumentUpdate::title(title))
            .await
        {
            self.events.toast(format!("Rename failed: {e}"));
            return Err(e.into());
        }
        Ok(())
    }

    pub fn set_autosave(&mut self, enabled: bool) {
        tracing::debug!(enabled, "autosave toggled");
        self.scheduler.set_enabled(enabled);
    }

    pub fn autosave_enabled(&self) -> bool {
        self.scheduler.is_enabled()
    }

    pub fn autosave_deadline(&self) -> Option<Instant> {
        self.scheduler.deadline()
    }

    /// Latest known document state
    pub fn current_state(&self) -> String {
        match self.scheduler.latest_state() {
            Some(state) => state.to_string(),
            None => self.editor.serialize(),
        }
    }

    pub fn status(&self) -> SaveStatus {
        self.tracker.status()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<SaveStatus> {
        self.tracker.subscribe()
    }

    pub fn phase(&self) -> SessionPhase {
        SessionPhase::derive(
            self.identity.is_persisted(),
            self.tracker.status(),
            self.reverting,
        )
    }

    pub fn identity(&self) -> &DocumentIdentity {
        &self.identity
    }

    pub fn history(&self) -> &LocalHistory<S> {
        &self.history
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }
}
