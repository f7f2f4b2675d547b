#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Result, bail};
use async_trait::async_trait;
use draftkeep_core::{DocumentId, HistoryId, KeyValueStore, MemoryStore, RemoteHistoryEntry};
use draftkeep_session::{
    DocumentUpdate, Editor, EventSink, RemoteDocument, RemoteDocuments, RemoteError,
    RevertedDocument, SaveController, SessionConfig, SessionEvent,
};
use serde_json::{Value, json};
use tokio::sync::{Notify, mpsc};

/// A serialized document long enough to be kept in local history
pub fn doc(text: &str) -> String {
    json!({
        "root": {
            "children": [{"type": "paragraph", "text": text}],
            "padding": "p".repeat(200),
            "type": "root",
        }
    })
    .to_string()
}

/// Editor whose document is its serialized string
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StringEditor {
    pub state: String,
}

impl Editor for StringEditor {
    fn serialize(&self) -> String {
        self.state.clone()
    }

    fn load(&mut self, state: &str) -> Result<()> {
        if !state.starts_with('{') {
            bail!("not a document: {state:?}");
        }
        self.state = state.to_string();
        Ok(())
    }

    fn reset(&mut self) {
        self.state.clear();
    }
}

/// Memory store that counts writes and can be made to refuse them
#[derive(Debug, Default)]
pub struct CountingStore {
    inner: MemoryStore,
    writes: AtomicUsize,
    full: AtomicBool,
}

impl CountingStore {
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Reject every later write, as with an exceeded quota
    pub fn fill_up(&self) {
        self.full.store(true, Ordering::SeqCst);
    }
}

impl KeyValueStore for CountingStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.full.load(Ordering::SeqCst) {
            bail!("quota exceeded");
        }
        self.inner.set(key, value)
    }
}

#[derive(Debug, Default)]
pub struct RemoteState {
    pub creates: usize,
    pub updates: Vec<(DocumentId, DocumentUpdate)>,
    pub reverts: usize,
    pub history: Vec<RemoteHistoryEntry>,
    pub documents: Vec<RemoteDocument>,
    pub fail_updates: bool,
    pub fail_reverts: bool,
    pub fail_history: bool,
    pub revert_content: Option<Value>,
    /// Held updates wait for this before answering
    pub update_gate: Option<Arc<Notify>>,
}

/// In-memory remote that records calls and fails on request
#[derive(Debug, Default)]
pub struct ScriptedRemote {
    pub state: Mutex<RemoteState>,
}

impl ScriptedRemote {
    pub fn with<T>(&self, f: impl FnOnce(&mut RemoteState) -> T) -> T {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    pub fn update_count(&self) -> usize {
        self.with(|s| s.updates.len())
    }
}

#[async_trait]
impl RemoteDocuments for ScriptedRemote {
    async fn fetch_document(&self, id: &DocumentId) -> Result<RemoteDocument, RemoteError> {
        self.with(|s| s.documents.iter().find(|d| &d.id == id).cloned())
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))
    }

    async fn create_document(
        &self,
        _title: &str,
        _content: &str,
    ) -> Result<DocumentId, RemoteError> {
        let n = self.with(|s| {
            s.creates += 1;
            s.creates
        });
        Ok(DocumentId::new(format!("doc-{n}")))
    }

    async fn update_document(
        &self,
        id: &DocumentId,
        update: DocumentUpdate,
    ) -> Result<(), RemoteError> {
        let gate = self.with(|s| s.update_gate.clone());
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.with(|s| {
            if s.fail_updates {
                return Err(RemoteError::Transport("connection reset".to_string()));
            }
            s.updates.push((id.clone(), update));
            Ok(())
        })
    }

    async fn document_history(
        &self,
        _id: &DocumentId,
    ) -> Result<Vec<RemoteHistoryEntry>, RemoteError> {
        self.with(|s| {
            if s.fail_history {
                return Err(RemoteError::Transport("timeout".to_string()));
            }
            Ok(s.history.clone())
        })
    }

    async fn revert_document(
        &self,
        _id: &DocumentId,
        history_id: &HistoryId,
    ) -> Result<RevertedDocument, RemoteError> {
        self.with(|s| {
            s.reverts += 1;
            if s.fail_reverts {
                return Err(RemoteError::Rejected("version locked".to_string()));
            }
            let content = s
                .revert_content
                .clone()
                .or_else(|| {
                    s.history
                        .iter()
                        .find(|h| &h.history_id == history_id)
                        .map(|h| h.content.clone())
                })
                .ok_or_else(|| RemoteError::NotFound(history_id.to_string()))?;
            Ok(RevertedDocument { content })
        })
    }
}

pub fn history_row(id: i64, content: Value) -> RemoteHistoryEntry {
    RemoteHistoryEntry {
        history_id: HistoryId::new(id.to_string()),
        history_date: format!("2026-03-0{id}T12:00:00Z"),
        user_name: "mika".to_string(),
        action: "update".to_string(),
        content,
    }
}

pub type TestController = SaveController<Arc<CountingStore>, Arc<ScriptedRemote>, StringEditor>;

pub struct Harness {
    pub controller: TestController,
    pub store: Arc<CountingStore>,
    pub remote: Arc<ScriptedRemote>,
    pub events: mpsc::UnboundedReceiver<SessionEvent>,
}

pub fn harness(config: SessionConfig) -> Harness {
    let store = Arc::new(CountingStore::default());
    let remote = Arc::new(ScriptedRemote::default());
    let (sink, events) = EventSink::channel();
    let controller = SaveController::new(store.clone(), remote.clone(), &config, sink);
    Harness {
        controller,
        store,
        remote,
        events,
    }
}

pub fn drain(events: &mut mpsc::UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}
