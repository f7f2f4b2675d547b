//! Document service backed by a local directory.
//!
//! Stands in for the HTTP backend when running the terminal host: each
//! document is one JSON file holding its title, content and history rows.

use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use draftkeep_core::history::now_millis;
use draftkeep_core::{DocumentId, HistoryId, RemoteHistoryEntry};
use draftkeep_session::{
    DocumentUpdate, RemoteDocument, RemoteDocuments, RemoteError, RevertedDocument,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
struct StoredDocument {
    id: DocumentId,
    title: String,
    content: String,
    /// Newest first
    history: Vec<RemoteHistoryEntry>,
    next_history_id: u64,
}

impl StoredDocument {
    fn record(&mut self, action: &str) {
        let entry = RemoteHistoryEntry {
            history_id: HistoryId::new(self.next_history_id.to_string()),
            history_date: now_millis().to_string(),
            user_name: current_user(),
            action: action.to_string(),
            content: Value::String(self.content.clone()),
        };
        self.next_history_id += 1;
        self.history.insert(0, entry);
    }
}

fn current_user() -> String {
    std::env::var("USER").unwrap_or_else(|_| "local".to_string())
}

#[derive(Debug, Clone)]
pub struct DirRemote {
    root: PathBuf,
}

impl DirRemote {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Ids come from the command line, so anything but `[A-Za-z0-9_-]` is
    /// replaced to keep the file inside `root`
    fn path_for(&self, id: &DocumentId) -> PathBuf {
        let name: String = id
            .as_str()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.root.join(format!("{name}.json"))
    }

    fn read(&self, id: &DocumentId) -> Result<StoredDocument, RemoteError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(RemoteError::NotFound(id.to_string()));
        }
        let raw = fs::read_to_string(&path).map_err(|e| RemoteError::Transport(e.to_string()))?;
        serde_json::from_str(&raw).map_err(|e| RemoteError::Decode(e.to_string()))
    }

    fn write(&self, doc: &StoredDocument) -> Result<(), RemoteError> {
        fs::create_dir_all(&self.root).map_err(|e| RemoteError::Transport(e.to_string()))?;
        let raw =
            serde_json::to_string_pretty(doc).map_err(|e| RemoteError::Decode(e.to_string()))?;
        fs::write(self.path_for(&doc.id), raw).map_err(|e| RemoteError::Transport(e.to_string()))
    }
}

#[async_trait]
impl RemoteDocuments for DirRemote {
    async fn fetch_document(&self, id: &DocumentId) -> Result<RemoteDocument, RemoteError> {
        let doc = self.read(id)?;
        Ok(RemoteDocument {
            id: doc.id,
            title: doc.title,
            content: Value::String(doc.content),
        })
    }

    async fn create_document(&self, title: &str, content: &str) -> Result<DocumentId, RemoteError> {
        let mut doc = StoredDocument {
            id: DocumentId::new(Uuid::new_v4().to_string()),
            title: title.to_string(),
            content: content.to_string(),
            history: Vec::new(),
            next_history_id: 1,
        };
        doc.record("create");
        self.write(&doc)?;
        tracing::debug!(document = %doc.id, "created document");
        Ok(doc.id)
    }

    async fn update_document(
        &self,
        id: &DocumentId,
        update: DocumentUpdate,
    ) -> Result<(), RemoteError> {
        let mut doc = self.read(id)?;
        if let Some(title) = update.title {
            doc.title = title;
            doc.record("rename");
        }
        if let Some(content) = update.content {
            doc.content = content;
            doc.record("update");
        }
        self.write(&doc)
    }

    async fn document_history(
        &self,
        id: &DocumentId,
    ) -> Result<Vec<RemoteHistoryEntry>, RemoteError> {
        Ok(self.read(id)?.history)
    }

    async fn revert_document(
        &self,
        id: &DocumentId,
        history_id: &HistoryId,
    ) -> Result<RevertedDocument, RemoteError> {
        let mut doc = self.read(id)?;
        let content = doc
            .history
            .iter()
            .find(|entry| &entry.history_id == history_id)
            .map(|entry| draftkeep_core::to_canonical_string(&entry.content))
            .ok_or_else(|| RemoteError::NotFound(format!("{id}@{history_id}")))?;
        doc.content = content;
        doc.record("revert");
        self.write(&doc)?;
        Ok(RevertedDocument {
            content: Value::String(doc.content),
        })
    }
}
