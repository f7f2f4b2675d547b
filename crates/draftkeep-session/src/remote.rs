//! Client contract for the remote document service.
//!
//! Only the calls the session needs are modelled. Transport, auth and
//! timeouts belong to the implementation.

use async_trait::async_trait;
use draftkeep_core::{DocumentId, HistoryId, RemoteHistoryEntry};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("document {0} not found")]
    NotFound(String),

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("could not decode response: {0}")]
    Decode(String),
}

/// Partial update; `None` fields are left as they are on the server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl DocumentUpdate {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            title: None,
        }
    }

    pub fn title(title: impl Into<String>) -> Self {
        Self {
            content: None,
            title: Some(title.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteDocument {
    pub id: DocumentId,
    pub title: String,
    pub content: Value,
}

/// What the server hands back after a revert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevertedDocument {
    pub content: Value,
}

#[async_trait]
pub trait RemoteDocuments: Send + Sync {
    async fn fetch_document(&self, id: &DocumentId) -> Result<RemoteDocument, RemoteError>;

    async fn create_document(&self, title: &str, content: &str)
    -> Result<DocumentId, RemoteError>;

    async fn update_document(
        &self,
        id: &DocumentId,
        update: DocumentUpdate,
    ) -> Result<(), RemoteError>;

    /// History rows, newest first
    async fn document_history(
        &self,
        id: &DocumentId,
    ) -> Result<Vec<RemoteHistoryEntry>, RemoteError>;

    async fn revert_document(
        &self,
        id: &DocumentId,
        history_id: &HistoryId,
    ) -> Result<RevertedDocument, RemoteError>;
}

#[async_trait]
impl<T: RemoteDocuments + ?Sized> RemoteDocuments for std::sync::Arc<T> {
    async fn fetch_document(&self, id: &DocumentId) -> Result<RemoteDocument, RemoteError> {
        (**self).fetch_document(id).await
    }

    async fn create_document(
        &self,
        title: &str,
        content: &str,
    ) -> Result<DocumentId, RemoteError> {
        (**self).create_document(title, content).await
    }

    async fn update_document(
        &self,
        id: &DocumentId,
        update: DocumentUpdate,
    ) -> Result<(), RemoteError> {
        (**self).update_document(id, update).await
    }

    async fn document_history(
        &self,
        id: &DocumentId,
    ) -> Result<Vec<RemoteHistoryEntry>, RemoteError> {
        (**self).document_history(id).await
    }

    async fn revert_document(
        &self,
        id: &DocumentId,
        history_id: &HistoryId,
    ) -> Result<RevertedDocument, RemoteError> {
        (**self).revert_document(id, history_id).await
    }
}

/// Remote for sessions that never leave draft mode
#[derive(Debug, Default, Clone, Copy)]
pub struct Offline;

#[async_trait]
impl RemoteDocuments for Offline {
    async fn fetch_document(&self, id: &DocumentId) -> Result<RemoteDocument, RemoteError> {
        Err(RemoteError::NotFound(id.to_string()))
    }

    async fn create_document(
        &self,
        _title: &str,
        _content: &str,
    ) -> Result<DocumentId, RemoteError> {
        Err(RemoteError::Transport("offline".to_string()))
    }

    async fn update_document(
        &self,
        _id: &DocumentId,
        _update: DocumentUpdate,
    ) -> Result<(), RemoteError> {
        Err(RemoteError::Transport("offline".to_string()))
    }

    async fn document_history(
        &self,
        _id: &DocumentId,
    ) -> Result<Vec<RemoteHistoryEntry>, RemoteError> {
        Err(RemoteError::Transport("offline".to_string()))
    }

    async fn revert_document(
        &self,
        _id: &DocumentId,
        _history_id: &HistoryId,
    ) -> Result<RevertedDocument, RemoteError> {
        Err(RemoteError::Transport("offline".to_string()))
    }
}
