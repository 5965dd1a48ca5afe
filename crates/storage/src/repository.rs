use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Names of the persisted documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentKey {
    Progress,
    Settings,
    Leaderboard,
}

impl DocumentKey {
    pub const ALL: [DocumentKey; 3] = [
        DocumentKey::Progress,
        DocumentKey::Settings,
        DocumentKey::Leaderboard,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKey::Progress => "progress",
            DocumentKey::Settings => "settings",
            DocumentKey::Leaderboard => "leaderboard",
        }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key-value contract for JSON documents.
///
/// Implementations store bodies verbatim; interpreting them is left to
/// `load_document`/`save_document`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the raw body stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get_document(&self, key: DocumentKey) -> Result<Option<String>, StorageError>;

    /// Replace the body stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn put_document(&self, key: DocumentKey, body: &str) -> Result<(), StorageError>;

    /// Remove the document stored under `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn delete_document(&self, key: DocumentKey) -> Result<(), StorageError>;
}

/// Load and decode a document, falling back to `T::default()` when it is
/// missing or its body does not parse.
///
/// # Errors
///
/// Returns `StorageError` only for backend failures, never for bad content.
pub async fn load_document<T>(
    store: &dyn DocumentStore,
    key: DocumentKey,
) -> Result<T, StorageError>
where
    T: DeserializeOwned + Default,
{
    let Some(body) = store.get_document(key).await? else {
        return Ok(T::default());
    };

    match serde_json::from_str(&body) {
        Ok(value) => Ok(value),
        Err(err) => {
            log::warn!("stored {key} document is malformed, using defaults: {err}");
            Ok(T::default())
        }
    }
}

/// Encode `value` as JSON and store it under `key`.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails, or backend errors.
pub async fn save_document<T>(
    store: &dyn DocumentStore,
    key: DocumentKey,
    value: &T,
) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
{
    let body =
        serde_json::to_string(value).map_err(|err| StorageError::Serialization(err.to_string()))?;
    store.put_document(key, &body).await
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    documents: Arc<Mutex<HashMap<DocumentKey, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            documents: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryRepository {
    async fn get_document(&self, key: DocumentKey) -> Result<Option<String>, StorageError> {
        let guard = self
            .documents
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&key).cloned())
    }

    async fn put_document(&self, key: DocumentKey, body: &str) -> Result<(), StorageError> {
        let mut guard = self
            .documents
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key, body.to_owned());
        Ok(())
    }

    async fn delete_document(&self, key: DocumentKey) -> Result<(), StorageError> {
        let mut guard = self
            .documents
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(&key);
        Ok(())
    }
}

/// Persistence entry point handed to services, backend hidden behind a trait object.
#[derive(Clone)]
pub struct Storage {
    pub documents: Arc<dyn DocumentStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let documents: Arc<dyn DocumentStore> = Arc::new(InMemoryRepository::new());
        Self { documents }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{ChapterIndex, Leaderboard, LevelNumber, ProgressMap, Settings};

    #[tokio::test]
    async fn missing_document_loads_default() {
        let repo = InMemoryRepository::new();
        let settings: Settings = load_document(&repo, DocumentKey::Settings).await.unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[tokio::test]
    async fn round_trips_progress_document() {
        let repo = InMemoryRepository::new();
        let mut progress = ProgressMap::initialized(2);
        progress.unlock(ChapterIndex::new(1), LevelNumber::new(3).unwrap());

        save_document(&repo, DocumentKey::Progress, &progress)
            .await
            .unwrap();
        let loaded: ProgressMap = load_document(&repo, DocumentKey::Progress).await.unwrap();
        assert_eq!(loaded, progress);
    }

    #[tokio::test]
    async fn malformed_documents_fall_back_to_defaults() {
        let repo = InMemoryRepository::new();
        repo.put_document(DocumentKey::Progress, "{not json")
            .await
            .unwrap();
        repo.put_document(DocumentKey::Leaderboard, r#"{"oops":true}"#)
            .await
            .unwrap();
        repo.put_document(DocumentKey::Settings, "[1,2,3]")
            .await
            .unwrap();

        let progress: ProgressMap = load_document(&repo, DocumentKey::Progress).await.unwrap();
        let board: Leaderboard = load_document(&repo, DocumentKey::Leaderboard)
            .await
            .unwrap();
        let settings: Settings = load_document(&repo, DocumentKey::Settings).await.unwrap();

        assert!(progress.is_empty());
        assert!(board.is_empty());
        assert_eq!(settings, Settings::default());
    }

    #[tokio::test]
    async fn delete_removes_document() {
        let repo = InMemoryRepository::new();
        save_document(&repo, DocumentKey::Settings, &Settings::new(false, false))
            .await
            .unwrap();
        repo.delete_document(DocumentKey::Settings).await.unwrap();
        assert!(
            repo.get_document(DocumentKey::Settings)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn keys_use_logical_names() {
        let names: Vec<&str> = DocumentKey::ALL.iter().map(DocumentKey::as_str).collect();
        assert_eq!(names, vec!["progress", "settings", "leaderboard"]);
    }
}
