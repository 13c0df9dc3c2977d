//! Storage abstraction for note persistence.

mod memory;
mod persist;
mod queue;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStorage;
pub use persist::{BlockingPersister, Persister};
pub use queue::WriteQueue;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

use crate::codec::CodecError;
use crate::note::Note;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Note not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

impl From<CodecError> for StorageError {
    fn from(e: CodecError) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Trait for note storage backends.
///
/// Loaded notes carry their strokes and pages but no undo history.
pub trait Storage: Send + Sync {
    /// Save a note under `id`, replacing any previous version.
    fn save(&self, id: &str, note: &Note) -> BoxFuture<'_, StorageResult<()>>;

    /// Load a note.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Note>>;

    /// Delete a note. Deleting a missing note is not an error.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all note ids, sorted.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a note exists.
    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Create and store a new empty note.
pub async fn create_note(storage: &dyn Storage, title: &str) -> StorageResult<Note> {
    let note = Note::new(title);
    storage.save(&note.id, &note).await?;
    log::info!("Created note {} ({:?})", note.id, note.title);
    Ok(note)
}

/// Load every stored note, skipping the ones that fail to load.
pub async fn load_all(storage: &dyn Storage) -> StorageResult<Vec<Note>> {
    let mut notes = Vec::new();
    for id in storage.list().await? {
        match storage.load(&id).await {
            Ok(note) => notes.push(note),
            Err(e) => log::warn!("Skipping note {}: {}", id, e),
        }
    }
    Ok(notes)
}
