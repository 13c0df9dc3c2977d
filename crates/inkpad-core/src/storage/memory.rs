//! In-memory storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::codec::{NoteRecord, decode_note, encode_note};
use crate::note::Note;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
///
/// Notes are kept as encoded records so a load behaves like one from disk.
#[derive(Default)]
pub struct MemoryStorage {
    notes: RwLock<HashMap<String, NoteRecord>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, note: &Note) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let record = encode_note(note);
        Box::pin(async move {
            let record = record?;
            let mut notes = self.notes.write().map_err(lock_error)?;
            notes.insert(id, record);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Note>> {
        let id = id.to_string();
        Box::pin(async move {
            let notes = self.notes.read().map_err(lock_error)?;
            notes
                .get(&id)
                .map(|record| decode_note(&id, record))
                .ok_or_else(|| StorageError::NotFound(id.clone()))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut notes = self.notes.write().map_err(lock_error)?;
            notes.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let notes = self.notes.read().map_err(lock_error)?;
            let mut ids: Vec<String> = notes.keys().cloned().collect();
            ids.sort();
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            let notes = self.notes.read().map_err(lock_error)?;
            Ok(notes.contains_key(&id))
        })
    }
}
