//! Persisters: where a session sends a note after each committed change.

use super::{Storage, StorageResult};
use crate::note::Note;
use std::sync::Arc;

/// Sink for note snapshots.
pub trait Persister {
    /// Persist the current state of `note`.
    fn persist(&self, note: &Note) -> StorageResult<()>;
}

/// Writes synchronously, blocking on the store.
#[derive(Clone)]
pub struct BlockingPersister {
    storage: Arc<dyn Storage>,
}

impl BlockingPersister {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }
}

impl Persister for BlockingPersister {
    fn persist(&self, note: &Note) -> StorageResult<()> {
        pollster::block_on(self.storage.save(&note.id, note))
    }
}
