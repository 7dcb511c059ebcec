//! In-memory storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::note::Note;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Notes kept in a map for the life of the process.
#[derive(Default)]
pub struct MemoryStorage {
    notes: RwLock<HashMap<String, Note>>,
}

fn poisoned<T>(_: PoisonError<T>) -> StorageError {
    StorageError::Other("note map lock poisoned".to_string())
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, note: &Note) -> BoxFuture<'_, StorageResult<()>> {
        let entry = (id.to_string(), note.clone());
        Box::pin(async move {
            self.notes.write().map_err(poisoned)?.insert(entry.0, entry.1);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Note>> {
        let id = id.to_string();
        Box::pin(async move {
            let found = self.notes.read().map_err(poisoned)?.get(&id).cloned();
            found.ok_or(StorageError::NotFound(id))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            self.notes.write().map_err(poisoned)?.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let mut ids: Vec<String> =
                self.notes.read().map_err(poisoned)?.keys().cloned().collect();
            ids.sort();
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move { Ok(self.notes.read().map_err(poisoned)?.contains_key(&id)) })
    }
}
