//! Storage abstraction for note persistence.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::note::Note;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Note not found: {0}")]
    NotFound(String),
    #[error("Note could not be (de)serialized: {0}")]
    Serialization(String),
    #[error("I/O failure: {0}")]
    Io(String),
    #[error("{0}")]
    Other(String),
}

/// Result alias for storage calls.
pub type StorageResult<T> = Result<T, StorageError>;

/// Future returned by every storage call.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Trait for note storage backends.
///
/// The drawing inside a note is an opaque blob as far as backends are concerned.
pub trait Storage: Send + Sync {
    /// Write `note` under `id`, replacing any previous version.
    fn save(&self, id: &str, note: &Note) -> BoxFuture<'_, StorageResult<()>>;

    /// Read the note stored under `id`.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Note>>;

    /// Remove the note under `id`. Removing a missing note is not an error.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// Ids of every stored note, sorted.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Whether a note is stored under `id`.
    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}
