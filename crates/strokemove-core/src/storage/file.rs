//! File-based storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::note::Note;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Stores each note as a JSON file named after its id.
pub struct FileStorage {
    base_path: PathBuf,
}

fn io_error(action: &str, path: &Path, e: io::Error) -> StorageError {
    StorageError::Io(format!("could not {} {}: {}", action, path.display(), e))
}

impl FileStorage {
    /// Open storage rooted at `base_path`, creating the directory when missing.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        fs::create_dir_all(&base_path).map_err(|e| io_error("create", &base_path, e))?;
        log::debug!("Note storage at {}", base_path.display());
        Ok(Self { base_path })
    }

    /// Open storage in the per-user data directory, `<data_local_dir>/strokemove/notes`.
    pub fn default_location() -> StorageResult<Self> {
        let root = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("no data directory for this user".to_string()))?;
        Self::new(root.join("strokemove").join("notes"))
    }

    /// `<base>/<id>.json`, with anything but alphanumerics, `-` and `_` mapped to `_`.
    fn note_path(&self, id: &str) -> PathBuf {
        let file_stem: String = id
            .chars()
            .map(|c| match c {
                c if c.is_alphanumeric() => c,
                '-' | '_' => c,
                _ => '_',
            })
            .collect();
        self.base_path.join(file_stem).with_extension("json")
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for FileStorage {
    fn save(&self, id: &str, note: &Note) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.note_path(id);
        let json = note.to_json();
        Box::pin(async move {
            let json = json.map_err(|e| StorageError::Serialization(e.to_string()))?;
            fs::write(&path, json).map_err(|e| io_error("write", &path, e))
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Note>> {
        let path = self.note_path(id);
        let id = id.to_string();
        Box::pin(async move {
            let json = match fs::read_to_string(&path) {
                Ok(json) => json,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    return Err(StorageError::NotFound(id));
                }
                Err(e) => return Err(io_error("read", &path, e)),
            };
            Note::from_json(&json)
                .map_err(|e| StorageError::Serialization(format!("{}: {}", path.display(), e)))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.note_path(id);
        Box::pin(async move {
            match fs::remove_file(&path) {
                Err(e) if e.kind() != io::ErrorKind::NotFound => Err(io_error("delete", &path, e)),
                _ => Ok(()),
            }
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        let base = self.base_path.clone();
        Box::pin(async move {
            let entries = match fs::read_dir(&base) {
                Ok(entries) => entries,
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
                Err(e) => return Err(io_error("list", &base, e)),
            };

            let mut ids: Vec<String> = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
                .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(String::from))
                .collect();
            ids.sort();
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.note_path(id);
        Box::pin(async move { Ok(path.is_file()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StrokeStore;
    use crate::stroke::{Ink, Stroke, StrokePath};
    use kurbo::{Affine, Point};
    use pollster::block_on;
    use tempfile::{TempDir, tempdir};

    fn scratch() -> (TempDir, FileStorage) {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("notes")).unwrap();
        (dir, storage)
    }

    #[test]
    fn test_file_storage_save_load() {
        let (_dir, storage) = scratch();

        let stroke = Stroke::new(
            Ink::default(),
            StrokePath::from_locations([Point::new(0.0, 0.0), Point::new(5.0, 5.0)], 3.0),
        )
        .with_transform(Affine::translate((4.0, 2.0)));
        let note = Note::with_drawing("Eigenvalues", StrokeStore::from_strokes(vec![stroke]));

        block_on(storage.save("eigen", &note)).unwrap();
        let loaded = block_on(storage.load("eigen")).unwrap();

        assert_eq!(loaded, note);
        assert_eq!(loaded.drawing.count(), 1);
    }

    #[test]
    fn test_file_storage_not_found() {
        let (_dir, storage) = scratch();

        assert!(matches!(
            block_on(storage.load("missing")),
            Err(StorageError::NotFound(id)) if id == "missing"
        ));
    }

    #[test]
    fn test_file_storage_corrupt_file() {
        let (_dir, storage) = scratch();
        fs::write(storage.base_path().join("broken.json"), "{ not json").unwrap();

        let result = block_on(storage.load("broken"));
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    #[test]
    fn test_file_storage_list_ignores_other_files() {
        let (_dir, storage) = scratch();
        fs::write(storage.base_path().join("readme.txt"), "hi").unwrap();

        block_on(storage.save("b", &Note::new("B"))).unwrap();
        block_on(storage.save("a", &Note::new("A"))).unwrap();

        assert_eq!(block_on(storage.list()).unwrap(), ["a", "b"]);
    }

    #[test]
    fn test_file_storage_delete() {
        let (_dir, storage) = scratch();

        block_on(storage.save("scratch", &Note::new("Scratch"))).unwrap();
        assert!(block_on(storage.exists("scratch")).unwrap());

        block_on(storage.delete("scratch")).unwrap();
        assert!(!block_on(storage.exists("scratch")).unwrap());
        // deleting twice is fine
        block_on(storage.delete("scratch")).unwrap();
    }

    #[test]
    fn test_file_storage_sanitizes_id() {
        let (_dir, storage) = scratch();

        let note = Note::new("Odd");
        block_on(storage.save("notes/../odd:name", &note)).unwrap();

        let loaded = block_on(storage.load("notes/../odd:name")).unwrap();
        assert_eq!(loaded.id, note.id);
        assert!(storage.base_path().join("notes____odd_name.json").is_file());
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("deep").join("notes");
        let storage = FileStorage::new(nested.clone()).unwrap();
        assert!(nested.is_dir());
        assert_eq!(storage.base_path(), nested.as_path());
    }
}
