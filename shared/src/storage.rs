use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A single string slot that survives restarts.
pub trait Storage {
    fn read(&self) -> Result<Option<String>, StorageError>;
    fn write(&mut self, blob: &str) -> Result<(), StorageError>;
    fn clear(&mut self) -> Result<(), StorageError>;
}

/// Keeps the blob in one file on disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Storage for FileStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn write(&mut self, blob: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        // rename is atomic on the same filesystem
        let temp = self.temp_path();
        fs::write(&temp, blob).map_err(|e| self.io_error(e))?;
        fs::rename(&temp, &self.path).map_err(|e| self.io_error(e))
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

#[derive(Debug, Default)]
struct Slot {
    blob: Option<String>,
    failing: bool,
}

/// In-process slot. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Slot>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<String>) -> Self {
        let storage = Self::default();
        storage.lock().blob = Some(blob.into());
        storage
    }

    /// Current contents of the slot.
    pub fn blob(&self) -> Option<String> {
        self.lock().blob.clone()
    }

    /// Test hook: makes every later write or clear fail, as a full or
    /// revoked medium would.
    #[doc(hidden)]
    pub fn simulate_write_failure(&self, failing: bool) {
        self.lock().failing = failing;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Slot> {
        // a poisoned slot still holds a complete blob
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Storage for MemoryStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.blob())
    }

    fn write(&mut self, blob: &str) -> Result<(), StorageError> {
        let mut slot = self.lock();
        if slot.failing {
            return Err(StorageError::Unavailable("writes are failing".to_string()));
        }
        slot.blob = Some(blob.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        let mut slot = self.lock();
        if slot.failing {
            return Err(StorageError::Unavailable("writes are failing".to_string()));
        }
        slot.blob = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("tasks.json"));
        assert!(storage.read().unwrap().is_none());
    }

    #[test]
    fn file_write_then_read_returns_blob() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(dir.path().join("nested/tasks.json"));

        storage.write("[]").unwrap();
        storage.write("[1]").unwrap();

        assert_eq!(storage.read().unwrap().as_deref(), Some("[1]"));
        assert!(!dir.path().join("nested/tasks.json.tmp").exists());
    }

    #[test]
    fn file_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(dir.path().join("tasks.json"));
        storage.write("[]").unwrap();

        storage.clear().unwrap();
        storage.clear().unwrap();

        assert!(storage.read().unwrap().is_none());
    }

    #[test]
    fn memory_clones_share_the_slot() {
        let storage = MemoryStorage::new();
        let mut handle = storage.clone();
        handle.write("[]").unwrap();
        assert_eq!(storage.blob().as_deref(), Some("[]"));
    }

    #[test]
    fn failing_memory_rejects_writes() {
        let mut storage = MemoryStorage::with_blob("[]");
        storage.simulate_write_failure(true);
        assert!(matches!(
            storage.write("[1]"),
            Err(StorageError::Unavailable(_))
        ));
        assert!(storage.clear().is_err());
        assert_eq!(storage.blob().as_deref(), Some("[]"));
    }
}
