//! Scoped key-value persistence.
//!
//! [`KeyValueStore`] is the only thing the rest of the crate talks to. It is a
//! pass-through to an optional [`KeyValueBackend`]; when no backend is
//! available every read is absent and every write is dropped, and backend
//! errors never leave this module.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A persistent string-to-string map.
pub trait KeyValueBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Process-lifetime backend, used for tests and `--ephemeral` runs.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<BTreeMap<String, String>>,
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

/// All keys live in one JSON object on disk. Every mutation rewrites the
/// whole file through a temporary sibling and an atomic rename, so readers
/// never observe a partial write. Two processes sharing a file race and the
/// last writer wins.
#[derive(Debug)]
pub struct FileBackend {
    storage_path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileBackend {
    pub fn open(storage_path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let storage_path = storage_path.into();
        if let Some(parent) = storage_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let entries = if storage_path.exists() {
            let mut file = File::open(&storage_path)?;
            let mut contents = String::new();
            file.read_to_string(&mut contents)?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents)?
            }
        } else {
            BTreeMap::new()
        };

        let backend = Self {
            storage_path,
            entries: Mutex::new(entries),
        };
        if !backend.storage_path.exists() {
            backend.save(&lock(&backend.entries))?;
        }
        Ok(backend)
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let temp = self.storage_path.with_extension("tmp");
        let mut f = File::create(&temp)?;
        let content = serde_json::to_string_pretty(entries)?;
        f.write_all(content.as_bytes())?;
        f.sync_all()?;
        fs::rename(temp, &self.storage_path)?;
        Ok(())
    }
}

impl KeyValueBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = lock(&self.entries);
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.save(&next)?;
        *entries = next;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = lock(&self.entries);
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.save(&next)?;
        *entries = next;
        Ok(())
    }
}

/// Cheaply cloneable handle shared by the tenant registry, the session
/// holder and every entity store.
#[derive(Clone)]
pub struct KeyValueStore {
    backend: Option<Arc<dyn KeyValueBackend>>,
}

impl KeyValueStore {
    pub fn new(backend: impl KeyValueBackend + 'static) -> Self {
        Self {
            backend: Some(Arc::new(backend)),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::default())
    }

    /// A store with no persistent mechanism behind it.
    pub fn unavailable() -> Self {
        Self { backend: None }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    pub fn read(&self, key: &str) -> Option<String> {
        let backend = self.backend.as_ref()?;
        match backend.get(key) {
            Ok(value) => {
                debug!(key, found = value.is_some(), "storage read");
                value
            }
            Err(err) => {
                warn!(key, error = %err, "storage read failed");
                None
            }
        }
    }

    pub fn write(&self, key: &str, raw: &str) {
        let Some(backend) = self.backend.as_ref() else {
            return;
        };
        match backend.set(key, raw) {
            Ok(()) => debug!(key, bytes = raw.len(), "storage write"),
            Err(err) => warn!(key, error = %err, "storage write failed"),
        }
    }

    pub fn remove(&self, key: &str) {
        let Some(backend) = self.backend.as_ref() else {
            return;
        };
        if let Err(err) = backend.delete(key) {
            warn!(key, error = %err, "storage remove failed");
        }
    }
}

impl std::fmt::Debug for KeyValueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyValueStore")
            .field("available", &self.is_available())
            .finish()
    }
}
