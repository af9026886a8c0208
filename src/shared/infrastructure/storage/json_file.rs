// File backed implementation of the KeyValueStorage port.
//
// Purpose
// - Persist the cache mirror across process restarts as a single JSON document.
//
// Responsibilities
// - Load the document once on open; a missing file starts empty.
// - Write the whole document through on every mutation.

use crate::shared::infrastructure::storage::{KeyValueStorage, StorageError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub struct JsonFileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStorage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let document = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, document)?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Unavailable("Storage lock poisoned".into()))
    }
}

impl KeyValueStorage for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        guard.insert(key.to_string(), value.to_string());
        self.flush(&guard)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        if guard.remove(key).is_some() {
            self.flush(&guard)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}
