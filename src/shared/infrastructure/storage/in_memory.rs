// In memory implementation of the KeyValueStorage port.
//
// Purpose
// - Support cache and coordinator tests without touching the file system.
//
// Responsibilities
// - Keep entries in a map.
// - Simulate disabled storage through toggle_unavailable.

use crate::shared::infrastructure::storage::{KeyValueStorage, StorageError};
use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Default)]
pub struct InMemoryStorage {
    entries: RwLock<BTreeMap<String, String>>,
    is_unavailable: AtomicBool,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_unavailable(&self) {
        self.is_unavailable.fetch_xor(true, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), StorageError> {
        if self.is_unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("Storage disabled".into()));
        }
        Ok(())
    }

    fn poisoned() -> StorageError {
        StorageError::Unavailable("Storage lock poisoned".into())
    }
}

impl KeyValueStorage for InMemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.ensure_available()?;
        let guard = self.entries.read().map_err(|_| Self::poisoned())?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.ensure_available()?;
        let mut guard = self.entries.write().map_err(|_| Self::poisoned())?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.ensure_available()?;
        let mut guard = self.entries.write().map_err(|_| Self::poisoned())?;
        guard.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.ensure_available()?;
        let guard = self.entries.read().map_err(|_| Self::poisoned())?;
        Ok(guard.keys().cloned().collect())
    }
}
