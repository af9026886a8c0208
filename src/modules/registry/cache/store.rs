// Cache store over the persisted key/value mirror.
//
// Purpose
// - Hold JSON payloads of remote collections under stable keys, with a `<key>_timestamp` sibling
//   recording when each payload was last written.
//
// Responsibilities
// - get/set/remove JSON payloads, degrading to the caller's fallback (or a no-op) when storage is
//   unavailable or a payload does not decode. Failures are logged, never returned.
// - Broadcast a StorageChange after every write or removal so other readers can react.
//
// Invariants
// - A successful `set` writes the payload, then a timestamp strictly greater than the previous one
//   for that key, then dispatches the change.

use crate::shared::core::clock::Clock;
use crate::shared::infrastructure::storage::KeyValueStorage;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::broadcast;

pub const TIMESTAMP_SUFFIX: &str = "_timestamp";
const CHANGE_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageChange {
    pub key: String,
    /// Raw JSON now stored under the key, None after a removal.
    pub new_value: Option<String>,
}

pub fn timestamp_key(key: &str) -> String {
    format!("{key}{TIMESTAMP_SUFFIX}")
}

pub struct CacheStore {
    storage: Arc<dyn KeyValueStorage>,
    clock: Arc<dyn Clock>,
    changes: broadcast::Sender<StorageChange>,
}

impl CacheStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>, clock: Arc<dyn Clock>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            storage,
            clock,
            changes,
        }
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let raw = match self.storage.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return fallback,
            Err(e) => {
                tracing::warn!(key, error = %e, "cache read failed, using fallback");
                return fallback;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "cached payload does not decode, using fallback");
                fallback
            }
        }
    }

    /// Stores `payload` as JSON. Returns false when nothing was written.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, payload: &T) -> bool {
        let raw = match serde_json::to_string(payload) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key, error = %e, "payload does not encode, cache write skipped");
                return false;
            }
        };
        if let Err(e) = self.storage.set(key, &raw) {
            tracing::warn!(key, error = %e, "cache write failed");
            return false;
        }

        let stamp = match self.timestamp(key) {
            Some(previous) => self.clock.now_millis().max(previous.saturating_add(1)),
            None => self.clock.now_millis(),
        };
        if let Err(e) = self.storage.set(&timestamp_key(key), &stamp.to_string()) {
            tracing::warn!(key, error = %e, "cache timestamp write failed");
        }

        self.dispatch_change_event(key, Some(raw));
        true
    }

    pub fn remove(&self, key: &str) {
        for target in [key.to_string(), timestamp_key(key)] {
            if let Err(e) = self.storage.remove(&target) {
                tracing::warn!(key = %target, error = %e, "cache removal failed");
            }
        }
        self.dispatch_change_event(key, None);
    }

    pub fn dispatch_change_event(&self, key: &str, new_value: Option<String>) {
        // No subscribers is not an error.
        let _ = self.changes.send(StorageChange {
            key: key.to_string(),
            new_value,
        });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.changes.subscribe()
    }

    /// Milliseconds of the last successful write of `key`.
    pub fn timestamp(&self, key: &str) -> Option<i64> {
        match self.storage.get(&timestamp_key(key)) {
            Ok(raw) => raw.and_then(|raw| raw.trim().parse().ok()),
            Err(e) => {
                tracing::warn!(key, error = %e, "cache timestamp read failed");
                None
            }
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.storage.keys().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "cache key listing failed");
            Vec::new()
        })
    }

    /// Removes every data key starting with `prefix`, with its timestamp. Returns how many.
    pub fn clear_prefix(&self, prefix: &str) -> usize {
        let targets: Vec<String> = self
            .keys()
            .into_iter()
            .filter(|key| key.starts_with(prefix) && !key.ends_with(TIMESTAMP_SUFFIX))
            .collect();
        for key in &targets {
            self.remove(key);
        }
        targets.len()
    }
}
