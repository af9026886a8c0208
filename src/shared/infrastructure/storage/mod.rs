// Persisted key/value storage port.
//
// Purpose
// - Describe the string-to-string store the cache mirrors remote collections into.
//
// Boundaries
// - Adapters may be unavailable at any time (disabled storage, unreadable file). They report it
//   as StorageError and let the cache store decide how to degrade.

pub mod in_memory;
pub mod json_file;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}
