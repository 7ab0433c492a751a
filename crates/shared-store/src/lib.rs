//! # Shared Store - Durable Local Key-Value Storage
//!
//! JSON blobs under named keys, the platform's only persistence layer.
//! Backs the session blob and the per-device offline measurement queue.
//!
//! Two implementations of the [`KvStore`] port:
//!
//! - [`JsonFileStore`]: one JSON file per key under a root directory,
//!   writes go through a temp file + atomic rename while holding an
//!   `fs2` exclusive lock.
//! - [`MemoryStore`]: HashMap-backed store for tests.
//!
//! Blobs carry no schema version; a production deployment would version
//! them before evolving any persisted shape.

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying filesystem operation failed.
    #[error("storage I/O failure for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Stored blob could not be decoded.
    #[error("corrupt blob under key '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Value could not be encoded.
    #[error("failed to encode value for key '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Port for durable local key-value storage.
///
/// Keys are flat strings; values are JSON-serializable blobs.
pub trait KvStore: Send + Sync {
    /// Loads and decodes the blob under `key`, if present.
    fn load_raw(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Encodes and stores `value` under `key`, replacing any prior blob.
    fn save_raw(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Removes the blob under `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Typed helpers over the raw string port.
///
/// Kept as an extension trait so `KvStore` itself stays object-safe.
pub trait KvStoreExt: KvStore {
    /// Loads and deserializes the value under `key`.
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.load_raw(key)? {
            Some(raw) => {
                let value = serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                    key: key.to_string(),
                    source,
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Serializes and stores `value` under `key`.
    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.save_raw(key, raw)
    }
}

impl<S: KvStore + ?Sized> KvStoreExt for S {}
