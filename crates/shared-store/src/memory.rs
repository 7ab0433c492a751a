//! In-memory key-value store for tests and ephemeral sessions.

use crate::{KvStore, StoreError};
use std::collections::HashMap;
use std::sync::RwLock;

/// HashMap-backed store. Contents are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.read().map(|b| b.len()).unwrap_or(0)
    }

    /// Returns true if no blobs are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvStore for MemoryStore {
    fn load_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .blobs
            .read()
            .ok()
            .and_then(|blobs| blobs.get(key).cloned()))
    }

    fn save_raw(&self, key: &str, value: String) -> Result<(), StoreError> {
        if let Ok(mut blobs) = self.blobs.write() {
            blobs.insert(key.to_string(), value);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        if let Ok(mut blobs) = self.blobs.write() {
            blobs.remove(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_len_tracks_inserts_and_removes() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        store.save_raw("a", "1".into()).unwrap();
        store.save_raw("b", "2".into()).unwrap();
        assert_eq!(store.len(), 2);
        store.remove("a").unwrap();
        assert_eq!(store.len(), 1);
    }
}
