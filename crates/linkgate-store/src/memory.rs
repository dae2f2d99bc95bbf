//! In-process key-value store backed by an ordered map.

use std::collections::BTreeMap;

use tokio::sync::RwLock;

use crate::{KvStore, StoreError};

/// A [`KvStore`] that keeps everything in memory.
///
/// Data lives as long as the value does. Good for a single-instance
/// deployment and for tests; it offers no durability across restarts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns `true` if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.entries.write().await.insert(key.to_string(), value);
        tracing::trace!(key, "stored value");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let removed = self.entries.write().await.remove(key).is_some();
        tracing::trace!(key, removed, "deleted value");
        Ok(removed)
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let entries = self.entries.read().await;
        // BTreeMap iterates in key order, so a range scan starting at the
        // prefix visits exactly the matching keys before the first miss.
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect())
    }
}
