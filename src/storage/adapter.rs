//! Key-value storage adapter interface and the in-memory implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::errors::ClientResult;

/// Asynchronous string key-value store the storage helper is built on.
///
/// Implementations do not need to serialise overlapping writes to the same
/// key; callers get whatever ordering the backend provides.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    async fn get_item(&self, key: &str) -> ClientResult<Option<String>>;

    async fn set_item(&self, key: &str, value: &str) -> ClientResult<()>;

    async fn remove_item(&self, key: &str) -> ClientResult<()>;

    /// Values in the same order as `keys`, `None` for missing keys.
    async fn multi_get(&self, keys: &[&str]) -> ClientResult<Vec<(String, Option<String>)>>;

    async fn multi_remove(&self, keys: &[&str]) -> ClientResult<()>;

    /// Remove every key held by the adapter.
    async fn clear(&self) -> ClientResult<()>;
}

/// Process-local adapter, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl StorageAdapter for MemoryStorage {
    async fn get_item(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> ClientResult<()> {
        self.items
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> ClientResult<()> {
        self.items.write().await.remove(key);
        Ok(())
    }

    async fn multi_get(&self, keys: &[&str]) -> ClientResult<Vec<(String, Option<String>)>> {
        let items = self.items.read().await;
        Ok(keys
            .iter()
            .map(|key| (key.to_string(), items.get(*key).cloned()))
            .collect())
    }

    async fn multi_remove(&self, keys: &[&str]) -> ClientResult<()> {
        let mut items = self.items.write().await;
        for key in keys {
            items.remove(*key);
        }
        Ok(())
    }

    async fn clear(&self) -> ClientResult<()> {
        self.items.write().await.clear();
        Ok(())
    }
}
