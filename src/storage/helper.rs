//! Typed accessors over a storage adapter.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::adapter::StorageAdapter;
use super::keys::StorageKeys;
use crate::errors::ClientResult;

/// Outcome of reading a JSON value, keeping "missing" and "corrupt" apart.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonRead<T> {
    Absent,
    /// The stored string did not decode as `T`; the raw value is kept.
    Corrupt(String),
    Present(T),
}

impl<T> JsonRead<T> {
    /// Collapse to `Option`, treating corrupt values as absent.
    pub fn into_option(self) -> Option<T> {
        match self {
            JsonRead::Present(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, JsonRead::Corrupt(_))
    }
}

/// Typed storage accessors bound to one adapter.
///
/// Keys passed in are full keys; use [`StorageKeys::key`] to namespace them.
/// No locking is done here: two overlapping writes to the same key race and
/// the adapter decides which one wins.
#[derive(Clone)]
pub struct StorageHelper {
    adapter: Arc<dyn StorageAdapter>,
    keys: StorageKeys,
}

impl StorageHelper {
    pub fn new(adapter: Arc<dyn StorageAdapter>, keys: StorageKeys) -> Self {
        Self { adapter, keys }
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn adapter(&self) -> &Arc<dyn StorageAdapter> {
        &self.adapter
    }

    pub async fn get_string(&self, key: &str) -> ClientResult<Option<String>> {
        self.adapter.get_item(key).await
    }

    pub async fn set_string(&self, key: &str, value: &str) -> ClientResult<()> {
        self.adapter.set_item(key, value).await
    }

    /// Read a JSON value; corrupt values read as `None`.
    ///
    /// Use [`read_json`](Self::read_json) to tell the two cases apart.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> ClientResult<Option<T>> {
        Ok(self.read_json(key).await?.into_option())
    }

    pub async fn read_json<T: DeserializeOwned>(&self, key: &str) -> ClientResult<JsonRead<T>> {
        let Some(raw) = self.adapter.get_item(key).await? else {
            return Ok(JsonRead::Absent);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(JsonRead::Present(value)),
            Err(e) => {
                tracing::warn!("Corrupt JSON under storage key {}: {}", key, e);
                Ok(JsonRead::Corrupt(raw))
            }
        }
    }

    pub async fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> ClientResult<()> {
        let raw = serde_json::to_string(value)?;
        self.adapter.set_item(key, &raw).await
    }

    /// Only the literal string `"true"` reads as true.
    pub async fn get_boolean(&self, key: &str) -> ClientResult<bool> {
        Ok(self.adapter.get_item(key).await?.as_deref() == Some("true"))
    }

    pub async fn set_boolean(&self, key: &str, value: bool) -> ClientResult<()> {
        let raw = if value { "true" } else { "false" };
        self.adapter.set_item(key, raw).await
    }

    pub async fn get_multiple(&self, keys: &[&str]) -> ClientResult<Vec<(String, Option<String>)>> {
        self.adapter.multi_get(keys).await
    }

    pub async fn remove(&self, key: &str) -> ClientResult<()> {
        self.adapter.remove_item(key).await
    }

    pub async fn remove_multiple(&self, keys: &[&str]) -> ClientResult<()> {
        self.adapter.multi_remove(keys).await
    }

    /// Remove the auth group: token, refresh token, user data, expiry.
    pub async fn clear_auth(&self) -> ClientResult<()> {
        let keys = self.keys.auth();
        self.remove_owned(&keys).await?;
        tracing::debug!("Cleared auth storage");
        Ok(())
    }

    /// Remove the cache group.
    pub async fn clear_cache(&self) -> ClientResult<()> {
        let keys = self.keys.cache();
        self.remove_owned(&keys).await?;
        tracing::debug!("Cleared cache storage");
        Ok(())
    }

    /// Wipe everything the adapter holds, including keys outside the prefix.
    pub async fn clear_all(&self) -> ClientResult<()> {
        self.adapter.clear().await
    }

    async fn remove_owned(&self, keys: &[String]) -> ClientResult<()> {
        let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
        self.adapter.multi_remove(&refs).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::adapter::MemoryStorage;
    use crate::storage::keys::{self, StorageKeys};
    use serde::Deserialize;
    use serde_json::json;

    fn helper() -> (StorageHelper, Arc<MemoryStorage>) {
        let memory = Arc::new(MemoryStorage::new());
        (
            StorageHelper::new(memory.clone(), StorageKeys::default()),
            memory,
        )
    }

    #[tokio::test]
    async fn test_string_passthrough() {
        let (storage, _) = helper();
        storage.set_string("k", "  raw value ").await.unwrap();
        assert_eq!(
            storage.get_string("k").await.unwrap().as_deref(),
            Some("  raw value ")
        );
    }

    #[tokio::test]
    async fn test_boolean_encoding() {
        let (storage, memory) = helper();

        storage.set_boolean("flag", true).await.unwrap();
        assert!(storage.get_boolean("flag").await.unwrap());
        assert_eq!(memory.get_item("flag").await.unwrap().as_deref(), Some("true"));

        storage.set_boolean("flag", false).await.unwrap();
        assert!(!storage.get_boolean("flag").await.unwrap());

        assert!(!storage.get_boolean("unset").await.unwrap());

        storage.set_string("flag", "TRUE").await.unwrap();
        assert!(!storage.get_boolean("flag").await.unwrap());
        storage.set_string("flag", "1").await.unwrap();
        assert!(!storage.get_boolean("flag").await.unwrap());
    }

    #[tokio::test]
    async fn test_json_roundtrip_values() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Prefs {
            theme: String,
            radius: Option<u32>,
        }

        let (storage, _) = helper();
        let prefs = Prefs {
            theme: "dark".to_string(),
            radius: None,
        };
        storage.set_json("prefs", &prefs).await.unwrap();
        assert_eq!(storage.get_json::<Prefs>("prefs").await.unwrap(), Some(prefs));

        let nested = json!({ "a": [1, 2.5, null, "x"], "b": { "c": true } });
        storage.set_json("nested", &nested).await.unwrap();
        assert_eq!(
            storage.get_json::<serde_json::Value>("nested").await.unwrap(),
            Some(nested)
        );
    }

    #[tokio::test]
    async fn test_json_corrupt_reads_as_none() {
        let (storage, _) = helper();
        storage.set_string("bad", "{not json").await.unwrap();

        assert_eq!(storage.get_json::<serde_json::Value>("bad").await.unwrap(), None);
        assert_eq!(storage.get_json::<serde_json::Value>("unset").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_read_json_three_states() {
        let (storage, _) = helper();
        storage.set_string("bad", "{not json").await.unwrap();
        storage.set_json("good", &[1, 2, 3]).await.unwrap();

        assert_eq!(
            storage.read_json::<Vec<i32>>("unset").await.unwrap(),
            JsonRead::Absent
        );
        assert_eq!(
            storage.read_json::<Vec<i32>>("bad").await.unwrap(),
            JsonRead::Corrupt("{not json".to_string())
        );
        assert_eq!(
            storage.read_json::<Vec<i32>>("good").await.unwrap(),
            JsonRead::Present(vec![1, 2, 3])
        );
    }

    #[tokio::test]
    async fn test_clear_auth_removes_exactly_auth_group() {
        let (storage, memory) = helper();
        let k = storage.keys().clone();
        let all: Vec<String> = k
            .auth()
            .into_iter()
            .chain(k.preferences())
            .chain(k.cache())
            .chain(k.app_state())
            .collect();
        for key in &all {
            storage.set_string(key, "v").await.unwrap();
        }
        storage.set_string("unrelated", "v").await.unwrap();

        storage.clear_auth().await.unwrap();

        for key in &k.auth() {
            assert_eq!(storage.get_string(key).await.unwrap(), None, "{}", key);
        }
        assert_eq!(memory.len().await, all.len() - 4 + 1);
        assert!(storage
            .get_string(&k.key(keys::THEME))
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_clear_cache_removes_exactly_cache_group() {
        let (storage, memory) = helper();
        let k = storage.keys().clone();
        for key in k.cache().iter().chain(k.auth().iter()) {
            storage.set_string(key, "v").await.unwrap();
        }

        storage.clear_cache().await.unwrap();

        assert_eq!(memory.len().await, 4);
        for key in &k.cache() {
            assert_eq!(storage.get_string(key).await.unwrap(), None);
        }
    }

    #[tokio::test]
    async fn test_remove_and_clear_all() {
        let (storage, memory) = helper();
        storage.set_string("a", "1").await.unwrap();
        storage.set_string("b", "2").await.unwrap();
        storage.set_string("c", "3").await.unwrap();

        storage.remove("a").await.unwrap();
        storage.remove_multiple(&["b"]).await.unwrap();
        let values = storage.get_multiple(&["a", "b", "c"]).await.unwrap();
        assert_eq!(values[2], ("c".to_string(), Some("3".to_string())));
        assert_eq!(values[0].1, None);

        storage.clear_all().await.unwrap();
        assert!(memory.is_empty().await);
    }
}
