//! The key/value store seam.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::StoreError;

/// Minimal key/value store with string sets.
///
/// Values are JSON documents. There are no transactions: a read followed by a
/// write is last-writer-wins across processes, so callers serialize
/// read-modify-write cycles per project themselves.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Remove a key. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Members of a set, in ascending order. A missing set is empty.
    async fn list_members(&self, set_key: &str) -> Result<Vec<String>, StoreError>;

    /// Add a member. Returns `false` if it was already present.
    async fn add_member(&self, set_key: &str, member: &str) -> Result<bool, StoreError>;

    /// Remove a member. Returns `false` if it was not present.
    async fn remove_member(&self, set_key: &str, member: &str) -> Result<bool, StoreError>;

    /// Verify the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Read and decode a typed value.
pub async fn load<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key).await? {
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|source| StoreError::Decode {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Encode and write a typed value.
pub async fn save<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    store.set(key, serde_json::to_value(value)?).await
}
