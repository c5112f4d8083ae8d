//! In-process store used when no database is configured, and in tests.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::store::KeyValueStore;

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
    sets: RwLock<HashMap<String, BTreeSet<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn list_members(&self, set_key: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .sets
            .read()
            .await
            .get(set_key)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn add_member(&self, set_key: &str, member: &str) -> Result<bool, StoreError> {
        Ok(self
            .sets
            .write()
            .await
            .entry(set_key.to_string())
            .or_default()
            .insert(member.to_string()))
    }

    async fn remove_member(&self, set_key: &str, member: &str) -> Result<bool, StoreError> {
        let mut sets = self.sets.write().await;
        let Some(members) = sets.get_mut(set_key) else {
            return Ok(false);
        };
        let removed = members.remove(member);
        if members.is_empty() {
            sets.remove(set_key);
        }
        Ok(removed)
    }
}
