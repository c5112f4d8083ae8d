//! Repository for customer read receipts (`receipts:{projectId}`).

use std::collections::HashSet;

use crate::error::StoreError;
use crate::keys::receipts_key;
use crate::store::KeyValueStore;

pub struct ReceiptRepo;

impl ReceiptRepo {
    /// Item keys already marked read for a project.
    pub async fn item_keys(
        store: &dyn KeyValueStore,
        project_id: &str,
    ) -> Result<HashSet<String>, StoreError> {
        Ok(store
            .list_members(&receipts_key(project_id))
            .await?
            .into_iter()
            .collect())
    }

    /// Record a receipt. Returns `false` if the item was already read.
    pub async fn add(
        store: &dyn KeyValueStore,
        project_id: &str,
        item_key: &str,
    ) -> Result<bool, StoreError> {
        store.add_member(&receipts_key(project_id), item_key).await
    }
}
