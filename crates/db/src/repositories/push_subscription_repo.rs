//! Repository for push subscription sets (`push:{projectId}`, `push:developer`).

use studioflow_core::push::{PushSubscription, SubscriberScope};

use crate::error::StoreError;
use crate::keys::push_key;
use crate::store::{self, KeyValueStore};

pub struct PushSubscriptionRepo;

impl PushSubscriptionRepo {
    /// Subscriptions stored for `scope`. A missing key is an empty list.
    pub async fn list(
        store: &dyn KeyValueStore,
        scope: &SubscriberScope,
    ) -> Result<Vec<PushSubscription>, StoreError> {
        Ok(store::load(store, &push_key(scope)).await?.unwrap_or_default())
    }

    /// Replace the subscriptions of `scope`. An empty list deletes the key.
    pub async fn replace(
        store: &dyn KeyValueStore,
        scope: &SubscriberScope,
        subscriptions: &[PushSubscription],
    ) -> Result<(), StoreError> {
        let key = push_key(scope);
        if subscriptions.is_empty() {
            store.delete(&key).await
        } else {
            store::save(store, &key, subscriptions).await
        }
    }
}
