//! Push subscription sets per subscriber scope.

use std::collections::HashSet;
use std::sync::Arc;

use studioflow_core::error::CoreError;
use studioflow_core::push::{PushSubscription, PushSummary, SubscriberScope};
use studioflow_db::repositories::PushSubscriptionRepo;
use studioflow_db::{SharedStore, StoreError};
use tokio::sync::Mutex;

use crate::delivery::push::WebPushTransport;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    Invalid(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Stores subscriptions under their scope and fans push payloads out to
/// them.
///
/// Read-modify-write cycles on a subscription set are serialized in-process.
pub struct PushSubscriptionRegistry {
    store: SharedStore,
    transport: Arc<dyn WebPushTransport>,
    write_lock: Mutex<()>,
}

impl PushSubscriptionRegistry {
    pub fn new(store: SharedStore, transport: Arc<dyn WebPushTransport>) -> Self {
        Self {
            store,
            transport,
            write_lock: Mutex::new(()),
        }
    }

    /// Add a subscription. Idempotent on `endpoint`: re-subscribing an
    /// existing endpoint refreshes its keys and never duplicates it.
    ///
    /// Returns `true` when the endpoint was new.
    pub async fn subscribe(
        &self,
        scope: &SubscriberScope,
        subscription: PushSubscription,
    ) -> Result<bool, RegistryError> {
        subscription.validate()?;

        let _guard = self.write_lock.lock().await;
        let mut subscriptions = PushSubscriptionRepo::list(self.store.as_ref(), scope).await?;
        let created = match subscriptions
            .iter_mut()
            .find(|s| s.endpoint == subscription.endpoint)
        {
            Some(existing) => {
                *existing = subscription;
                false
            }
            None => {
                subscriptions.push(subscription);
                true
            }
        };
        PushSubscriptionRepo::replace(self.store.as_ref(), scope, &subscriptions).await?;

        tracing::info!(%scope, created, total = subscriptions.len(), "Push subscription stored");
        Ok(created)
    }

    /// Remove the subscription with `endpoint`. Removing the last one deletes
    /// the scope's key. Returns `false` if nothing matched.
    pub async fn unsubscribe(
        &self,
        scope: &SubscriberScope,
        endpoint: &str,
    ) -> Result<bool, RegistryError> {
        let _guard = self.write_lock.lock().await;
        let mut subscriptions = PushSubscriptionRepo::list(self.store.as_ref(), scope).await?;
        let before = subscriptions.len();
        subscriptions.retain(|s| s.endpoint != endpoint);
        let removed = subscriptions.len() != before;
        if removed {
            PushSubscriptionRepo::replace(self.store.as_ref(), scope, &subscriptions).await?;
            tracing::info!(%scope, remaining = subscriptions.len(), "Push subscription removed");
        }
        Ok(removed)
    }

    pub async fn list(&self, scope: &SubscriberScope) -> Result<Vec<PushSubscription>, RegistryError> {
        Ok(PushSubscriptionRepo::list(self.store.as_ref(), scope).await?)
    }

    /// Send `payload` to every subscription of `scope` concurrently.
    ///
    /// Individual failures never fail the call. Endpoints reported gone are
    /// pruned; any other failure leaves the subscription in place. Only a
    /// failure to read the subscriptions is returned as an error.
    pub async fn send(
        &self,
        scope: &SubscriberScope,
        payload: &serde_json::Value,
    ) -> Result<PushSummary, RegistryError> {
        let subscriptions = PushSubscriptionRepo::list(self.store.as_ref(), scope).await?;
        if subscriptions.is_empty() {
            return Ok(PushSummary::default());
        }

        let attempts = subscriptions.iter().map(|subscription| async move {
            let result = self.transport.send(subscription, payload).await;
            (subscription.endpoint.as_str(), result)
        });
        let results = futures::future::join_all(attempts).await;

        let mut sent = 0;
        let mut gone = HashSet::new();
        for (endpoint, result) in results {
            match result {
                Ok(()) => sent += 1,
                Err(e) if e.is_permanent() => {
                    tracing::info!(%scope, endpoint, error = %e, "Pruning dead push endpoint");
                    gone.insert(endpoint.to_string());
                }
                Err(e) => {
                    tracing::warn!(%scope, endpoint, error = %e, "Push delivery failed");
                }
            }
        }

        let pruned = if gone.is_empty() {
            0
        } else {
            // Deliveries already happened; a failed prune is retried on the
            // next send.
            match self.prune(scope, &gone).await {
                Ok(pruned) => pruned,
                Err(e) => {
                    tracing::warn!(%scope, error = %e, gone = gone.len(), "Failed to prune dead push endpoints");
                    0
                }
            }
        };

        Ok(PushSummary {
            sent,
            total: subscriptions.len(),
            pruned,
        })
    }

    /// Drop `endpoints` from the current set, re-read under the write lock so
    /// concurrent subscribes are kept.
    async fn prune(
        &self,
        scope: &SubscriberScope,
        endpoints: &HashSet<String>,
    ) -> Result<usize, RegistryError> {
        let _guard = self.write_lock.lock().await;
        let mut subscriptions = PushSubscriptionRepo::list(self.store.as_ref(), scope).await?;
        let before = subscriptions.len();
        subscriptions.retain(|s| !endpoints.contains(&s.endpoint));
        let pruned = before - subscriptions.len();
        if pruned > 0 {
            PushSubscriptionRepo::replace(self.store.as_ref(), scope, &subscriptions).await?;
        }
        Ok(pruned)
    }
}
