//! Web-push subscription records and the scopes they are stored under.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::ProjectId;

/// Browser-generated encryption keys of a push subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushKeys {
    pub p256dh: String,
    pub auth: String,
}

/// One browser/device endpoint. `endpoint` is the unique key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushSubscription {
    pub endpoint: String,
    pub keys: PushKeys,
}

impl PushSubscription {
    /// Reject subscriptions that could never be delivered to.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(self.endpoint.starts_with("https://") || self.endpoint.starts_with("http://")) {
            return Err(CoreError::Validation(format!(
                "Push endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        if self.keys.p256dh.trim().is_empty() || self.keys.auth.trim().is_empty() {
            return Err(CoreError::Validation(
                "Push subscription keys must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Whose devices a subscription set belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SubscriberScope {
    /// The customer's devices for one project.
    Project(ProjectId),
    /// The developer's devices, shared across projects.
    Developer,
}

impl std::fmt::Display for SubscriberScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriberScope::Project(id) => write!(f, "project:{id}"),
            SubscriberScope::Developer => f.write_str("developer"),
        }
    }
}

/// Outcome of a push fan-out to one scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PushSummary {
    /// Subscriptions the push service accepted.
    pub sent: usize,
    /// Subscriptions attempted.
    pub total: usize,
    /// Subscriptions removed because their endpoint is gone.
    pub pruned: usize,
}
