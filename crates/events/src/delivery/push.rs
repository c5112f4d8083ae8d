//! Web push delivery.
//!
//! [`HttpPushTransport`] POSTs the JSON payload to the subscription endpoint.
//! A 404 or 410 from the push service means the endpoint is gone for good and
//! surfaces as [`PushError::Gone`] so the registry can prune it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use studioflow_core::push::PushSubscription;

/// Default time-to-live the push service keeps an undelivered message.
const DEFAULT_TTL_SECS: u32 = 86_400;

/// Default HTTP timeout for a single push request.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// The endpoint no longer exists (HTTP 404/410). Permanent.
    #[error("Push endpoint gone (HTTP {0})")]
    Gone(u16),

    /// The push service refused the message with another status. Transient
    /// as far as the subscription is concerned.
    #[error("Push service returned HTTP {0}")]
    Rejected(u16),

    /// Network, DNS, timeout, or client setup failure.
    #[error("Push request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl PushError {
    pub fn is_permanent(&self) -> bool {
        matches!(self, PushError::Gone(_))
    }
}

// ---------------------------------------------------------------------------
// PushConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PushConfig {
    pub ttl_secs: u32,
    pub timeout: Duration,
}

impl PushConfig {
    /// Load from `PUSH_TTL_SECS` / `PUSH_TIMEOUT_SECS`, falling back to the
    /// defaults when unset or unparsable.
    pub fn from_env() -> Self {
        Self {
            ttl_secs: std::env::var("PUSH_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TTL_SECS),
            timeout: Duration::from_secs(
                std::env::var("PUSH_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        }
    }
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_TTL_SECS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

// ---------------------------------------------------------------------------
// Transport seam
// ---------------------------------------------------------------------------

#[async_trait]
pub trait WebPushTransport: Send + Sync {
    async fn send(
        &self,
        subscription: &PushSubscription,
        payload: &serde_json::Value,
    ) -> Result<(), PushError>;
}

// ---------------------------------------------------------------------------
// HttpPushTransport
// ---------------------------------------------------------------------------

pub struct HttpPushTransport {
    client: reqwest::Client,
    ttl_secs: u32,
}

impl HttpPushTransport {
    pub fn new(config: PushConfig) -> Result<Self, PushError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            ttl_secs: config.ttl_secs,
        })
    }
}

#[async_trait]
impl WebPushTransport for HttpPushTransport {
    async fn send(
        &self,
        subscription: &PushSubscription,
        payload: &serde_json::Value,
    ) -> Result<(), PushError> {
        let response = self
            .client
            .post(&subscription.endpoint)
            .header("TTL", self.ttl_secs.to_string())
            .json(payload)
            .send()
            .await?;
        classify_status(response.status())
    }
}

fn classify_status(status: StatusCode) -> Result<(), PushError> {
    match status {
        s if s.is_success() => Ok(()),
        StatusCode::NOT_FOUND | StatusCode::GONE => Err(PushError::Gone(status.as_u16())),
        s => Err(PushError::Rejected(s.as_u16())),
    }
}
