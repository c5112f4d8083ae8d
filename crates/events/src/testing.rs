//! In-memory transport doubles for exercising the dispatcher without SMTP or
//! a push service.

use std::collections::HashSet;

use async_trait::async_trait;
use studioflow_core::push::PushSubscription;
use tokio::sync::Mutex;

use crate::delivery::email::{EmailOutcome, TransactionalEmailTransport};
use crate::delivery::push::{PushError, WebPushTransport};

/// A push the recording transport accepted.
#[derive(Debug, Clone)]
pub struct RecordedPush {
    pub endpoint: String,
    pub payload: serde_json::Value,
}

/// Push transport that records deliveries. Endpoints can be marked gone
/// (HTTP 410) or failing (HTTP 500).
#[derive(Debug, Default)]
pub struct RecordingPushTransport {
    delivered: Mutex<Vec<RecordedPush>>,
    gone: HashSet<String>,
    failing: HashSet<String>,
}

impl RecordingPushTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gone(mut self, endpoint: impl Into<String>) -> Self {
        self.gone.insert(endpoint.into());
        self
    }

    pub fn with_failing(mut self, endpoint: impl Into<String>) -> Self {
        self.failing.insert(endpoint.into());
        self
    }

    pub async fn delivered(&self) -> Vec<RecordedPush> {
        self.delivered.lock().await.clone()
    }
}

#[async_trait]
impl WebPushTransport for RecordingPushTransport {
    async fn send(
        &self,
        subscription: &PushSubscription,
        payload: &serde_json::Value,
    ) -> Result<(), PushError> {
        if self.gone.contains(&subscription.endpoint) {
            return Err(PushError::Gone(410));
        }
        if self.failing.contains(&subscription.endpoint) {
            return Err(PushError::Rejected(500));
        }
        self.delivered.lock().await.push(RecordedPush {
            endpoint: subscription.endpoint.clone(),
            payload: payload.clone(),
        });
        Ok(())
    }
}

/// An email the recording transport was asked to send.
#[derive(Debug, Clone)]
pub struct RecordedEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Email transport that records every attempt and either succeeds or fails
/// with a fixed error.
#[derive(Debug, Default)]
pub struct RecordingEmailTransport {
    attempts: Mutex<Vec<RecordedEmail>>,
    fail_with: Option<String>,
}

impl RecordingEmailTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose every send fails with `error`.
    pub fn failing(error: impl Into<String>) -> Self {
        Self {
            attempts: Mutex::default(),
            fail_with: Some(error.into()),
        }
    }

    pub async fn attempts(&self) -> Vec<RecordedEmail> {
        self.attempts.lock().await.clone()
    }
}

#[async_trait]
impl TransactionalEmailTransport for RecordingEmailTransport {
    async fn send(&self, to: &str, subject: &str, html: &str) -> EmailOutcome {
        let mut attempts = self.attempts.lock().await;
        attempts.push(RecordedEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        });
        match &self.fail_with {
            Some(error) => EmailOutcome::failed(error.clone()),
            None => EmailOutcome::sent(Some(format!("msg-{}", attempts.len()))),
        }
    }
}
