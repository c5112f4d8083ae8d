//! One event in, three isolated channels out.

use std::sync::Arc;

use serde::Serialize;
use studioflow_core::email_log::EmailLogEntry;
use studioflow_core::notification::{Audience, NotificationEvent};
use studioflow_core::push::{PushSummary, SubscriberScope};

use crate::audit::EmailAuditLog;
use crate::bus::ActivityBus;
use crate::delivery::email::{render_email, EmailOutcome, TransactionalEmailTransport};
use crate::registry::PushSubscriptionRegistry;

/// What happened on each channel for one dispatch.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchReport {
    pub push: PushSummary,
    /// Set when the push channel failed as a whole (e.g. store unreachable).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_error: Option<String>,
    pub email: EmailOutcome,
    /// Whether the attempt made it into the audit log.
    pub audit_logged: bool,
    /// Live subscribers that received the event.
    pub activity_receivers: usize,
}

/// Fans a [`NotificationEvent`] out to push, email + audit, and the activity
/// bus.
///
/// Channels run concurrently and independently. A failure on one is logged
/// and reflected in the [`DispatchReport`], never returned to the caller and
/// never stops the others. There is no retry or queue.
pub struct NotificationDispatcher {
    registry: Arc<PushSubscriptionRegistry>,
    email: Arc<dyn TransactionalEmailTransport>,
    audit: Arc<EmailAuditLog>,
    bus: Arc<ActivityBus>,
    developer_email: Option<String>,
}

impl NotificationDispatcher {
    pub fn new(
        registry: Arc<PushSubscriptionRegistry>,
        email: Arc<dyn TransactionalEmailTransport>,
        audit: Arc<EmailAuditLog>,
        bus: Arc<ActivityBus>,
        developer_email: Option<String>,
    ) -> Self {
        Self {
            registry,
            email,
            audit,
            bus,
            developer_email,
        }
    }

    /// Dispatch `event`. `customer_email` is the project's customer address,
    /// used when the event is addressed to the customer.
    pub async fn dispatch(&self, event: &NotificationEvent, customer_email: &str) -> DispatchReport {
        let recipient = match event.audience {
            Audience::Customer => Some(customer_email).filter(|e| !e.trim().is_empty()),
            Audience::Developer => self.developer_email.as_deref(),
        };

        let ((push, push_error), (email, audit_logged), activity_receivers) = tokio::join!(
            self.push_channel(event),
            self.email_channel(event, recipient),
            async { self.bus.publish(event.clone()) },
        );

        tracing::debug!(
            project_id = %event.project_id,
            event_type = event.type_name(),
            push_sent = push.sent,
            push_total = push.total,
            email_success = email.success,
            activity_receivers,
            "Notification dispatched"
        );

        DispatchReport {
            push,
            push_error,
            email,
            audit_logged,
            activity_receivers,
        }
    }

    async fn push_channel(&self, event: &NotificationEvent) -> (PushSummary, Option<String>) {
        let scope = match event.audience {
            Audience::Customer => SubscriberScope::Project(event.project_id.clone()),
            Audience::Developer => SubscriberScope::Developer,
        };
        match self.registry.send(&scope, &event.push_payload()).await {
            Ok(summary) => (summary, None),
            Err(e) => {
                tracing::warn!(
                    project_id = %event.project_id,
                    %scope,
                    error = %e,
                    "Push channel failed"
                );
                (PushSummary::default(), Some(e.to_string()))
            }
        }
    }

    async fn email_channel(
        &self,
        event: &NotificationEvent,
        recipient: Option<&str>,
    ) -> (EmailOutcome, bool) {
        let (subject, html) = render_email(event);

        let outcome = match recipient {
            Some(to) => self.email.send(to, &subject, &html).await,
            None => EmailOutcome::failed(format!(
                "No recipient address for {:?} audience",
                event.audience
            )),
        };

        if !outcome.success {
            tracing::warn!(
                project_id = %event.project_id,
                event_type = event.type_name(),
                error = outcome.error.as_deref().unwrap_or("unknown"),
                "Notification email not sent"
            );
        }

        let recipient_email = recipient.unwrap_or_default();
        let entry = if outcome.success {
            EmailLogEntry::success(
                event.project_id.clone(),
                recipient_email,
                event.type_name(),
                subject,
            )
        } else {
            EmailLogEntry::failure(
                event.project_id.clone(),
                recipient_email,
                event.type_name(),
                subject,
                outcome
                    .error
                    .clone()
                    .unwrap_or_else(|| "unknown error".to_string()),
            )
        };

        let audit_logged = match self.audit.append(entry).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(project_id = %event.project_id, error = %e, "Email audit append failed");
                false
            }
        };

        (outcome, audit_logged)
    }
}
