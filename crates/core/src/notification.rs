//! Notification events and their templates.
//!
//! Every lifecycle event the engine can emit is a variant of [`EventKind`].
//! Templates are resolved by exhaustive matching, so adding a kind without a
//! template does not compile.

use serde::{Deserialize, Serialize};

use crate::change_request::Priority;
use crate::phase::Phase;
use crate::project::MessageSender;
use crate::types::{ProjectId, Timestamp};

/// Maximum characters of user text quoted in a notification body.
pub const PREVIEW_LENGTH: usize = 120;

// ---------------------------------------------------------------------------
// Event kinds
// ---------------------------------------------------------------------------

/// Who a notification is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    Customer,
    Developer,
}

/// A lifecycle event, carrying the data its template needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    PhaseChange {
        from: Phase,
        to: Phase,
    },
    NewMessage {
        from: MessageSender,
        preview: String,
    },
    DesignReady {
        preview_url: String,
    },
    PaymentRequired {
        payment_url: String,
    },
    WebsiteLive {
        live_url: String,
    },
    ChangeRequestCreated {
        change_request_id: String,
        priority: Priority,
        preview: String,
    },
}

impl EventKind {
    /// Stable type name used in audit entries and logs.
    pub fn type_name(&self) -> &'static str {
        match self {
            EventKind::PhaseChange { .. } => "phase_change",
            EventKind::NewMessage { .. } => "new_message",
            EventKind::DesignReady { .. } => "design_ready",
            EventKind::PaymentRequired { .. } => "payment_required",
            EventKind::WebsiteLive { .. } => "website_live",
            EventKind::ChangeRequestCreated { .. } => "change_request_created",
        }
    }

    /// Default audience of the event.
    pub fn audience(&self) -> Audience {
        match self {
            EventKind::NewMessage {
                from: MessageSender::Client,
                ..
            }
            | EventKind::ChangeRequestCreated { .. } => Audience::Developer,
            EventKind::NewMessage {
                from: MessageSender::Developer,
                ..
            }
            | EventKind::PhaseChange { .. }
            | EventKind::DesignReady { .. }
            | EventKind::PaymentRequired { .. }
            | EventKind::WebsiteLive { .. } => Audience::Customer,
        }
    }

    /// Fixed urgency policy: only the events that need the customer to act
    /// keep the notification on screen.
    pub fn require_interaction(&self) -> bool {
        match self {
            EventKind::DesignReady { .. }
            | EventKind::PaymentRequired { .. }
            | EventKind::WebsiteLive { .. } => true,
            EventKind::PhaseChange { to, .. } => matches!(to, Phase::Payment | Phase::Live),
            EventKind::NewMessage { .. } | EventKind::ChangeRequestCreated { .. } => false,
        }
    }

    /// Link the notification should open, if the event carries one.
    pub fn url(&self) -> Option<&str> {
        match self {
            EventKind::DesignReady { preview_url } => Some(preview_url),
            EventKind::PaymentRequired { payment_url } => Some(payment_url),
            EventKind::WebsiteLive { live_url } => Some(live_url),
            EventKind::PhaseChange { .. }
            | EventKind::NewMessage { .. }
            | EventKind::ChangeRequestCreated { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// Title/body rendered for an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationTemplate {
    pub title: String,
    pub body: String,
    pub require_interaction: bool,
}

/// Resolve the template of `kind` for project `project_id`.
pub fn resolve_template(kind: &EventKind, project_id: &str) -> NotificationTemplate {
    let (title, body) = match kind {
        EventKind::PhaseChange { to, .. } => phase_template(*to, project_id),
        EventKind::NewMessage {
            from: MessageSender::Client,
            preview,
        } => (
            format!("New message on project {project_id}"),
            format!("The customer wrote: {preview}"),
        ),
        EventKind::NewMessage {
            from: MessageSender::Developer,
            preview,
        } => (
            "New message from your developer".to_string(),
            preview.clone(),
        ),
        EventKind::DesignReady { .. } => (
            "Your design is ready".to_string(),
            "Your website design is ready for review. Open the preview and let us know what you think."
                .to_string(),
        ),
        EventKind::PaymentRequired { .. } => (
            "Payment required".to_string(),
            "Your website is approved. Complete the payment so we can prepare the launch."
                .to_string(),
        ),
        EventKind::WebsiteLive { live_url } => (
            "Your website is live".to_string(),
            format!("Congratulations, your website is now online at {live_url}"),
        ),
        EventKind::ChangeRequestCreated {
            priority, preview, ..
        } => (
            format!("New {} change request on {project_id}", priority.as_str()),
            preview.clone(),
        ),
    };

    NotificationTemplate {
        title,
        body,
        require_interaction: kind.require_interaction(),
    }
}

fn phase_template(to: Phase, project_id: &str) -> (String, String) {
    let body = match to {
        Phase::Onboarding => "We have received your project and are getting started.",
        Phase::Design => "We are working on the design of your website.",
        Phase::Feedback => "Your design is ready for feedback.",
        Phase::Revisie => "We are processing your requested changes.",
        Phase::Payment => "Your website is approved and awaiting payment.",
        Phase::Review => "Payment received. We are doing the final review.",
        Phase::Live => "Your website is live!",
    };
    (
        format!("Project {project_id}: {}", to.label()),
        body.to_string(),
    )
}

/// Shorten user text for a notification body, on a character boundary.
pub fn preview(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= PREVIEW_LENGTH {
        return trimmed.to_string();
    }
    let mut short: String = trimmed.chars().take(PREVIEW_LENGTH).collect();
    short.push('…');
    short
}

// ---------------------------------------------------------------------------
// NotificationEvent
// ---------------------------------------------------------------------------

/// The unit handed to the dispatcher. Ephemeral, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    #[serde(flatten)]
    pub kind: EventKind,
    pub project_id: ProjectId,
    pub audience: Audience,
    pub title: String,
    pub body: String,
    pub require_interaction: bool,
    pub timestamp: Timestamp,
}

impl NotificationEvent {
    /// Build an event for its default audience with the template resolved.
    pub fn new(kind: EventKind, project_id: impl Into<ProjectId>) -> Self {
        let project_id = project_id.into();
        let template = resolve_template(&kind, &project_id);
        Self {
            audience: kind.audience(),
            kind,
            project_id,
            title: template.title,
            body: template.body,
            require_interaction: template.require_interaction,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Stable type name of the underlying kind.
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// JSON payload sent to push subscribers.
    pub fn push_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "type": self.type_name(),
            "projectId": self.project_id,
            "title": self.title,
            "body": self.body,
            "requireInteraction": self.require_interaction,
            "url": self.kind.url(),
            "timestamp": self.timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urgency_policy_table() {
        let cases = [
            (
                EventKind::DesignReady {
                    preview_url: "https://p".into(),
                },
                true,
            ),
            (
                EventKind::PaymentRequired {
                    payment_url: "https://pay".into(),
                },
                true,
            ),
            (
                EventKind::WebsiteLive {
                    live_url: "https://live".into(),
                },
                true,
            ),
            (
                EventKind::PhaseChange {
                    from: Phase::Feedback,
                    to: Phase::Payment,
                },
                true,
            ),
            (
                EventKind::PhaseChange {
                    from: Phase::Review,
                    to: Phase::Live,
                },
                true,
            ),
            (
                EventKind::PhaseChange {
                    from: Phase::Onboarding,
                    to: Phase::Design,
                },
                false,
            ),
            (
                EventKind::NewMessage {
                    from: MessageSender::Client,
                    preview: "hi".into(),
                },
                false,
            ),
            (
                EventKind::ChangeRequestCreated {
                    change_request_id: "cr".into(),
                    priority: Priority::Urgent,
                    preview: "fix".into(),
                },
                false,
            ),
        ];

        for (kind, expected) in cases {
            assert_eq!(
                kind.require_interaction(),
                expected,
                "{} urgency",
                kind.type_name()
            );
        }
    }

    #[test]
    fn change_request_goes_to_developer() {
        let event = NotificationEvent::new(
            EventKind::ChangeRequestCreated {
                change_request_id: "cr-1".into(),
                priority: Priority::Urgent,
                preview: "Swap hero image".into(),
            },
            "ABCD1234",
        );
        assert_eq!(event.audience, Audience::Developer);
        assert_eq!(event.type_name(), "change_request_created");
        assert_eq!(event.title, "New urgent change request on ABCD1234");
        assert_eq!(event.body, "Swap hero image");
    }

    #[test]
    fn message_audience_is_counterpart() {
        let from_client = EventKind::NewMessage {
            from: MessageSender::Client,
            preview: "hello".into(),
        };
        let from_dev = EventKind::NewMessage {
            from: MessageSender::Developer,
            preview: "hello".into(),
        };
        assert_eq!(from_client.audience(), Audience::Developer);
        assert_eq!(from_dev.audience(), Audience::Customer);
    }

    #[test]
    fn phase_change_template_names_target_phase() {
        let template = resolve_template(
            &EventKind::PhaseChange {
                from: Phase::Onboarding,
                to: Phase::Design,
            },
            "P1",
        );
        assert_eq!(template.title, "Project P1: Design in progress");
        assert!(!template.require_interaction);
    }

    #[test]
    fn preview_truncates_long_text() {
        let long = "é".repeat(PREVIEW_LENGTH + 10);
        let short = preview(&long);
        assert_eq!(short.chars().count(), PREVIEW_LENGTH + 1);
        assert!(short.ends_with('…'));
        assert_eq!(preview("  short  "), "short");
    }

    #[test]
    fn push_payload_carries_url_and_flag() {
        let event = NotificationEvent::new(
            EventKind::WebsiteLive {
                live_url: "https://example.com".into(),
            },
            "P1",
        );
        let payload = event.push_payload();
        assert_eq!(payload["type"], "website_live");
        assert_eq!(payload["requireInteraction"], true);
        assert_eq!(payload["url"], "https://example.com");
    }

    #[test]
    fn event_serializes_with_type_tag() {
        let event = NotificationEvent::new(
            EventKind::PhaseChange {
                from: Phase::Design,
                to: Phase::Feedback,
            },
            "P1",
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "phase_change");
        assert_eq!(json["to"], "feedback");
        assert_eq!(json["audience"], "customer");
    }
}
