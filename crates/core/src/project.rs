//! Project aggregate: the record a customer and the developer both mutate
//! through the engine.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::change_request::ChangeRequest;
use crate::error::CoreError;
use crate::package::PackageType;
use crate::phase::Phase;
use crate::types::{ProjectId, Timestamp};

/// Revision budget applied when none is configured or requested.
pub const DEFAULT_REVISIONS_TOTAL: u32 = 5;

/// Maximum accepted length of a chat message, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 5000;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Payment state, written by the external gateway integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageSender {
    Client,
    Developer,
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// Contact details of the paying customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Customer {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
}

/// A chat message between customer and developer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub from: MessageSender,
    pub text: String,
    pub created_at: Timestamp,
    #[serde(default)]
    pub read: bool,
}

/// A project record as stored under `project:{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub phase: Phase,
    pub service_type: String,
    pub package_type: PackageType,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    pub customer: Customer,
    pub revisions_used: u32,
    pub revisions_total: u32,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub change_requests: Vec<ChangeRequest>,
    #[serde(default)]
    pub design_preview_url: Option<String>,
    #[serde(default)]
    pub payment_url: Option<String>,
    #[serde(default)]
    pub live_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    /// Build a fresh project in the `onboarding` phase.
    pub fn new(id: ProjectId, input: CreateProject, default_revisions: u32, now: Timestamp) -> Self {
        Self {
            id,
            phase: Phase::Onboarding,
            service_type: input.service_type,
            package_type: input.package_type,
            payment_status: PaymentStatus::Pending,
            customer: input.customer,
            revisions_used: 0,
            revisions_total: input.revisions_total.unwrap_or(default_revisions),
            messages: Vec::new(),
            change_requests: Vec::new(),
            design_preview_url: None,
            payment_url: None,
            live_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Revisions still available.
    pub fn revisions_remaining(&self) -> u32 {
        self.revisions_total.saturating_sub(self.revisions_used)
    }

    /// Whether another change request may be submitted.
    pub fn has_revision_budget(&self) -> bool {
        self.revisions_used < self.revisions_total
    }

    /// Find a message by id.
    pub fn message_mut(&mut self, message_id: &str) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == message_id)
    }

    /// Find a change request by id.
    pub fn change_request_mut(&mut self, change_request_id: &str) -> Option<&mut ChangeRequest> {
        self.change_requests
            .iter_mut()
            .find(|cr| cr.id == change_request_id)
    }
}

/// Validate the text of a new chat message.
pub fn validate_message_text(text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation("Message text must not be empty".to_string()));
    }
    if text.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Message text exceeds {MAX_MESSAGE_LENGTH} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// DTO for creating a project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 100))]
    pub service_type: String,
    pub package_type: PackageType,
    #[validate(nested)]
    pub customer: Customer,
    /// Defaults to the configured budget when omitted.
    #[validate(range(min = 1, max = 50))]
    pub revisions_total: Option<u32>,
}

/// DTO for publishing deliverable links. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateLinks {
    #[validate(url)]
    pub design_preview_url: Option<String>,
    #[validate(url)]
    pub payment_url: Option<String>,
    #[validate(url)]
    pub live_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn create_input() -> CreateProject {
        CreateProject {
            service_type: "website".to_string(),
            package_type: PackageType::Professional,
            customer: Customer {
                name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
                phone: None,
                company_name: Some("Doe & Co".to_string()),
            },
            revisions_total: None,
        }
    }

    #[test]
    fn new_project_starts_in_onboarding_with_default_budget() {
        let project = Project::new("ABCD1234".into(), create_input(), 5, Utc::now());
        assert_eq!(project.phase, Phase::Onboarding);
        assert_eq!(project.revisions_used, 0);
        assert_eq!(project.revisions_total, 5);
        assert_eq!(project.created_at, project.updated_at);
    }

    #[test]
    fn explicit_budget_overrides_default() {
        let mut input = create_input();
        input.revisions_total = Some(3);
        let project = Project::new("ABCD1234".into(), input, 5, Utc::now());
        assert_eq!(project.revisions_total, 3);
        assert_eq!(project.revisions_remaining(), 3);
    }

    #[test]
    fn budget_helpers() {
        let mut project = Project::new("ABCD1234".into(), create_input(), 2, Utc::now());
        assert!(project.has_revision_budget());
        project.revisions_used = 2;
        assert!(!project.has_revision_budget());
        assert_eq!(project.revisions_remaining(), 0);
    }

    #[test]
    fn create_dto_rejects_invalid_email() {
        let mut input = create_input();
        input.customer.email = "not-an-email".to_string();
        assert!(input.validate().is_err());
    }

    #[test]
    fn create_dto_rejects_empty_service_type() {
        let mut input = create_input();
        input.service_type = String::new();
        assert!(input.validate().is_err());
    }

    #[test]
    fn create_dto_accepts_valid_input() {
        assert!(create_input().validate().is_ok());
    }

    #[test]
    fn message_text_must_not_be_blank() {
        assert!(validate_message_text("  ").is_err());
        assert!(validate_message_text("Looks great!").is_ok());
        assert!(validate_message_text(&"x".repeat(MAX_MESSAGE_LENGTH + 1)).is_err());
    }

    #[test]
    fn links_dto_rejects_non_url() {
        let links = UpdateLinks {
            design_preview_url: Some("not a url".to_string()),
            ..Default::default()
        };
        assert!(links.validate().is_err());
    }

    #[test]
    fn stored_project_tolerates_missing_optional_fields() {
        let json = serde_json::json!({
            "id": "ABCD1234",
            "phase": "design",
            "service_type": "website",
            "package_type": "starter",
            "customer": { "name": "A", "email": "a@example.com" },
            "revisions_used": 1,
            "revisions_total": 5,
            "created_at": "2026-10-01T09:00:00Z",
            "updated_at": "2026-10-02T09:00:00Z"
        });
        let project: Project = serde_json::from_value(json).unwrap();
        assert!(project.messages.is_empty());
        assert_eq!(project.payment_status, PaymentStatus::Pending);
    }
}
