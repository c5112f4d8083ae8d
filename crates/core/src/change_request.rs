//! Change request entity, status ordering, and listing order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{ProjectId, Timestamp};

/// Maximum accepted length of a change request text, in characters.
pub const MAX_REQUEST_LENGTH: usize = 5000;

// ---------------------------------------------------------------------------
// Priority / status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    Urgent,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::Urgent => "urgent",
        }
    }
}

/// Lifecycle of a change request. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeRequestStatus {
    Pending,
    InProgress,
    Completed,
}

impl ChangeRequestStatus {
    /// Sort rank: open work first.
    pub fn rank(self) -> u8 {
        match self {
            ChangeRequestStatus::Pending => 0,
            ChangeRequestStatus::InProgress => 1,
            ChangeRequestStatus::Completed => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChangeRequestStatus::Pending => "pending",
            ChangeRequestStatus::InProgress => "in_progress",
            ChangeRequestStatus::Completed => "completed",
        }
    }

    /// Whether the request still needs developer work.
    pub fn is_open(self) -> bool {
        !matches!(self, ChangeRequestStatus::Completed)
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A revision the customer asked for. Owned by its project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRequest {
    pub id: String,
    pub created_at: Timestamp,
    pub request: String,
    #[serde(default)]
    pub priority: Priority,
    pub status: ChangeRequestStatus,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub completed_at: Option<Timestamp>,
}

/// Outcome of applying a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    /// The status moved forward.
    Advanced,
    /// The request already had the requested status; nothing changed.
    Unchanged,
}

impl ChangeRequest {
    /// Apply a forward-only status change.
    ///
    /// Same-status calls are no-ops so retries are safe. Moving backwards,
    /// including out of `completed`, is rejected. `completed_at` is stamped
    /// when the request first reaches `completed`.
    pub fn apply_status(
        &mut self,
        new_status: ChangeRequestStatus,
        response: Option<String>,
        now: Timestamp,
    ) -> Result<StatusChange, CoreError> {
        match new_status.rank().cmp(&self.status.rank()) {
            Ordering::Equal => Ok(StatusChange::Unchanged),
            Ordering::Less => Err(CoreError::InvalidTransition(format!(
                "change request {} cannot move from {} back to {}",
                self.id,
                self.status.as_str(),
                new_status.as_str()
            ))),
            Ordering::Greater => {
                self.status = new_status;
                if let Some(response) = response.filter(|r| !r.trim().is_empty()) {
                    self.response = Some(response);
                }
                if new_status == ChangeRequestStatus::Completed {
                    self.completed_at = Some(now);
                }
                Ok(StatusChange::Advanced)
            }
        }
    }
}

/// Validate the free-text body of a new change request.
pub fn validate_request_text(text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation(
            "Change request text must not be empty".to_string(),
        ));
    }
    if text.chars().count() > MAX_REQUEST_LENGTH {
        return Err(CoreError::Validation(format!(
            "Change request text exceeds {MAX_REQUEST_LENGTH} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Cross-project listing
// ---------------------------------------------------------------------------

/// A change request together with the project it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectChangeRequest {
    pub project_id: ProjectId,
    pub customer_name: String,
    #[serde(flatten)]
    pub change_request: ChangeRequest,
}

/// Listing order: open items first (`pending`, `in_progress`, `completed`),
/// newest first within a status.
pub fn listing_order(a: &ChangeRequest, b: &ChangeRequest) -> Ordering {
    a.status
        .rank()
        .cmp(&b.status.rank())
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// Filter by status and sort in [`listing_order`].
pub fn sort_for_listing(
    mut items: Vec<ProjectChangeRequest>,
    filter_status: Option<ChangeRequestStatus>,
) -> Vec<ProjectChangeRequest> {
    if let Some(status) = filter_status {
        items.retain(|item| item.change_request.status == status);
    }
    items.sort_by(|a, b| listing_order(&a.change_request, &b.change_request));
    items
}
