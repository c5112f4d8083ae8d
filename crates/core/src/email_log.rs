//! Email audit entries and the query rules over them.

use serde::{Deserialize, Serialize};

use crate::types::{generate_record_id, ProjectId, Timestamp};

/// Maximum number of entries the global audit log retains.
pub const EMAIL_LOG_CAPACITY: usize = 200;

/// Page size used when a query does not specify one.
pub const DEFAULT_EMAIL_LOG_LIMIT: usize = 50;

/// One notification email attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailLogEntry {
    pub id: String,
    pub timestamp: Timestamp,
    pub project_id: ProjectId,
    pub recipient_email: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub subject: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EmailLogEntry {
    /// Record of a successful send.
    pub fn success(
        project_id: impl Into<ProjectId>,
        recipient_email: impl Into<String>,
        kind: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            id: generate_record_id(),
            timestamp: chrono::Utc::now(),
            project_id: project_id.into(),
            recipient_email: recipient_email.into(),
            kind: kind.into(),
            subject: subject.into(),
            success: true,
            error: None,
        }
    }

    /// Record of a failed or skipped send.
    pub fn failure(
        project_id: impl Into<ProjectId>,
        recipient_email: impl Into<String>,
        kind: impl Into<String>,
        subject: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::success(project_id, recipient_email, kind, subject)
        }
    }
}

/// Filter by project, re-sort newest first, and cap at
/// `min(limit, EMAIL_LOG_CAPACITY)`.
///
/// The re-sort matters because append order and timestamp order can diverge
/// when writers race.
pub fn query_entries<'a>(
    entries: impl IntoIterator<Item = &'a EmailLogEntry>,
    project_id: Option<&str>,
    limit: usize,
) -> Vec<EmailLogEntry> {
    let mut matched: Vec<EmailLogEntry> = entries
        .into_iter()
        .filter(|e| project_id.map_or(true, |p| e.project_id == p))
        .cloned()
        .collect();
    matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    matched.truncate(limit.min(EMAIL_LOG_CAPACITY));
    matched
}
