//! Handlers for the global email audit log.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use studioflow_core::email_log::{EmailLogEntry, DEFAULT_EMAIL_LOG_LIMIT};

use crate::error::AppResult;
use crate::query::EmailLogParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /email-log`.
#[derive(Debug, Deserialize)]
pub struct AppendEmailLog {
    pub project_id: String,
    pub recipient_email: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub subject: String,
    pub success: bool,
    pub error: Option<String>,
}

impl AppendEmailLog {
    fn into_entry(self) -> EmailLogEntry {
        if self.success {
            EmailLogEntry::success(self.project_id, self.recipient_email, self.kind, self.subject)
        } else {
            EmailLogEntry::failure(
                self.project_id,
                self.recipient_email,
                self.kind,
                self.subject,
                self.error.unwrap_or_else(|| "Unknown error".to_string()),
            )
        }
    }
}

/// GET /api/v1/email-log?project_id=&limit=
///
/// Newest first. `limit` defaults to 50 and is capped at the log capacity.
pub async fn query(
    State(state): State<AppState>,
    Query(params): Query<EmailLogParams>,
) -> AppResult<Json<DataResponse<Vec<EmailLogEntry>>>> {
    let limit = params.limit.unwrap_or(DEFAULT_EMAIL_LOG_LIMIT);
    let entries = state
        .engine
        .audit
        .query(params.project_id.as_deref(), limit)
        .await?;
    Ok(Json(DataResponse::new(entries)))
}

/// POST /api/v1/email-log
pub async fn append(
    State(state): State<AppState>,
    Json(input): Json<AppendEmailLog>,
) -> AppResult<(StatusCode, Json<DataResponse<EmailLogEntry>>)> {
    let entry = input.into_entry();
    state.engine.audit.append(entry.clone()).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(entry))))
}
