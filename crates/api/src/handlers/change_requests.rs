//! Handlers for change requests, per project and across all projects.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use studioflow_core::change_request::{
    ChangeRequest, ChangeRequestStatus, Priority, ProjectChangeRequest,
};
use studioflow_engine::ledger::SubmittedChangeRequest;

use crate::error::AppResult;
use crate::query::ChangeRequestListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /projects/{id}/change-requests`.
#[derive(Debug, Deserialize)]
pub struct SubmitChangeRequest {
    pub request: String,
    #[serde(default)]
    pub priority: Priority,
}

/// Request body for `PATCH /projects/{id}/change-requests/{cr_id}`.
#[derive(Debug, Deserialize)]
pub struct TransitionChangeRequest {
    pub status: ChangeRequestStatus,
    pub response: Option<String>,
}

/// POST /api/v1/projects/{id}/change-requests
///
/// Responds 409 `BUDGET_EXHAUSTED` once every revision is used.
pub async fn submit(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(input): Json<SubmitChangeRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SubmittedChangeRequest>>)> {
    let submitted = state
        .engine
        .ledger
        .submit(&project_id, &input.request, input.priority)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(submitted))))
}

/// GET /api/v1/projects/{id}/change-requests
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<ChangeRequest>>>> {
    let items = state.engine.ledger.list_for_project(&project_id).await?;
    Ok(Json(DataResponse::new(items)))
}

/// PATCH /api/v1/projects/{id}/change-requests/{cr_id}
pub async fn transition(
    State(state): State<AppState>,
    Path((project_id, change_request_id)): Path<(String, String)>,
    Json(input): Json<TransitionChangeRequest>,
) -> AppResult<Json<DataResponse<ChangeRequest>>> {
    let updated = state
        .engine
        .ledger
        .transition(&project_id, &change_request_id, input.status, input.response)
        .await?;
    Ok(Json(DataResponse::new(updated)))
}

/// GET /api/v1/change-requests?status=
pub async fn list_all(
    State(state): State<AppState>,
    Query(params): Query<ChangeRequestListParams>,
) -> AppResult<Json<DataResponse<Vec<ProjectChangeRequest>>>> {
    let items = state.engine.ledger.list_all(params.status).await?;
    Ok(Json(DataResponse::new(items)))
}
