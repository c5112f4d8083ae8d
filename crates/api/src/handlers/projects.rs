//! Handlers for the `/projects` resource: creation, phase moves, deadlines,
//! and deliverable links.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use studioflow_core::package::ProjectDeadlines;
use studioflow_core::phase::Phase;
use studioflow_core::project::{CreateProject, Project, UpdateLinks};
use studioflow_engine::projects::PublishedLinks;
use studioflow_events::DispatchReport;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /projects/{id}/phase`.
#[derive(Debug, Deserialize)]
pub struct AdvancePhaseRequest {
    pub phase: Phase,
}

/// Response body for a phase move.
#[derive(Debug, Serialize)]
pub struct PhaseAdvanceResponse {
    pub project: Project,
    pub from: Phase,
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispatch: Option<DispatchReport>,
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    let project = state.engine.projects.create(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(project))))
}

/// GET /api/v1/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = state.engine.projects.list().await?;
    Ok(Json(DataResponse::new(projects)))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = state.engine.projects.get(&id).await?;
    Ok(Json(DataResponse::new(project)))
}

/// POST /api/v1/projects/{id}/phase
pub async fn advance_phase(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<AdvancePhaseRequest>,
) -> AppResult<Json<DataResponse<PhaseAdvanceResponse>>> {
    let advance = state.engine.phases.advance(&id, input.phase).await?;
    let changed = advance.changed();
    Ok(Json(DataResponse::new(PhaseAdvanceResponse {
        project: advance.project,
        from: advance.from,
        changed,
        dispatch: advance.dispatch,
    })))
}

/// GET /api/v1/projects/{id}/deadlines
pub async fn deadlines(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<ProjectDeadlines>>> {
    let deadlines = state.engine.phases.deadlines(&id).await?;
    Ok(Json(DataResponse::new(deadlines)))
}

/// PUT /api/v1/projects/{id}/links
pub async fn publish_links(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateLinks>,
) -> AppResult<Json<DataResponse<PublishedLinks>>> {
    let published = state.engine.projects.publish_links(&id, input).await?;
    Ok(Json(DataResponse::new(published)))
}
