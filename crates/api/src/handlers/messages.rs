//! Handlers for project messages.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use studioflow_core::project::{Message, MessageSender};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /projects/{id}/messages`.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub from: MessageSender,
    pub text: String,
}

/// POST /api/v1/projects/{id}/messages
pub async fn send(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(input): Json<SendMessageRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Message>>)> {
    let message = state
        .engine
        .messages
        .send_message(&project_id, input.from, &input.text)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(message))))
}

/// POST /api/v1/projects/{id}/messages/{message_id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    Path((project_id, message_id)): Path<(String, String)>,
) -> AppResult<Json<DataResponse<Message>>> {
    let message = state
        .engine
        .messages
        .mark_message_read(&project_id, &message_id)
        .await?;
    Ok(Json(DataResponse::new(message)))
}
