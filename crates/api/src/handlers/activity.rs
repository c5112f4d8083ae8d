//! Handlers for activity feeds, read state, and the live event stream.

use std::convert::Infallible;

use axum::extract::{Path, Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use serde::{Deserialize, Serialize};
use studioflow_core::activity::{ActivityItem, NotificationReceipt};
use studioflow_core::notification::Audience;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

use crate::error::AppResult;
use crate::query::{ActivityParams, StreamParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /projects/{id}/activity/read`.
#[derive(Debug, Deserialize)]
pub struct MarkItemReadRequest {
    pub item_key: String,
}

/// Response body for `POST /projects/{id}/activity/read`.
#[derive(Debug, Serialize)]
pub struct MarkItemReadResponse {
    pub item_key: String,
    /// Present for derived items; message items flip `read` instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<NotificationReceipt>,
}

/// Request body for `POST /projects/{id}/activity/read-all`.
#[derive(Debug, Deserialize)]
pub struct MarkAllReadRequest {
    pub viewer: Audience,
}

#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    pub marked: usize,
}

/// GET /api/v1/activity/developer?filter=&unread_only=
pub async fn developer_feed(
    State(state): State<AppState>,
    Query(params): Query<ActivityParams>,
) -> AppResult<Json<DataResponse<Vec<ActivityItem>>>> {
    let items = state
        .engine
        .activity
        .developer_feed(params.filter, params.unread_only)
        .await?;
    Ok(Json(DataResponse::new(items)))
}

/// GET /api/v1/projects/{id}/activity?unread_only=
pub async fn customer_feed(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Query(params): Query<ActivityParams>,
) -> AppResult<Json<DataResponse<Vec<ActivityItem>>>> {
    let items = state
        .engine
        .activity
        .customer_feed(&project_id, params.unread_only)
        .await?;
    Ok(Json(DataResponse::new(items)))
}

/// POST /api/v1/projects/{id}/activity/read
pub async fn mark_read(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(input): Json<MarkItemReadRequest>,
) -> AppResult<Json<DataResponse<MarkItemReadResponse>>> {
    let receipt = state
        .engine
        .activity
        .mark_item_read(&project_id, &input.item_key)
        .await?;
    Ok(Json(DataResponse::new(MarkItemReadResponse {
        item_key: input.item_key,
        receipt,
    })))
}

/// POST /api/v1/projects/{id}/activity/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(input): Json<MarkAllReadRequest>,
) -> AppResult<Json<DataResponse<MarkAllReadResponse>>> {
    let marked = state
        .engine
        .activity
        .mark_all_read(&project_id, input.viewer)
        .await?;
    Ok(Json(DataResponse::new(MarkAllReadResponse { marked })))
}

/// GET /api/v1/activity/stream?project_id=
///
/// Server-sent events, one per dispatched notification. Each event is named
/// after the notification type and carries the event as JSON. Receivers that
/// fall behind skip the missed events.
pub async fn stream(
    State(state): State<AppState>,
    Query(params): Query<StreamParams>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.engine.bus.subscribe();
    let project_filter = params.project_id;

    let events = BroadcastStream::new(receiver).filter_map(move |received| {
        let event = match received {
            Ok(event) => event,
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Activity stream lagged");
                return None;
            }
        };
        if project_filter
            .as_deref()
            .is_some_and(|id| id != event.project_id)
        {
            return None;
        }
        match serde_json::to_string(&event) {
            Ok(data) => Some(Ok(Event::default().event(event.type_name()).data(data))),
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode activity event");
                None
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
