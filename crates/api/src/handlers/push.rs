//! Handlers for web-push subscriptions.
//!
//! Customer devices subscribe per project; developer devices share one scope.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use studioflow_core::push::{PushSubscription, PushSummary, SubscriberScope};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for unsubscribe endpoints.
#[derive(Debug, Deserialize)]
pub struct UnsubscribeRequest {
    pub endpoint: String,
}

/// Response body for subscribe/unsubscribe.
#[derive(Debug, Serialize)]
pub struct SubscriptionChange {
    pub endpoint: String,
    pub changed: bool,
}

// ---------------------------------------------------------------------------
// Project scope
// ---------------------------------------------------------------------------

/// POST /api/v1/projects/{id}/push/subscribe
pub async fn subscribe_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(subscription): Json<PushSubscription>,
) -> AppResult<(StatusCode, Json<DataResponse<SubscriptionChange>>)> {
    state.engine.projects.get(&project_id).await?;
    subscribe(&state, SubscriberScope::Project(project_id), subscription).await
}

/// POST /api/v1/projects/{id}/push/unsubscribe
pub async fn unsubscribe_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(input): Json<UnsubscribeRequest>,
) -> AppResult<Json<DataResponse<SubscriptionChange>>> {
    unsubscribe(&state, SubscriberScope::Project(project_id), input.endpoint).await
}

/// GET /api/v1/projects/{id}/push/subscriptions
pub async fn list_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<PushSubscription>>>> {
    let subscriptions = state
        .engine
        .registry
        .list(&SubscriberScope::Project(project_id))
        .await?;
    Ok(Json(DataResponse::new(subscriptions)))
}

/// POST /api/v1/projects/{id}/push/test
pub async fn test_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> AppResult<Json<DataResponse<PushSummary>>> {
    state.engine.projects.get(&project_id).await?;
    test_send(&state, SubscriberScope::Project(project_id)).await
}

// ---------------------------------------------------------------------------
// Developer scope
// ---------------------------------------------------------------------------

/// POST /api/v1/push/developer/subscribe
pub async fn subscribe_developer(
    State(state): State<AppState>,
    Json(subscription): Json<PushSubscription>,
) -> AppResult<(StatusCode, Json<DataResponse<SubscriptionChange>>)> {
    subscribe(&state, SubscriberScope::Developer, subscription).await
}

/// POST /api/v1/push/developer/unsubscribe
pub async fn unsubscribe_developer(
    State(state): State<AppState>,
    Json(input): Json<UnsubscribeRequest>,
) -> AppResult<Json<DataResponse<SubscriptionChange>>> {
    unsubscribe(&state, SubscriberScope::Developer, input.endpoint).await
}

/// GET /api/v1/push/developer/subscriptions
pub async fn list_developer(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<PushSubscription>>>> {
    let subscriptions = state.engine.registry.list(&SubscriberScope::Developer).await?;
    Ok(Json(DataResponse::new(subscriptions)))
}

/// POST /api/v1/push/developer/test
pub async fn test_developer(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<PushSummary>>> {
    test_send(&state, SubscriberScope::Developer).await
}

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

async fn subscribe(
    state: &AppState,
    scope: SubscriberScope,
    subscription: PushSubscription,
) -> AppResult<(StatusCode, Json<DataResponse<SubscriptionChange>>)> {
    let endpoint = subscription.endpoint.clone();
    let created = state.engine.registry.subscribe(&scope, subscription).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(DataResponse::new(SubscriptionChange {
            endpoint,
            changed: created,
        })),
    ))
}

async fn unsubscribe(
    state: &AppState,
    scope: SubscriberScope,
    endpoint: String,
) -> AppResult<Json<DataResponse<SubscriptionChange>>> {
    let removed = state.engine.registry.unsubscribe(&scope, &endpoint).await?;
    Ok(Json(DataResponse::new(SubscriptionChange {
        endpoint,
        changed: removed,
    })))
}

async fn test_send(
    state: &AppState,
    scope: SubscriberScope,
) -> AppResult<Json<DataResponse<PushSummary>>> {
    let payload = json!({
        "type": "test",
        "title": "Test notification",
        "body": "Push notifications are working.",
        "requireInteraction": false,
        "timestamp": chrono::Utc::now(),
    });
    let summary = state.engine.registry.send(&scope, &payload).await?;
    tracing::info!(%scope, sent = summary.sent, total = summary.total, "Test push sent");
    Ok(Json(DataResponse::new(summary)))
}
