//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values.

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use studioflow_api::error::AppError;
use studioflow_core::error::CoreError;
use studioflow_db::StoreError;
use studioflow_engine::EngineError;
use studioflow_events::RegistryError;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::not_found("Project", "A1B2C3D4"));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Project with id A1B2C3D4 not found");
}

#[tokio::test]
async fn budget_exhausted_includes_usage() {
    let err = AppError::Core(CoreError::BudgetExhausted { used: 5, total: 5 });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "BUDGET_EXHAUSTED");
    assert_eq!(json["revisions_used"], 5);
    assert_eq!(json["revisions_total"], 5);
}

#[tokio::test]
async fn invalid_transition_returns_409() {
    let err = AppError::Core(CoreError::InvalidTransition(
        "Cannot move from onboarding to live".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "INVALID_TRANSITION");
}

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("text must not be empty".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "text must not be empty");
}

#[tokio::test]
async fn internal_error_is_sanitized() {
    let err = AppError::InternalError("connection string leaked".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[test]
fn engine_and_registry_errors_keep_their_kind() {
    let err = AppError::from(EngineError::Core(CoreError::Conflict("already live".into())));
    assert_matches!(err, AppError::Core(CoreError::Conflict(msg)) if msg == "already live");

    let err = AppError::from(RegistryError::Invalid(CoreError::Validation(
        "endpoint must be https".into(),
    )));
    assert_matches!(err, AppError::Core(CoreError::Validation(_)));

    let broken = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err = AppError::from(RegistryError::Store(StoreError::Serialization(broken)));
    assert_matches!(err, AppError::Store(StoreError::Serialization(_)));
}
