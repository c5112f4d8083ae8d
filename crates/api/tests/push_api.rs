//! Integration tests for push subscription endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_project, get, post_json};
use serde_json::{json, Value};
use studioflow_events::testing::RecordingPushTransport;

fn subscription(endpoint: &str) -> Value {
    json!({
        "endpoint": endpoint,
        "keys": { "p256dh": "BNcRdreALRFXTkOOUHK1EtK2wtaz5Ry4YfYCA", "auth": "tBHItJI5svbpez7KI4CCXg" },
    })
}

#[tokio::test]
async fn duplicate_subscribe_stores_one_subscription() {
    let test = common::build_test_app();
    let uri = "/api/v1/push/developer/subscribe";

    let response = post_json(test.app(), uri, subscription("https://push.example/dev")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json(test.app(), uri, subscription("https://push.example/dev")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["changed"], false);

    let response = get(test.app(), "/api/v1/push/developer/subscriptions").await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn non_http_endpoint_is_rejected() {
    let test = common::build_test_app();

    let response = post_json(
        test.app(),
        "/api/v1/push/developer/subscribe",
        subscription("ftp://push.example/dev"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn project_subscribe_requires_existing_project() {
    let test = common::build_test_app();

    let response = post_json(
        test.app(),
        "/api/v1/projects/NOPE0000/push/subscribe",
        subscription("https://push.example/c1"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_send_prunes_gone_endpoints() {
    let test = common::with_push(RecordingPushTransport::new().with_gone("https://push.example/E1"));
    let id = create_project(test.app(), 3).await;
    let base = format!("/api/v1/projects/{id}/push");

    for endpoint in ["https://push.example/E1", "https://push.example/E2"] {
        let response = post_json(test.app(), &format!("{base}/subscribe"), subscription(endpoint)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = post_json(test.app(), &format!("{base}/test"), json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"], json!({ "sent": 1, "total": 2, "pruned": 1 }));

    let response = get(test.app(), &format!("{base}/subscriptions")).await;
    let json = body_json(response).await;
    let remaining = json["data"].as_array().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["endpoint"], "https://push.example/E2");
}

#[tokio::test]
async fn unsubscribe_reports_whether_anything_was_removed() {
    let test = common::build_test_app();
    post_json(
        test.app(),
        "/api/v1/push/developer/subscribe",
        subscription("https://push.example/dev"),
    )
    .await;

    let body = json!({ "endpoint": "https://push.example/dev" });
    let response = post_json(test.app(), "/api/v1/push/developer/unsubscribe", body.clone()).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["changed"], true);

    let response = post_json(test.app(), "/api/v1/push/developer/unsubscribe", body).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["changed"], false);
}
