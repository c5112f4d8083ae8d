//! Integration tests for change request submission and status updates.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_project, get, patch_json, post_json};
use serde_json::json;

#[tokio::test]
async fn submit_consumes_budget_until_exhausted() {
    let test = common::build_test_app();
    let id = create_project(test.app(), 1).await;
    let uri = format!("/api/v1/projects/{id}/change-requests");

    let response = post_json(
        test.app(),
        &uri,
        json!({ "request": "Swap the hero image", "priority": "urgent" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["revisions_used"], 1);
    assert_eq!(json["data"]["revisions_total"], 1);
    assert_eq!(json["data"]["revisions_remaining"], 0);
    assert_eq!(json["data"]["change_request"]["status"], "pending");
    assert!(json["data"].get("dispatch").is_none());

    let response = post_json(test.app(), &uri, json!({ "request": "One more thing" })).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BUDGET_EXHAUSTED");
    assert_eq!(json["revisions_used"], 1);
    assert_eq!(json["revisions_total"], 1);

    let response = get(test.app(), &uri).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn status_moves_forward_only() {
    let test = common::build_test_app();
    let id = create_project(test.app(), 3).await;

    let response = post_json(
        test.app(),
        &format!("/api/v1/projects/{id}/change-requests"),
        json!({ "request": "Change the footer colour" }),
    )
    .await;
    let json = body_json(response).await;
    let cr_id = json["data"]["change_request"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let uri = format!("/api/v1/projects/{id}/change-requests/{cr_id}");

    let response = patch_json(
        test.app(),
        &uri,
        json!({ "status": "completed", "response": "Done, footer is now navy." }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "completed");
    assert!(json["data"]["completed_at"].is_string());

    let response = patch_json(test.app(), &uri, json!({ "status": "in_progress" })).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_TRANSITION");
}

#[tokio::test]
async fn unknown_change_request_returns_404() {
    let test = common::build_test_app();
    let id = create_project(test.app(), 3).await;

    let response = patch_json(
        test.app(),
        &format!("/api/v1/projects/{id}/change-requests/missing"),
        json!({ "status": "in_progress" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn global_listing_filters_by_status() {
    let test = common::build_test_app();
    let first = create_project(test.app(), 3).await;
    let second = create_project(test.app(), 3).await;

    for id in [&first, &second] {
        let response = post_json(
            test.app(),
            &format!("/api/v1/projects/{id}/change-requests"),
            json!({ "request": "Tighten the spacing" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get(test.app(), "/api/v1/change-requests?status=pending").await;
    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["customer_name"], "Jane Doe");

    let response = get(test.app(), "/api/v1/change-requests?status=completed").await;
    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}
