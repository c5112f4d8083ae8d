//! Integration tests for activity feeds and read state.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_project, get, post_json, put_json};
use serde_json::json;

#[tokio::test]
async fn client_message_shows_in_developer_feed_until_read() {
    let test = common::build_test_app();
    let id = create_project(test.app(), 3).await;
    post_json(
        test.app(),
        &format!("/api/v1/projects/{id}/messages"),
        json!({ "from": "client", "text": "Is the draft ready?" }),
    )
    .await;

    let response = get(test.app(), "/api/v1/activity/developer?unread_only=true").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["type"], "message");
    assert_eq!(items[0]["project_id"], id.as_str());

    let response = get(test.app(), "/api/v1/activity/developer?filter=change_request").await;
    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());

    let response = post_json(
        test.app(),
        &format!("/api/v1/projects/{id}/activity/read-all"),
        json!({ "viewer": "developer" }),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["marked"], 1);

    let response = get(test.app(), "/api/v1/activity/developer?unread_only=true").await;
    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn design_ready_item_is_read_through_a_receipt() {
    let test = common::build_test_app();
    let id = create_project(test.app(), 3).await;
    for phase in ["design", "feedback"] {
        let response = post_json(
            test.app(),
            &format!("/api/v1/projects/{id}/phase"),
            json!({ "phase": phase }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    put_json(
        test.app(),
        &format!("/api/v1/projects/{id}/links"),
        json!({ "design_preview_url": "https://preview.example/abc" }),
    )
    .await;

    let feed_uri = format!("/api/v1/projects/{id}/activity?unread_only=true");
    let response = get(test.app(), &feed_uri).await;
    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    let design = items
        .iter()
        .find(|item| item["type"] == "design_ready")
        .expect("design_ready item in customer feed");
    let key = design["key"].as_str().unwrap().to_string();
    assert!(key.starts_with("status:"));

    let response = post_json(
        test.app(),
        &format!("/api/v1/projects/{id}/activity/read"),
        json!({ "item_key": key }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["receipt"]["item_key"], key.as_str());

    let response = get(test.app(), &feed_uri).await;
    let json = body_json(response).await;
    assert!(json["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|item| item["key"] != key.as_str()));
}

#[tokio::test]
async fn malformed_item_key_is_rejected() {
    let test = common::build_test_app();
    let id = create_project(test.app(), 3).await;

    let response = post_json(
        test.app(),
        &format!("/api/v1/projects/{id}/activity/read"),
        json!({ "item_key": "bogus" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn customer_feed_of_unknown_project_is_404() {
    let test = common::build_test_app();

    let response = get(test.app(), "/api/v1/projects/NOPE0000/activity").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
