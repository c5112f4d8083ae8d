mod common;

use assert_matches::assert_matches;
use studioflow_core::activity::{ActivityFilter, ActivityType};
use studioflow_core::change_request::{ChangeRequestStatus, Priority};
use studioflow_core::error::CoreError;
use studioflow_core::notification::Audience;
use studioflow_core::phase::Phase;
use studioflow_core::project::{MessageSender, UpdateLinks};
use studioflow_engine::EngineError;

use common::{seed_project, test_engine};

#[tokio::test]
async fn developer_feed_tracks_client_messages_and_open_requests() {
    let t = test_engine();
    let project = seed_project(&t.engine, Phase::Feedback, 0, 5).await;

    let message = t
        .engine
        .messages
        .send_message(&project.id, MessageSender::Client, "Can we use blue?")
        .await
        .unwrap();
    t.engine
        .ledger
        .submit(&project.id, "Blue header", Priority::Urgent)
        .await
        .unwrap();

    let feed = t.engine.activity.developer_feed(ActivityFilter::All, false).await.unwrap();
    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0].kind, ActivityType::ChangeRequest);
    assert_eq!(feed[0].priority, Some(Priority::Urgent));

    t.engine
        .activity
        .mark_item_read(&project.id, &format!("message:{}", message.id))
        .await
        .unwrap();

    let unread = t.engine.activity.developer_feed(ActivityFilter::Message, true).await.unwrap();
    assert!(unread.is_empty());
}

#[tokio::test]
async fn customer_design_ready_item_stays_read_after_receipt() {
    let t = test_engine();
    let project = seed_project(&t.engine, Phase::Design, 0, 5).await;
    t.engine
        .projects
        .publish_links(
            &project.id,
            UpdateLinks {
                design_preview_url: Some("https://preview.example/v1".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    t.engine.phases.advance(&project.id, Phase::Feedback).await.unwrap();

    let feed = t.engine.activity.customer_feed(&project.id, false).await.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].kind, ActivityType::DesignReady);
    assert!(!feed[0].read);

    let receipt = t
        .engine
        .activity
        .mark_item_read(&project.id, &feed[0].key)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(receipt.item_key, feed[0].key);

    assert!(t.engine.activity.customer_feed(&project.id, true).await.unwrap().is_empty());

    // A new preview link is a new fact and surfaces again.
    t.engine
        .projects
        .publish_links(
            &project.id,
            UpdateLinks {
                design_preview_url: Some("https://preview.example/v2".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(t.engine.activity.customer_feed(&project.id, true).await.unwrap().len(), 1);
}

#[tokio::test]
async fn customer_mark_all_read_covers_messages_and_derived_items() {
    let t = test_engine();
    let project = seed_project(&t.engine, Phase::Feedback, 0, 5).await;
    let cr = t
        .engine
        .ledger
        .submit(&project.id, "Fix typo", Priority::Low)
        .await
        .unwrap()
        .change_request;
    t.engine
        .ledger
        .transition(&project.id, &cr.id, ChangeRequestStatus::Completed, Some("Fixed".into()))
        .await
        .unwrap();
    t.engine
        .messages
        .send_message(&project.id, MessageSender::Developer, "Typo fixed")
        .await
        .unwrap();

    let unread = t.engine.activity.customer_feed(&project.id, true).await.unwrap();
    assert_eq!(unread.len(), 2);

    let changed = t
        .engine
        .activity
        .mark_all_read(&project.id, Audience::Customer)
        .await
        .unwrap();
    assert_eq!(changed, 2);
    assert!(t.engine.activity.customer_feed(&project.id, true).await.unwrap().is_empty());
    assert_eq!(
        t.engine
            .activity
            .mark_all_read(&project.id, Audience::Customer)
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn developer_mark_all_read_clears_client_messages() {
    let t = test_engine();
    let project = seed_project(&t.engine, Phase::Design, 0, 5).await;
    for text in ["one", "two"] {
        t.engine
            .messages
            .send_message(&project.id, MessageSender::Client, text)
            .await
            .unwrap();
    }

    let changed = t
        .engine
        .activity
        .mark_all_read(&project.id, Audience::Developer)
        .await
        .unwrap();
    assert_eq!(changed, 2);
    assert!(t
        .engine
        .activity
        .developer_feed(ActivityFilter::All, true)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn malformed_item_key_is_rejected() {
    let t = test_engine();
    let project = seed_project(&t.engine, Phase::Design, 0, 5).await;
    let err = t
        .engine
        .activity
        .mark_item_read(&project.id, "whatever")
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Validation(_)));
}

#[tokio::test]
async fn change_request_items_are_read_by_status_not_receipts() {
    let t = test_engine();
    let project = seed_project(&t.engine, Phase::Feedback, 0, 5).await;
    let submitted = t
        .engine
        .ledger
        .submit(&project.id, "Swap the hero image", Priority::Normal)
        .await
        .unwrap();

    let feed = t.engine.activity.developer_feed(ActivityFilter::ChangeRequest, true).await.unwrap();
    assert_eq!(feed.len(), 1);
    let err = t
        .engine
        .activity
        .mark_item_read(&project.id, &feed[0].key)
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Validation(_)));

    t.engine
        .ledger
        .transition(
            &project.id,
            &submitted.change_request.id,
            ChangeRequestStatus::InProgress,
            None,
        )
        .await
        .unwrap();
    let unread = t.engine.activity.developer_feed(ActivityFilter::ChangeRequest, true).await.unwrap();
    assert!(unread.is_empty());
}
