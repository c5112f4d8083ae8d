//! Route definitions for the `/projects` resource.
//!
//! Messages, change requests, push subscriptions, and the customer feed are
//! nested under `/projects/{id}/...`.

use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::handlers::{activity, change_requests, messages, projects, push};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                        -> list
/// POST   /                                        -> create
/// GET    /{id}                                    -> get_by_id
/// POST   /{id}/phase                              -> advance_phase
/// GET    /{id}/deadlines                          -> deadlines
/// PUT    /{id}/links                              -> publish_links
///
/// POST   /{id}/messages                           -> messages::send
/// POST   /{id}/messages/{message_id}/read         -> messages::mark_read
///
/// GET    /{id}/change-requests                    -> list_by_project
/// POST   /{id}/change-requests                    -> submit
/// PATCH  /{id}/change-requests/{cr_id}            -> transition
///
/// POST   /{id}/push/subscribe                     -> subscribe_project
/// POST   /{id}/push/unsubscribe                   -> unsubscribe_project
/// GET    /{id}/push/subscriptions                 -> list_project
/// POST   /{id}/push/test                          -> test_project
///
/// GET    /{id}/activity                           -> customer_feed
/// POST   /{id}/activity/read                      -> mark_read
/// POST   /{id}/activity/read-all                  -> mark_all_read
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route("/{id}", get(projects::get_by_id))
        .route("/{id}/phase", post(projects::advance_phase))
        .route("/{id}/deadlines", get(projects::deadlines))
        .route("/{id}/links", put(projects::publish_links))
        .route("/{id}/messages", post(messages::send))
        .route(
            "/{id}/messages/{message_id}/read",
            post(messages::mark_read),
        )
        .route(
            "/{id}/change-requests",
            get(change_requests::list_by_project).post(change_requests::submit),
        )
        .route(
            "/{id}/change-requests/{cr_id}",
            patch(change_requests::transition),
        )
        .route("/{id}/push/subscribe", post(push::subscribe_project))
        .route("/{id}/push/unsubscribe", post(push::unsubscribe_project))
        .route("/{id}/push/subscriptions", get(push::list_project))
        .route("/{id}/push/test", post(push::test_project))
        .route("/{id}/activity", get(activity::customer_feed))
        .route("/{id}/activity/read", post(activity::mark_read))
        .route("/{id}/activity/read-all", post(activity::mark_all_read))
}
