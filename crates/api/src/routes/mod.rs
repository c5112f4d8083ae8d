pub mod activity;
pub mod change_requests;
pub mod email_log;
pub mod health;
pub mod projects;
pub mod push;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                                        list, create
/// /projects/{id}                                   get
/// /projects/{id}/phase                             advance phase (POST)
/// /projects/{id}/deadlines                         derived deadlines (GET)
/// /projects/{id}/links                             publish links (PUT)
/// /projects/{id}/messages                          send (POST)
/// /projects/{id}/messages/{message_id}/read        mark read (POST)
/// /projects/{id}/change-requests                   list, submit
/// /projects/{id}/change-requests/{cr_id}           transition (PATCH)
/// /projects/{id}/push/subscribe                    subscribe (POST)
/// /projects/{id}/push/unsubscribe                  unsubscribe (POST)
/// /projects/{id}/push/subscriptions                list (GET)
/// /projects/{id}/push/test                         test send (POST)
/// /projects/{id}/activity                          customer feed (GET)
/// /projects/{id}/activity/read                     mark item read (POST)
/// /projects/{id}/activity/read-all                 mark all read (POST)
///
/// /change-requests                                 list across projects (GET)
///
/// /push/developer/subscribe                        subscribe (POST)
/// /push/developer/unsubscribe                      unsubscribe (POST)
/// /push/developer/subscriptions                    list (GET)
/// /push/developer/test                             test send (POST)
///
/// /activity/developer                              developer feed (GET)
/// /activity/stream                                 live events (SSE)
///
/// /email-log                                       query, append
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Projects and everything scoped to one project.
        .nest("/projects", projects::router())
        // Change requests across all projects.
        .nest("/change-requests", change_requests::router())
        // Developer push devices.
        .nest("/push/developer", push::developer_router())
        // Developer feed and live stream.
        .nest("/activity", activity::router())
        // Email audit log.
        .nest("/email-log", email_log::router())
}
