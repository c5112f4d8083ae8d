//! Route definitions for developer push subscriptions.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::push;
use crate::state::AppState;

/// Routes mounted at `/push/developer`.
///
/// ```text
/// POST   /subscribe                               -> subscribe_developer
/// POST   /unsubscribe                             -> unsubscribe_developer
/// GET    /subscriptions                           -> list_developer
/// POST   /test                                    -> test_developer
/// ```
pub fn developer_router() -> Router<AppState> {
    Router::new()
        .route("/subscribe", post(push::subscribe_developer))
        .route("/unsubscribe", post(push::unsubscribe_developer))
        .route("/subscriptions", get(push::list_developer))
        .route("/test", post(push::test_developer))
}
