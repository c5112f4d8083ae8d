//! Route definitions for `/activity`.

use axum::routing::get;
use axum::Router;

use crate::handlers::activity;
use crate::state::AppState;

/// Routes mounted at `/activity`.
///
/// ```text
/// GET    /developer?filter=&unread_only=          -> developer_feed
/// GET    /stream?project_id=                      -> stream (SSE)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/developer", get(activity::developer_feed))
        .route("/stream", get(activity::stream))
}
