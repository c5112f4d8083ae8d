//! Route definitions for `/email-log`.

use axum::routing::get;
use axum::Router;

use crate::handlers::email_log;
use crate::state::AppState;

/// Routes mounted at `/email-log`.
///
/// ```text
/// GET    /?project_id=&limit=                     -> query
/// POST   /                                        -> append
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(email_log::query).post(email_log::append))
}
