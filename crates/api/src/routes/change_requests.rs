//! Route definitions for the cross-project `/change-requests` listing.

use axum::routing::get;
use axum::Router;

use crate::handlers::change_requests;
use crate::state::AppState;

/// Routes mounted at `/change-requests`.
///
/// ```text
/// GET    /?status=                                -> list_all
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(change_requests::list_all))
}
