//! Shared query parameter types for API handlers.

use serde::Deserialize;
use studioflow_core::activity::ActivityFilter;
use studioflow_core::change_request::ChangeRequestStatus;

/// `?filter=&unread_only=` on activity feeds.
#[derive(Debug, Default, Deserialize)]
pub struct ActivityParams {
    #[serde(default)]
    pub filter: ActivityFilter,
    #[serde(default)]
    pub unread_only: bool,
}

/// `?status=` on change request listings.
#[derive(Debug, Deserialize)]
pub struct ChangeRequestListParams {
    pub status: Option<ChangeRequestStatus>,
}

/// `?project_id=&limit=` on the email log.
#[derive(Debug, Deserialize)]
pub struct EmailLogParams {
    pub project_id: Option<String>,
    pub limit: Option<usize>,
}

/// `?project_id=` on the live activity stream.
#[derive(Debug, Deserialize)]
pub struct StreamParams {
    pub project_id: Option<String>,
}
