//! Key naming for everything the engine stores.

use studioflow_core::push::SubscriberScope;

/// Set of every project id.
pub const PROJECTS_SET: &str = "projects";

/// The global email audit log (a JSON array, newest first).
pub const EMAIL_LOG_KEY: &str = "email_log";

pub fn project_key(project_id: &str) -> String {
    format!("project:{project_id}")
}

/// `push:{projectId}` for a customer, `push:developer` for the developer.
pub fn push_key(scope: &SubscriberScope) -> String {
    match scope {
        SubscriberScope::Project(project_id) => format!("push:{project_id}"),
        SubscriberScope::Developer => "push:developer".to_string(),
    }
}

/// Set of item keys the customer of a project marked read.
pub fn receipts_key(project_id: &str) -> String {
    format!("receipts:{project_id}")
}
