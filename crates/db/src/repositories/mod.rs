//! Typed repositories over the key/value store.
//!
//! Each repository is a zero-sized struct whose associated functions take the
//! store as their first argument.

pub mod email_log_repo;
pub mod project_repo;
pub mod push_subscription_repo;
pub mod receipt_repo;

pub use email_log_repo::EmailLogRepo;
pub use project_repo::ProjectRepo;
pub use push_subscription_repo::PushSubscriptionRepo;
pub use receipt_repo::ReceiptRepo;
