pub mod activity;
pub mod change_requests;
pub mod email_log;
pub mod messages;
pub mod projects;
pub mod push;
