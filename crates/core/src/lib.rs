//! Domain types and pure rules for the project lifecycle.
//!
//! Nothing in this crate performs I/O. Storage lives in `studioflow-db`,
//! delivery in `studioflow-events`, orchestration in `studioflow-engine`.

pub mod activity;
pub mod bounded_log;
pub mod calendar;
pub mod change_request;
pub mod email_log;
pub mod error;
pub mod notification;
pub mod package;
pub mod phase;
pub mod project;
pub mod push;
pub mod types;
