//! Outbound delivery transports.
//!
//! Both transports sit behind traits so the dispatcher can be exercised with
//! test doubles and so deployments without SMTP or push still run.

pub mod email;
pub mod push;
