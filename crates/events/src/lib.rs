//! Notification fan-out.
//!
//! - [`ActivityBus`]: in-process publish/subscribe hub feeding live
//!   dashboards, backed by `tokio::sync::broadcast`.
//! - [`delivery`]: outbound transports (transactional email, web push).
//! - [`PushSubscriptionRegistry`]: per-scope push subscription sets with
//!   pruning of dead endpoints.
//! - [`EmailAuditLog`]: bounded record of every email attempt.
//! - [`NotificationDispatcher`]: runs the three channels for one event.

pub mod audit;
pub mod bus;
pub mod delivery;
pub mod dispatcher;
pub mod registry;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use audit::EmailAuditLog;
pub use bus::ActivityBus;
pub use delivery::email::{
    EmailConfig, EmailOutcome, SmtpEmailTransport, TransactionalEmailTransport,
    UnconfiguredEmailTransport,
};
pub use delivery::push::{HttpPushTransport, PushConfig, PushError, WebPushTransport};
pub use dispatcher::{DispatchReport, NotificationDispatcher};
pub use registry::{PushSubscriptionRegistry, RegistryError};
