//! Project lifecycle operations.
//!
//! Every mutation follows the same shape: take the project's lock, load,
//! apply the domain rule from `studioflow-core`, persist, release, then hand
//! the resulting event to the [`NotificationDispatcher`]. Delivery outcomes
//! never change the result of the operation.

pub mod activity;
pub mod config;
pub mod context;
pub mod error;
pub mod ledger;
pub mod locks;
pub mod messages;
pub mod phase;
pub mod projects;

use std::sync::Arc;

use studioflow_db::SharedStore;
use studioflow_events::{
    ActivityBus, EmailAuditLog, NotificationDispatcher, PushSubscriptionRegistry,
    TransactionalEmailTransport, WebPushTransport,
};

pub use activity::ActivityFeedAggregator;
pub use config::EngineConfig;
pub use context::EngineContext;
pub use error::EngineError;
pub use ledger::ChangeRequestLedger;
pub use locks::ProjectLocks;
pub use messages::MessageService;
pub use phase::PhaseStateMachine;
pub use projects::ProjectService;

/// Every lifecycle service, wired to one store and one set of transports.
pub struct Engine {
    pub projects: ProjectService,
    pub phases: PhaseStateMachine,
    pub ledger: ChangeRequestLedger,
    pub messages: MessageService,
    pub activity: ActivityFeedAggregator,
    pub registry: Arc<PushSubscriptionRegistry>,
    pub audit: Arc<EmailAuditLog>,
    pub bus: Arc<ActivityBus>,
    pub store: SharedStore,
}

impl Engine {
    pub fn new(
        store: SharedStore,
        email: Arc<dyn TransactionalEmailTransport>,
        push: Arc<dyn WebPushTransport>,
        config: EngineConfig,
    ) -> Self {
        let registry = Arc::new(PushSubscriptionRegistry::new(Arc::clone(&store), push));
        let audit = Arc::new(EmailAuditLog::new(Arc::clone(&store)));
        let bus = Arc::new(ActivityBus::default());
        let dispatcher = Arc::new(NotificationDispatcher::new(
            Arc::clone(&registry),
            email,
            Arc::clone(&audit),
            Arc::clone(&bus),
            config.developer_email.clone(),
        ));

        let ctx = Arc::new(EngineContext {
            store: Arc::clone(&store),
            dispatcher,
            locks: ProjectLocks::new(),
            config,
        });

        Self {
            projects: ProjectService::new(Arc::clone(&ctx)),
            phases: PhaseStateMachine::new(Arc::clone(&ctx)),
            ledger: ChangeRequestLedger::new(Arc::clone(&ctx)),
            messages: MessageService::new(Arc::clone(&ctx)),
            activity: ActivityFeedAggregator::new(ctx),
            registry,
            audit,
            bus,
            store,
        }
    }
}
