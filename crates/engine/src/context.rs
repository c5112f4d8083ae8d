//! State shared by every lifecycle service.

use std::sync::Arc;

use studioflow_core::error::CoreError;
use studioflow_core::notification::{EventKind, NotificationEvent};
use studioflow_core::project::Project;
use studioflow_db::repositories::ProjectRepo;
use studioflow_db::SharedStore;
use studioflow_events::{DispatchReport, NotificationDispatcher};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::locks::ProjectLocks;

pub struct EngineContext {
    pub store: SharedStore,
    pub dispatcher: Arc<NotificationDispatcher>,
    pub locks: ProjectLocks,
    pub config: EngineConfig,
}

impl EngineContext {
    /// Load a project or fail with `NotFound`.
    pub async fn load_project(&self, project_id: &str) -> Result<Project, EngineError> {
        ProjectRepo::find_by_id(self.store.as_ref(), project_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Project", project_id).into())
    }

    pub async fn save_project(&self, project: &Project) -> Result<(), EngineError> {
        ProjectRepo::update(self.store.as_ref(), project).await?;
        Ok(())
    }

    /// Build and dispatch the event for `kind` on `project`.
    pub async fn notify(&self, project: &Project, kind: EventKind) -> DispatchReport {
        let event = NotificationEvent::new(kind, project.id.clone());
        self.dispatcher
            .dispatch(&event, &project.customer.email)
            .await
    }
}
