//! Project creation, lookup, and deliverable links.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use studioflow_core::error::CoreError;
use studioflow_core::notification::EventKind;
use studioflow_core::project::{CreateProject, Project, UpdateLinks};
use studioflow_core::types::generate_project_id;
use studioflow_db::repositories::ProjectRepo;
use validator::Validate;

use crate::context::EngineContext;
use crate::error::EngineError;

/// Attempts at drawing an unused project id before giving up.
const MAX_ID_ATTEMPTS: usize = 5;

/// Result of [`ProjectService::publish_links`].
#[derive(Debug, Serialize)]
pub struct PublishedLinks {
    pub project: Project,
    /// Type names of the events dispatched, in order.
    pub events: Vec<&'static str>,
}

pub struct ProjectService {
    ctx: Arc<EngineContext>,
}

impl ProjectService {
    pub fn new(ctx: Arc<EngineContext>) -> Self {
        Self { ctx }
    }

    /// Create a project in `onboarding` and add it to the project index.
    pub async fn create(&self, input: CreateProject) -> Result<Project, EngineError> {
        input.validate()?;

        let id = self.unused_project_id().await?;
        let project = Project::new(
            id,
            input,
            self.ctx.config.default_revisions_total,
            Utc::now(),
        );
        ProjectRepo::insert(self.ctx.store.as_ref(), &project).await?;

        tracing::info!(
            project_id = %project.id,
            package_type = ?project.package_type,
            revisions_total = project.revisions_total,
            "Project created"
        );
        Ok(project)
    }

    pub async fn get(&self, project_id: &str) -> Result<Project, EngineError> {
        self.ctx.load_project(project_id).await
    }

    /// Every project, newest first.
    pub async fn list(&self) -> Result<Vec<Project>, EngineError> {
        Ok(ProjectRepo::list(self.ctx.store.as_ref()).await?)
    }

    /// Store deliverable links and announce each one that is new or changed.
    ///
    /// Unset fields leave the stored link alone. Re-publishing an identical
    /// link is silent.
    pub async fn publish_links(
        &self,
        project_id: &str,
        links: UpdateLinks,
    ) -> Result<PublishedLinks, EngineError> {
        links.validate()?;

        let guard = self.ctx.locks.acquire(project_id).await;
        let mut project = self.ctx.load_project(project_id).await?;

        let mut events = Vec::new();
        if let Some(url) = changed(&mut project.design_preview_url, links.design_preview_url) {
            events.push(EventKind::DesignReady { preview_url: url });
        }
        if let Some(url) = changed(&mut project.payment_url, links.payment_url) {
            events.push(EventKind::PaymentRequired { payment_url: url });
        }
        if let Some(url) = changed(&mut project.live_url, links.live_url) {
            events.push(EventKind::WebsiteLive { live_url: url });
        }

        if !events.is_empty() {
            project.updated_at = Utc::now();
            self.ctx.save_project(&project).await?;
        }
        drop(guard);

        let mut dispatched = Vec::with_capacity(events.len());
        for kind in events {
            let type_name = kind.type_name();
            tracing::info!(project_id, event_type = type_name, "Deliverable link published");
            self.ctx.notify(&project, kind).await;
            dispatched.push(type_name);
        }

        Ok(PublishedLinks {
            project,
            events: dispatched,
        })
    }

    async fn unused_project_id(&self) -> Result<String, EngineError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = generate_project_id();
            if ProjectRepo::find_by_id(self.ctx.store.as_ref(), &id)
                .await?
                .is_none()
            {
                return Ok(id);
            }
        }
        Err(CoreError::Internal("Could not allocate a unique project id".to_string()).into())
    }
}

/// Replace `slot` with `new` if it differs, returning the new value.
fn changed(slot: &mut Option<String>, new: Option<String>) -> Option<String> {
    let new = new.map(|url| url.trim().to_string()).filter(|url| !url.is_empty())?;
    if slot.as_deref() == Some(new.as_str()) {
        return None;
    }
    *slot = Some(new.clone());
    Some(new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changed_detects_new_and_different_links() {
        let mut slot = None;
        assert_eq!(changed(&mut slot, Some("https://a".into())).as_deref(), Some("https://a"));
        assert_eq!(changed(&mut slot, Some("https://a".into())), None);
        assert_eq!(changed(&mut slot, None), None);
        assert_eq!(changed(&mut slot, Some("https://b".into())).as_deref(), Some("https://b"));
        assert_eq!(slot.as_deref(), Some("https://b"));
    }
}
