//! Phase transitions of a project.

use std::sync::Arc;

use chrono::Utc;
use studioflow_core::notification::EventKind;
use studioflow_core::package::{derive_deadlines, ProjectDeadlines};
use studioflow_core::phase::{validate_transition, Phase};
use studioflow_core::project::Project;
use studioflow_events::DispatchReport;

use crate::context::EngineContext;
use crate::error::EngineError;

/// Result of [`PhaseStateMachine::advance`].
#[derive(Debug)]
pub struct PhaseAdvance {
    pub project: Project,
    pub from: Phase,
    /// `None` when the project already was in the target phase.
    pub dispatch: Option<DispatchReport>,
}

impl PhaseAdvance {
    pub fn changed(&self) -> bool {
        self.dispatch.is_some()
    }
}

pub struct PhaseStateMachine {
    ctx: Arc<EngineContext>,
}

impl PhaseStateMachine {
    pub fn new(ctx: Arc<EngineContext>) -> Self {
        Self { ctx }
    }

    /// Move a project to `target`.
    ///
    /// Only moves in the transition table succeed; moves into `revisie`
    /// additionally need revision budget. A rejected move writes nothing and
    /// notifies nobody. Advancing to the current phase succeeds without a
    /// write or an event. A successful move emits exactly one `PhaseChange`.
    pub async fn advance(&self, project_id: &str, target: Phase) -> Result<PhaseAdvance, EngineError> {
        let guard = self.ctx.locks.acquire(project_id).await;
        let mut project = self.ctx.load_project(project_id).await?;
        let from = project.phase;

        if from == target {
            return Ok(PhaseAdvance {
                project,
                from,
                dispatch: None,
            });
        }

        validate_transition(from, target, project.revisions_used, project.revisions_total)?;

        project.phase = target;
        project.updated_at = Utc::now();
        self.ctx.save_project(&project).await?;
        drop(guard);

        tracing::info!(project_id, from = %from, to = %target, "Project phase advanced");

        let report = self
            .ctx
            .notify(&project, EventKind::PhaseChange { from, to: target })
            .await;

        Ok(PhaseAdvance {
            project,
            from,
            dispatch: Some(report),
        })
    }

    /// Target date per phase, counted in business days from creation.
    pub async fn deadlines(&self, project_id: &str) -> Result<ProjectDeadlines, EngineError> {
        let project = self.ctx.load_project(project_id).await?;
        Ok(derive_deadlines(&project, Utc::now()))
    }
}
