//! Change requests and the revision budget they draw from.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use studioflow_core::change_request::{
    listing_order, sort_for_listing, validate_request_text, ChangeRequest, ChangeRequestStatus,
    Priority, ProjectChangeRequest, StatusChange,
};
use studioflow_core::error::CoreError;
use studioflow_core::notification::{preview, EventKind};
use studioflow_core::types::generate_record_id;
use studioflow_db::repositories::ProjectRepo;
use studioflow_events::DispatchReport;

use crate::context::EngineContext;
use crate::error::EngineError;

/// Result of [`ChangeRequestLedger::submit`].
#[derive(Debug, Serialize)]
pub struct SubmittedChangeRequest {
    pub change_request: ChangeRequest,
    pub revisions_used: u32,
    pub revisions_total: u32,
    pub revisions_remaining: u32,
    #[serde(skip)]
    pub dispatch: DispatchReport,
}

pub struct ChangeRequestLedger {
    ctx: Arc<EngineContext>,
}

impl ChangeRequestLedger {
    pub fn new(ctx: Arc<EngineContext>) -> Self {
        Self { ctx }
    }

    /// Record a change request against the project's revision budget.
    ///
    /// Fails with `BudgetExhausted` once every revision is used, leaving the
    /// project untouched. On success the request is stored as `pending`,
    /// `revisions_used` is incremented, and the developer is notified once.
    pub async fn submit(
        &self,
        project_id: &str,
        text: &str,
        priority: Priority,
    ) -> Result<SubmittedChangeRequest, EngineError> {
        validate_request_text(text)?;

        let guard = self.ctx.locks.acquire(project_id).await;
        let mut project = self.ctx.load_project(project_id).await?;

        if !project.has_revision_budget() {
            tracing::info!(
                project_id,
                revisions_used = project.revisions_used,
                revisions_total = project.revisions_total,
                "Change request rejected, budget exhausted"
            );
            return Err(CoreError::BudgetExhausted {
                used: project.revisions_used,
                total: project.revisions_total,
            }
            .into());
        }

        let now = Utc::now();
        let change_request = ChangeRequest {
            id: generate_record_id(),
            created_at: now,
            request: text.trim().to_string(),
            priority,
            status: ChangeRequestStatus::Pending,
            response: None,
            completed_at: None,
        };
        project.change_requests.push(change_request.clone());
        project.revisions_used += 1;
        project.updated_at = now;
        self.ctx.save_project(&project).await?;
        drop(guard);

        tracing::info!(
            project_id,
            change_request_id = %change_request.id,
            priority = priority.as_str(),
            revisions_used = project.revisions_used,
            revisions_total = project.revisions_total,
            "Change request submitted"
        );

        let dispatch = self
            .ctx
            .notify(
                &project,
                EventKind::ChangeRequestCreated {
                    change_request_id: change_request.id.clone(),
                    priority,
                    preview: preview(&change_request.request),
                },
            )
            .await;

        Ok(SubmittedChangeRequest {
            change_request,
            revisions_used: project.revisions_used,
            revisions_total: project.revisions_total,
            revisions_remaining: project.revisions_remaining(),
            dispatch,
        })
    }

    /// Move a change request forward.
    ///
    /// Repeating the current status is a no-op; moving backwards fails with
    /// `InvalidTransition`. No notification is sent.
    pub async fn transition(
        &self,
        project_id: &str,
        change_request_id: &str,
        new_status: ChangeRequestStatus,
        response: Option<String>,
    ) -> Result<ChangeRequest, EngineError> {
        let _guard = self.ctx.locks.acquire(project_id).await;
        let mut project = self.ctx.load_project(project_id).await?;

        let now = Utc::now();
        let change_request = project
            .change_request_mut(change_request_id)
            .ok_or_else(|| CoreError::not_found("ChangeRequest", change_request_id))?;
        let from = change_request.status;
        let change = change_request.apply_status(new_status, response, now)?;
        let updated = change_request.clone();

        if change == StatusChange::Advanced {
            project.updated_at = now;
            self.ctx.save_project(&project).await?;
            tracing::info!(
                project_id,
                change_request_id,
                from = from.as_str(),
                to = new_status.as_str(),
                "Change request status updated"
            );
        }

        Ok(updated)
    }

    /// Change requests of one project in listing order.
    pub async fn list_for_project(&self, project_id: &str) -> Result<Vec<ChangeRequest>, EngineError> {
        let project = self.ctx.load_project(project_id).await?;
        let mut items = project.change_requests;
        items.sort_by(listing_order);
        Ok(items)
    }

    /// Change requests across every project, optionally of one status.
    pub async fn list_all(
        &self,
        filter_status: Option<ChangeRequestStatus>,
    ) -> Result<Vec<ProjectChangeRequest>, EngineError> {
        let items = ProjectRepo::list(self.ctx.store.as_ref())
            .await?
            .into_iter()
            .flat_map(|project| {
                let customer_name = project.customer.name;
                let project_id = project.id;
                project
                    .change_requests
                    .into_iter()
                    .map(move |change_request| ProjectChangeRequest {
                        project_id: project_id.clone(),
                        customer_name: customer_name.clone(),
                        change_request,
                    })
            })
            .collect();
        Ok(sort_for_listing(items, filter_status))
    }
}
