//! Developer and customer activity feeds, and their read state.

use std::sync::Arc;

use chrono::Utc;
use studioflow_core::activity::{
    customer_feed, developer_feed, parse_item_key, unread_keys, ActivityFilter, ActivityItem,
    ItemRef, NotificationReceipt,
};
use studioflow_core::error::CoreError;
use studioflow_core::notification::Audience;
use studioflow_core::project::MessageSender;
use studioflow_db::repositories::{ProjectRepo, ReceiptRepo};

use crate::context::EngineContext;
use crate::error::EngineError;
use crate::messages::{mark_all_from, MessageService};

pub struct ActivityFeedAggregator {
    ctx: Arc<EngineContext>,
    messages: MessageService,
}

impl ActivityFeedAggregator {
    pub fn new(ctx: Arc<EngineContext>) -> Self {
        Self {
            messages: MessageService::new(Arc::clone(&ctx)),
            ctx,
        }
    }

    /// Unread client messages and open change requests across all projects.
    pub async fn developer_feed(
        &self,
        filter: ActivityFilter,
        unread_only: bool,
    ) -> Result<Vec<ActivityItem>, EngineError> {
        let projects = ProjectRepo::list(self.ctx.store.as_ref()).await?;
        Ok(developer_feed(&projects, filter, unread_only))
    }

    /// Status-derived items, developer messages, and answered change requests
    /// of one project.
    pub async fn customer_feed(
        &self,
        project_id: &str,
        unread_only: bool,
    ) -> Result<Vec<ActivityItem>, EngineError> {
        let project = self.ctx.load_project(project_id).await?;
        let receipts = ReceiptRepo::item_keys(self.ctx.store.as_ref(), project_id).await?;
        Ok(customer_feed(&project, &receipts, unread_only))
    }

    /// Mark one feed item read.
    ///
    /// Message items flip `Message.read`; status-derived and completed items
    /// get a [`NotificationReceipt`]. Change request items are rejected: they
    /// stay unread while pending. Returns the receipt for derived items.
    pub async fn mark_item_read(
        &self,
        project_id: &str,
        item_key: &str,
    ) -> Result<Option<NotificationReceipt>, EngineError> {
        match parse_item_key(item_key)? {
            ItemRef::Message(message_id) => {
                self.messages.mark_message_read(project_id, &message_id).await?;
                Ok(None)
            }
            ItemRef::ChangeRequest(_) => Err(CoreError::Validation(format!(
                "Change request item '{item_key}' is read once its status leaves pending"
            ))
            .into()),
            ItemRef::Derived(key) => {
                // Only receipts for existing projects.
                self.ctx.load_project(project_id).await?;
                let added = ReceiptRepo::add(self.ctx.store.as_ref(), project_id, &key).await?;
                tracing::debug!(project_id, item_key = %key, added, "Activity item marked read");
                Ok(Some(NotificationReceipt {
                    project_id: project_id.to_string(),
                    item_key: key,
                    read_at: Utc::now(),
                }))
            }
        }
    }

    /// Mark everything unread in `viewer`'s feed of this project read.
    /// Returns the number of items that changed.
    pub async fn mark_all_read(&self, project_id: &str, viewer: Audience) -> Result<usize, EngineError> {
        match viewer {
            Audience::Developer => {
                self.mark_messages_from(project_id, MessageSender::Client).await
            }
            Audience::Customer => {
                let unread = unread_keys(&self.customer_feed(project_id, true).await?);
                let mut changed = self
                    .mark_messages_from(project_id, MessageSender::Developer)
                    .await?;
                for key in unread {
                    if let ItemRef::Derived(key) = parse_item_key(&key)? {
                        if ReceiptRepo::add(self.ctx.store.as_ref(), project_id, &key).await? {
                            changed += 1;
                        }
                    }
                }
                tracing::info!(project_id, changed, "Customer feed marked read");
                Ok(changed)
            }
        }
    }

    async fn mark_messages_from(
        &self,
        project_id: &str,
        sender: MessageSender,
    ) -> Result<usize, EngineError> {
        let _guard = self.ctx.locks.acquire(project_id).await;
        let mut project = self.ctx.load_project(project_id).await?;
        let changed = mark_all_from(&mut project, sender);
        if changed > 0 {
            self.ctx.save_project(&project).await?;
        }
        Ok(changed)
    }
}
