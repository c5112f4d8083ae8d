//! Chat between customer and developer.

use std::sync::Arc;

use chrono::Utc;
use studioflow_core::error::CoreError;
use studioflow_core::notification::{preview, EventKind};
use studioflow_core::project::{validate_message_text, Message, MessageSender, Project};
use studioflow_core::types::generate_record_id;

use crate::context::EngineContext;
use crate::error::EngineError;

pub struct MessageService {
    ctx: Arc<EngineContext>,
}

impl MessageService {
    pub fn new(ctx: Arc<EngineContext>) -> Self {
        Self { ctx }
    }

    /// Append a message and notify the other party.
    pub async fn send_message(
        &self,
        project_id: &str,
        from: MessageSender,
        text: &str,
    ) -> Result<Message, EngineError> {
        validate_message_text(text)?;

        let guard = self.ctx.locks.acquire(project_id).await;
        let mut project = self.ctx.load_project(project_id).await?;

        let now = Utc::now();
        let message = Message {
            id: generate_record_id(),
            from,
            text: text.trim().to_string(),
            created_at: now,
            read: false,
        };
        project.messages.push(message.clone());
        project.updated_at = now;
        self.ctx.save_project(&project).await?;
        drop(guard);

        tracing::info!(project_id, message_id = %message.id, ?from, "Message sent");

        self.ctx
            .notify(
                &project,
                EventKind::NewMessage {
                    from,
                    preview: preview(&message.text),
                },
            )
            .await;

        Ok(message)
    }

    /// Set `read` on one message. Marking an already-read message is a no-op.
    pub async fn mark_message_read(
        &self,
        project_id: &str,
        message_id: &str,
    ) -> Result<Message, EngineError> {
        let _guard = self.ctx.locks.acquire(project_id).await;
        let mut project = self.ctx.load_project(project_id).await?;

        let message = project
            .message_mut(message_id)
            .ok_or_else(|| CoreError::not_found("Message", message_id))?;
        if message.read {
            return Ok(message.clone());
        }
        message.read = true;
        let updated = message.clone();

        self.ctx.save_project(&project).await?;
        Ok(updated)
    }
}

/// Mark every unread message from `sender` read in `project`. Returns how
/// many changed. The caller persists.
pub(crate) fn mark_all_from(project: &mut Project, sender: MessageSender) -> usize {
    let mut changed = 0;
    for message in project
        .messages
        .iter_mut()
        .filter(|m| m.from == sender && !m.read)
    {
        message.read = true;
        changed += 1;
    }
    changed
}
