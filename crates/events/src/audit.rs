//! Bounded audit log of notification email attempts.

use studioflow_core::email_log::{query_entries, EmailLogEntry};
use studioflow_db::repositories::EmailLogRepo;
use studioflow_db::{SharedStore, StoreError};
use tokio::sync::Mutex;

/// The global email audit log.
///
/// Appends load the stored log, push the entry to the front, truncate to the
/// capacity and write it back. They are serialized in-process so concurrent
/// dispatches cannot drop each other's entries.
pub struct EmailAuditLog {
    store: SharedStore,
    append_lock: Mutex<()>,
}

impl EmailAuditLog {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            append_lock: Mutex::new(()),
        }
    }

    pub async fn append(&self, entry: EmailLogEntry) -> Result<(), StoreError> {
        let _guard = self.append_lock.lock().await;
        let mut log = EmailLogRepo::load(self.store.as_ref()).await?;
        log.push(entry);
        EmailLogRepo::save(self.store.as_ref(), &log).await
    }

    /// Newest-first entries, optionally for one project, capped at `limit`
    /// (and never more than the log's capacity).
    pub async fn query(
        &self,
        project_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<EmailLogEntry>, StoreError> {
        let log = EmailLogRepo::load(self.store.as_ref()).await?;
        Ok(query_entries(log.iter(), project_id, limit))
    }
}
