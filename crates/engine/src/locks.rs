//! Per-project mutual exclusion for read-modify-write cycles.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per project id, created on first use.
///
/// The store has no compare-and-swap, so every project mutation holds the
/// project's guard from load to write. This only covers one process; writers
/// in other processes still race last-writer-wins.
#[derive(Debug, Default)]
pub struct ProjectLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ProjectLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, project_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(locks.entry(project_id.to_string()).or_default())
        };
        lock.lock_owned().await
    }
}
