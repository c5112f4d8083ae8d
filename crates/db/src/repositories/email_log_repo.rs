//! Repository for the global email audit log (`email_log`).

use studioflow_core::bounded_log::BoundedLog;
use studioflow_core::email_log::{EmailLogEntry, EMAIL_LOG_CAPACITY};

use crate::error::StoreError;
use crate::keys::EMAIL_LOG_KEY;
use crate::store::{self, KeyValueStore};

pub struct EmailLogRepo;

impl EmailLogRepo {
    /// Load the stored log. Overflow from older writers is dropped.
    pub async fn load(store: &dyn KeyValueStore) -> Result<BoundedLog<EmailLogEntry>, StoreError> {
        match store.get(EMAIL_LOG_KEY).await? {
            Some(value) => BoundedLog::deserialize_with_capacity(value, EMAIL_LOG_CAPACITY)
                .map_err(|source| StoreError::Decode {
                    key: EMAIL_LOG_KEY.to_string(),
                    source,
                }),
            None => Ok(BoundedLog::new(EMAIL_LOG_CAPACITY)),
        }
    }

    pub async fn save(
        store: &dyn KeyValueStore,
        log: &BoundedLog<EmailLogEntry>,
    ) -> Result<(), StoreError> {
        store::save(store, EMAIL_LOG_KEY, log).await
    }
}
