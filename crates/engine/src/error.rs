use studioflow_core::error::CoreError;
use studioflow_db::StoreError;

/// Failure of a lifecycle operation.
///
/// Notification delivery never produces one of these; only the business
/// mutation and its storage can fail the caller.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<validator::ValidationErrors> for EngineError {
    fn from(errors: validator::ValidationErrors) -> Self {
        EngineError::Core(CoreError::Validation(errors.to_string()))
    }
}
