use thiserror::Error;

use crate::error::HacsError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Task {0} is already registered")]
    DuplicateSlug(String),

    #[error("Task {0} timed out")]
    Timeout(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Repository(#[from] HacsError),

    #[error("Task failed: {0}")]
    Failed(String),
}
