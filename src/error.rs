//! Domain-fatal errors
//!
//! A `HacsError` aborts the pass of the repository it was raised for and
//! nothing else. Recoverable rule failures live in
//! [`crate::validate::ValidationException`].

use thiserror::Error;

use crate::source::FetchError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum HacsError {
    #[error("Repository structure for {git_ref} is not compliant")]
    NonCompliant { git_ref: String },

    #[error("Repository structure for {git_ref} is ambiguous: {candidates:?}")]
    AmbiguousContent {
        git_ref: String,
        candidates: Vec<String>,
    },

    /// Failure surfaced as a hard stop in action mode
    #[error("::error:: {0}")]
    Action(String),

    #[error("Repository {0} is no longer tracked")]
    Removed(String),

    #[error("Repository pass for {0} timed out")]
    Timeout(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Host runtime error: {0}")]
    Host(String),
}
