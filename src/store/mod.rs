//! Persistence of tracked repositories
//!
//! - [`sqlite`]: SQLite-backed store with schema migrations

pub mod sqlite;

#[cfg(test)]
use mockall::automock;
use thiserror::Error;

use crate::repository::Category;

pub use sqlite::SqliteStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database lock poisoned")]
    LockPoisoned,

    #[error("Unknown category {0:?} stored for {1}")]
    UnknownCategory(String, String),
}

/// Persisted state of one tracked repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRepository {
    pub full_name: String,
    pub category: Category,
    pub version_local: Option<String>,
    pub pending_restart: bool,
    pub first_install: bool,
}

impl StoredRepository {
    pub fn new(full_name: &str, category: Category) -> Self {
        Self {
            full_name: full_name.to_string(),
            category,
            version_local: None,
            pending_restart: false,
            first_install: true,
        }
    }
}

/// Key-value store of tracked repositories keyed by lower-cased `full_name`
#[cfg_attr(test, automock)]
pub trait RepositoryStore: Send + Sync + 'static {
    /// All tracked repositories, in insertion order
    fn list_repositories(&self) -> Result<Vec<StoredRepository>, StoreError>;

    fn get_repository(&self, full_name: &str) -> Result<Option<StoredRepository>, StoreError>;

    /// Insert or replace the stored state of a repository
    fn save_repository(&self, repository: &StoredRepository) -> Result<(), StoreError>;

    /// Returns true if the repository was tracked
    fn remove_repository(&self, full_name: &str) -> Result<bool, StoreError>;
}
