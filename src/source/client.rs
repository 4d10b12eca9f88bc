//! Source-hosting client trait for fetching repository snapshots

#[cfg(test)]
use mockall::automock;

use crate::source::error::FetchError;
use crate::source::types::{FileEntry, Release, RepoHandle};

/// Trait for fetching remote repository state from a source host
///
/// Implementations share one connection pool across all concurrent passes.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait SourceClient: Send + Sync {
    /// Fetches repository metadata
    ///
    /// # Arguments
    /// * `full_name` - `owner/name` of the repository
    async fn get_repository(&self, full_name: &str) -> Result<RepoHandle, FetchError>;

    /// Fetches the flat, recursive file listing at `git_ref`
    async fn get_tree(&self, full_name: &str, git_ref: &str)
    -> Result<Vec<FileEntry>, FetchError>;

    /// Fetches the raw contents of a manifest file
    ///
    /// # Returns
    /// * `Ok(None)` - The file does not exist at `git_ref`
    async fn get_manifest(
        &self,
        full_name: &str,
        git_ref: &str,
        path: &str,
    ) -> Result<Option<String>, FetchError>;

    /// Fetches the latest published release, `None` when the repository has none
    async fn get_latest_release(&self, full_name: &str) -> Result<Option<Release>, FetchError>;
}
