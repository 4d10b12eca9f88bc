//! Source-hosting layer
//!
//! - [`client`]: `SourceClient` trait the lifecycle engine fetches through
//! - [`github`]: GitHub REST API implementation
//! - [`types`]: Remote repository metadata, tree entries and releases
//! - [`error`]: Fetch errors

pub mod client;
pub mod error;
pub mod github;
pub mod types;

pub use client::SourceClient;
pub use error::FetchError;
pub use github::GitHubClient;
pub use types::{EntryKind, FileEntry, Release, RepoHandle};
