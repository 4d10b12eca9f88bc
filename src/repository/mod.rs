//! Tracked repositories and their validate/update state machine
//!
//! - [`category`]: Repository categories
//! - [`data`]: The `Repository` entity and its state records
//! - [`content`]: Remote/local content path resolution shared by validate and update
//! - [`manifest`]: `hacs.json` and integration `manifest.json` parsing
//! - [`lifecycle`]: `validate()`, `update()` and post-installation steps
//! - [`name`]: Repository name helpers
//! - [`registry`]: The set of tracked repositories

pub mod category;
pub mod content;
pub mod data;
pub mod lifecycle;
pub mod manifest;
pub mod name;
pub mod registry;

pub use category::Category;
pub use data::Repository;
pub use registry::{RepositoryRegistry, SharedRepository};
