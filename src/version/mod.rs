//! Version comparison layer
//!
//! # Modules
//!
//! - [`comparator`]: Memoized `is_at_least` comparison shared by every repository pass
//! - [`error`]: Error types for version parsing
//! - [`semver`]: Shared semver utilities

pub mod comparator;
pub mod error;
pub mod semver;

pub use comparator::VersionComparator;
pub use error::VersionError;
