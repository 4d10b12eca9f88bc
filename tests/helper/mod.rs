//! Shared fixtures for integration tests

#![allow(dead_code)]

pub mod host;
pub mod source;

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use hacs_lifecycle::config::Config;
use hacs_lifecycle::context::HacsContext;
use hacs_lifecycle::store::{RepositoryStore, SqliteStore, StoredRepository};
use hacs_lifecycle::system::System;

pub use host::TestHost;
pub use source::{MockSource, RemoteRepository};

/// Create a context over an on-disk store in a fresh temporary directory
pub fn create_test_context(
    source: MockSource,
    host: Arc<TestHost>,
    action: bool,
) -> (TempDir, Arc<HacsContext>) {
    let temp_dir = TempDir::new().unwrap();
    let store = SqliteStore::new(&db_path(temp_dir.path())).unwrap();

    let mut config = Config::default();
    config.homeassistant_version = Some("2024.6.0".to_string());
    config.config_path = Some(temp_dir.path().join("config"));

    let ctx = HacsContext::new(
        config,
        Arc::new(System::new(action)),
        Arc::new(source),
        Arc::new(store),
        host,
    );
    (temp_dir, Arc::new(ctx))
}

pub fn db_path(dir: &Path) -> std::path::PathBuf {
    dir.join("repositories.db")
}

/// Persist repositories the way an earlier process would have
pub fn seed_store(ctx: &HacsContext, repositories: &[StoredRepository]) {
    for repository in repositories {
        ctx.store.save_repository(repository).unwrap();
    }
}
