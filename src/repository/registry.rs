//! The set of tracked repositories

use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use crate::repository::Repository;

/// A repository is only ever mutated by the pass holding its lock
pub type SharedRepository = Arc<Mutex<Repository>>;

/// Tracked repositories keyed by lower-cased `full_name`
#[derive(Default)]
pub struct RepositoryRegistry {
    repositories: RwLock<IndexMap<String, SharedRepository>>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a repository. An already tracked one is returned unchanged.
    pub async fn register(&self, repository: Repository) -> SharedRepository {
        let key = repository.data.full_name_lower.clone();
        let mut repositories = self.repositories.write().await;

        repositories
            .entry(key)
            .or_insert_with(|| {
                info!(
                    "Tracking {} ({})",
                    repository.data.full_name,
                    repository.category()
                );
                Arc::new(Mutex::new(repository))
            })
            .clone()
    }

    pub async fn get(&self, full_name: &str) -> Option<SharedRepository> {
        self.repositories
            .read()
            .await
            .get(&full_name.to_lowercase())
            .cloned()
    }

    pub async fn contains(&self, full_name: &str) -> bool {
        self.repositories
            .read()
            .await
            .contains_key(&full_name.to_lowercase())
    }

    /// Snapshot of every tracked repository in registration order
    pub async fn all(&self) -> Vec<SharedRepository> {
        self.repositories.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.repositories.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.repositories.read().await.is_empty()
    }

    /// Stop tracking a repository.
    ///
    /// Waits for any pass currently holding the repository, then flags it as
    /// removed so later passes holding an old handle skip it.
    pub async fn remove(&self, full_name: &str) -> Option<SharedRepository> {
        let removed = self
            .repositories
            .write()
            .await
            .shift_remove(&full_name.to_lowercase())?;

        removed.lock().await.removed = true;
        info!("Stopped tracking {}", full_name);
        Some(removed)
    }
}
