//! Load the tracked set from the store while the host starts

use std::sync::Arc;

use tracing::info;

use crate::context::HacsContext;
use crate::repository::Repository;
use crate::system::Stage;
use crate::task::descriptor::{Task, TaskDescriptor, TaskType};
use crate::task::error::TaskError;
use crate::task::manager::{TaskSetup, setup};

pub const SLUG: &str = "restore_repositories";

pub fn async_setup() -> TaskSetup {
    setup(|| async { Some(Arc::new(RestoreRepositories::new()) as Arc<dyn Task>) })
}

pub struct RestoreRepositories {
    descriptor: TaskDescriptor,
}

impl RestoreRepositories {
    pub fn new() -> Self {
        Self {
            descriptor: TaskDescriptor::new(SLUG, TaskType::Startup, &[Stage::Startup]),
        }
    }
}

impl Default for RestoreRepositories {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Task for RestoreRepositories {
    fn descriptor(&self) -> &TaskDescriptor {
        &self.descriptor
    }

    async fn execute(&self, ctx: &HacsContext) -> Result<(), TaskError> {
        let stored = ctx.store.list_repositories()?;
        let count = stored.len();

        for repository in &stored {
            ctx.repositories
                .register(Repository::from_stored(repository))
                .await;
        }

        info!("Restored {} repositories", count);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::host::MockHostRuntime;
    use crate::repository::Category;
    use crate::source::client::MockSourceClient;
    use crate::store::sqlite::SqliteStore;
    use crate::store::{MockRepositoryStore, RepositoryStore, StoreError, StoredRepository};
    use crate::system::System;

    fn context(store: Arc<dyn RepositoryStore>) -> HacsContext {
        HacsContext::new(
            Config::default(),
            Arc::new(System::default()),
            Arc::new(MockSourceClient::new()),
            store,
            Arc::new(MockHostRuntime::new()),
        )
    }

    #[tokio::test]
    async fn restores_stored_repositories_into_registry() {
        let store = SqliteStore::in_memory().unwrap();
        let mut card = StoredRepository::new("owner/card", Category::Plugin);
        card.version_local = Some("1.0.0".to_string());
        store.save_repository(&card).unwrap();
        store
            .save_repository(&StoredRepository::new("owner/awesome", Category::Integration))
            .unwrap();
        let ctx = context(Arc::new(store));

        RestoreRepositories::new().execute(&ctx).await.unwrap();

        assert_eq!(ctx.repositories.len().await, 2);
        let restored = ctx.repositories.get("owner/card").await.unwrap();
        let restored = restored.lock().await;
        assert_eq!(restored.version.local.as_deref(), Some("1.0.0"));
        assert_eq!(restored.category(), Category::Plugin);
    }

    #[tokio::test]
    async fn store_failure_fails_the_task() {
        let mut store = MockRepositoryStore::new();
        store
            .expect_list_repositories()
            .returning(|| Err(StoreError::LockPoisoned));
        let ctx = context(Arc::new(store));

        let result = RestoreRepositories::new().execute(&ctx).await;

        assert!(matches!(result, Err(TaskError::Store(StoreError::LockPoisoned))));
        assert!(ctx.repositories.is_empty().await);
    }
}
