//! Refresh every tracked repository from the source host

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::config::FETCH_STAGGER_DELAY_MS;
use crate::context::HacsContext;
use crate::error::HacsError;
use crate::repository::SharedRepository;
use crate::repository::lifecycle::update_tracked;
use crate::system::Stage;
use crate::task::descriptor::{Task, TaskDescriptor, TaskType};
use crate::task::error::TaskError;
use crate::task::manager::{TaskSetup, setup};

pub const SLUG: &str = "update_repositories";

pub fn async_setup() -> TaskSetup {
    setup(|| async { Some(Arc::new(UpdateRepositories::new()) as Arc<dyn Task>) })
}

pub struct UpdateRepositories {
    descriptor: TaskDescriptor,
}

impl UpdateRepositories {
    pub fn new() -> Self {
        Self {
            descriptor: TaskDescriptor::new(
                SLUG,
                TaskType::Runtime,
                &[Stage::Running, Stage::Background],
            ),
        }
    }
}

impl Default for UpdateRepositories {
    fn default() -> Self {
        Self::new()
    }
}

/// Update a single repository
///
/// Returns true if the pass completed. Failures are logged and left for the
/// next scheduled pass.
async fn update_repository(ctx: &HacsContext, repository: &SharedRepository) -> bool {
    let (full_name, category) = {
        let repository = repository.lock().await;
        (repository.data.full_name.clone(), repository.category())
    };

    if !ctx.config.categories.is_enabled(category) {
        debug!("Skipping {}: category {} is disabled", full_name, category);
        return false;
    }

    match update_tracked(repository, ctx).await {
        Ok(()) => true,
        Err(HacsError::Removed(_)) => {
            debug!("Skipping {}: no longer tracked", full_name);
            false
        }
        Err(e) => {
            error!("Failed to update {}: {}", full_name, e);
            false
        }
    }
}

#[async_trait::async_trait]
impl Task for UpdateRepositories {
    fn descriptor(&self) -> &TaskDescriptor {
        &self.descriptor
    }

    /// Updates are executed in parallel with staggered start times to avoid rate limiting
    async fn execute(&self, ctx: &HacsContext) -> Result<(), TaskError> {
        let repositories = ctx.repositories.all().await;
        let total = repositories.len();

        let futures = repositories.iter().enumerate().map(|(i, repository)| {
            let delay = Duration::from_millis(FETCH_STAGGER_DELAY_MS * i as u64);
            async move {
                sleep(delay).await;
                update_repository(ctx, repository).await
            }
        });

        let updated = join_all(futures)
            .await
            .into_iter()
            .filter(|updated| *updated)
            .count();

        info!("Updated {} of {} repositories", updated, total);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::host::MockHostRuntime;
    use crate::repository::{Category, Repository};
    use crate::source::client::MockSourceClient;
    use crate::source::{FetchError, FileEntry, Release, RepoHandle};
    use crate::store::sqlite::SqliteStore;
    use crate::system::System;
    use std::path::PathBuf;

    fn handle(full_name: &str) -> RepoHandle {
        RepoHandle {
            full_name: full_name.to_string(),
            default_branch: "main".to_string(),
            description: None,
            archived: false,
            topics: vec![],
            stargazers_count: 0,
        }
    }

    fn plugin_client() -> MockSourceClient {
        let mut client = MockSourceClient::new();
        client
            .expect_get_repository()
            .withf(|full_name| full_name == "owner/broken")
            .returning(|_| Err(FetchError::InvalidResponse("HTTP 500".to_string())));
        client
            .expect_get_repository()
            .withf(|full_name| full_name != "owner/broken")
            .returning(|full_name| Ok(handle(full_name)));
        client.expect_get_latest_release().returning(|_| {
            Ok(Some(Release {
                tag_name: "v2.0.0".to_string(),
                body: None,
            }))
        });
        client
            .expect_get_tree()
            .returning(|_, _| Ok(vec![FileEntry::blob("dist/card.js")]));
        client
    }

    fn context(client: MockSourceClient, config: Config) -> HacsContext {
        let mut host = MockHostRuntime::new();
        host.expect_config_path()
            .returning(|| PathBuf::from("/config"));
        HacsContext::new(
            config,
            Arc::new(System::default()),
            Arc::new(client),
            Arc::new(SqliteStore::in_memory().unwrap()),
            Arc::new(host),
        )
    }

    async fn track(ctx: &HacsContext, full_name: &str, category: Category) -> SharedRepository {
        let mut repository = Repository::new(full_name, category);
        repository.version.local = Some("1.0.0".to_string());
        ctx.repositories.register(repository).await
    }

    #[tokio::test]
    async fn updates_every_tracked_repository_despite_failures() {
        let ctx = context(plugin_client(), Config::default());
        let card = track(&ctx, "owner/card", Category::Plugin).await;
        let broken = track(&ctx, "owner/broken", Category::Plugin).await;
        let other = track(&ctx, "owner/other", Category::Plugin).await;

        UpdateRepositories::new().execute(&ctx).await.unwrap();

        for repository in [&card, &other] {
            let repository = repository.lock().await;
            assert_eq!(repository.version.remote.as_deref(), Some("v2.0.0"));
            assert!(repository.pending_update);
        }
        let broken = broken.lock().await;
        assert!(broken.version.remote.is_none());
        assert!(!broken.pending_update);
    }

    #[tokio::test]
    async fn disabled_categories_are_skipped() {
        let mut config = Config::default();
        config.categories.theme.enabled = false;
        let ctx = context(plugin_client(), config);
        let card = track(&ctx, "owner/card", Category::Plugin).await;
        let theme = track(&ctx, "owner/theme", Category::Theme).await;

        UpdateRepositories::new().execute(&ctx).await.unwrap();

        assert!(card.lock().await.pending_update);
        assert!(theme.lock().await.git_ref.is_none());
    }
}
