//! Persist the state of every tracked repository

use std::sync::Arc;

use tracing::{debug, error};

use crate::context::HacsContext;
use crate::task::descriptor::{Task, TaskDescriptor, TaskType};
use crate::task::error::TaskError;
use crate::task::manager::{TaskSetup, setup};

pub const SLUG: &str = "store_repositories";

pub fn async_setup() -> TaskSetup {
    setup(|| async { Some(Arc::new(StoreRepositories::new()) as Arc<dyn Task>) })
}

pub struct StoreRepositories {
    descriptor: TaskDescriptor,
}

impl StoreRepositories {
    pub fn new() -> Self {
        Self {
            descriptor: TaskDescriptor::new(SLUG, TaskType::Runtime, &[]),
        }
    }
}

impl Default for StoreRepositories {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Task for StoreRepositories {
    fn descriptor(&self) -> &TaskDescriptor {
        &self.descriptor
    }

    /// Removed repositories are skipped so they are never written back
    async fn execute(&self, ctx: &HacsContext) -> Result<(), TaskError> {
        let mut stored = 0;
        let mut failed = 0;

        for repository in ctx.repositories.all().await {
            let repository = repository.lock().await;
            if repository.is_removed() {
                continue;
            }
            match ctx.store.save_repository(&repository.to_stored()) {
                Ok(()) => stored += 1,
                Err(e) => {
                    error!("Failed to store {}: {}", repository.data.full_name, e);
                    failed += 1;
                }
            }
        }

        debug!("Stored {} repositories", stored);
        if failed > 0 {
            return Err(TaskError::Failed(format!(
                "{} repositories could not be stored",
                failed
            )));
        }
        Ok(())
    }
}
