//! Task loading and execution

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use indexmap::IndexMap;
use tokio::sync::{Mutex, RwLock};
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::context::HacsContext;
use crate::task::descriptor::{Task, TaskType};
use crate::task::error::TaskError;
use crate::task::tasks::builtin_tasks;

/// Async constructor of one task, `None` when the task is disabled
pub type TaskSetup = Box<dyn FnOnce() -> BoxFuture<'static, Option<Arc<dyn Task>>> + Send>;

/// Wrap an async task constructor into a [`TaskSetup`]
pub fn setup<F, Fut>(f: F) -> TaskSetup
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Option<Arc<dyn Task>>> + Send + 'static,
{
    Box::new(move || f().boxed())
}

/// Result of one task execution
#[derive(Debug)]
pub struct TaskOutcome {
    pub slug: String,
    pub result: Result<(), TaskError>,
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

pub struct TaskManager {
    ctx: Arc<HacsContext>,
    /// Pending setups, `None` once loaded
    setups: Mutex<Option<Vec<TaskSetup>>>,
    tasks: RwLock<IndexMap<String, Arc<dyn Task>>>,
}

impl TaskManager {
    pub fn new(ctx: Arc<HacsContext>) -> Self {
        Self {
            ctx,
            setups: Mutex::new(Some(Vec::new())),
            tasks: RwLock::new(IndexMap::new()),
        }
    }

    /// Manager with every built-in task registered
    pub fn with_builtin_tasks(ctx: Arc<HacsContext>) -> Self {
        let mut manager = Self::new(ctx);
        for task in builtin_tasks() {
            manager.register(task);
        }
        manager
    }

    /// Register a task constructor to be run by the next [`Self::async_load`]
    pub fn register(&mut self, setup: TaskSetup) {
        match self.setups.get_mut() {
            Some(setups) => setups.push(setup),
            None => warn!("Tasks are already loaded, ignoring late registration"),
        }
    }

    /// Run every registered setup once and register the returned tasks.
    ///
    /// Setups run concurrently. A slug registered twice keeps the first task
    /// and the load reports [`TaskError::DuplicateSlug`] once every other task
    /// is registered. Calling this again after a load is a no-op.
    pub async fn async_load(&self) -> Result<usize, TaskError> {
        let mut setups = self.setups.lock().await;
        let Some(pending) = setups.take() else {
            let count = self.tasks.read().await.len();
            debug!("Tasks already loaded ({} tasks)", count);
            return Ok(count);
        };

        let loaded = join_all(pending.into_iter().map(|setup| setup())).await;

        let mut tasks = self.tasks.write().await;
        let mut duplicate = None;
        for task in loaded.into_iter().flatten() {
            let slug = task.descriptor().slug.clone();
            if tasks.contains_key(&slug) {
                error!("Task {} is already registered, keeping the first one", slug);
                duplicate.get_or_insert(slug);
                continue;
            }
            debug!("Loaded task {}", slug);
            tasks.insert(slug, task);
        }
        info!("Loaded {} tasks", tasks.len());

        match duplicate {
            Some(slug) => Err(TaskError::DuplicateSlug(slug)),
            None => Ok(tasks.len()),
        }
    }

    pub async fn get(&self, slug: &str) -> Option<Arc<dyn Task>> {
        self.tasks.read().await.get(slug).cloned()
    }

    /// All loaded tasks in registration order
    pub async fn tasks(&self) -> Vec<Arc<dyn Task>> {
        self.tasks.read().await.values().cloned().collect()
    }

    /// Execute every runtime task eligible in the current stage
    pub async fn async_execute_runtime_tasks(&self) -> Vec<TaskOutcome> {
        self.execute_tasks(TaskType::Runtime).await
    }

    /// Execute every startup task eligible in the current stage
    pub async fn async_execute_startup_tasks(&self) -> Vec<TaskOutcome> {
        self.execute_tasks(TaskType::Startup).await
    }

    /// Run the selected tasks concurrently and wait for all of them.
    ///
    /// Each task is bounded by the task timeout. A failing task is logged
    /// and does not affect the others.
    async fn execute_tasks(&self, task_type: TaskType) -> Vec<TaskOutcome> {
        let stage = self.ctx.system.stage();
        let selected: Vec<Arc<dyn Task>> = self
            .tasks()
            .await
            .into_iter()
            .filter(|task| {
                let descriptor = task.descriptor();
                descriptor.task_type == task_type && descriptor.runs_in(stage)
            })
            .collect();

        debug!(
            "Executing {} {} tasks in stage {}",
            selected.len(),
            task_type.as_str(),
            stage
        );

        let ctx = &self.ctx;
        let task_timeout = ctx.task_timeout();
        let futures = selected.into_iter().map(|task| async move {
            let slug = task.descriptor().slug.clone();
            let result = timeout(task_timeout, task.execute(ctx))
                .await
                .unwrap_or_else(|_| Err(TaskError::Timeout(slug.clone())));

            match &result {
                Ok(()) => debug!("Task {} finished", slug),
                Err(e) => error!("Task {} failed: {}", slug, e),
            }
            TaskOutcome { slug, result }
        });

        join_all(futures).await
    }
}
