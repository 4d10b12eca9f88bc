use crate::context::HacsContext;
use crate::system::Stage;
use crate::task::error::TaskError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskType {
    /// Recurring job run on every scheduled pass
    Runtime,
    /// One-time job run while the host starts
    Startup,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Runtime => "runtime",
            TaskType::Startup => "startup",
        }
    }
}

/// Identity and execution gating of a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDescriptor {
    /// Unique key
    pub slug: String,
    pub task_type: TaskType,
    /// Stages the task may run in, empty for all stages
    pub stages: Vec<Stage>,
}

impl TaskDescriptor {
    pub fn new(slug: &str, task_type: TaskType, stages: &[Stage]) -> Self {
        Self {
            slug: slug.to_string(),
            task_type,
            stages: stages.to_vec(),
        }
    }

    /// Whether the task is eligible to run in `stage`
    pub fn runs_in(&self, stage: Stage) -> bool {
        self.stages.is_empty() || self.stages.contains(&stage)
    }
}

/// A background job registered with the [`crate::task::TaskManager`]
#[async_trait::async_trait]
pub trait Task: Send + Sync {
    fn descriptor(&self) -> &TaskDescriptor;

    async fn execute(&self, ctx: &HacsContext) -> Result<(), TaskError>;
}
