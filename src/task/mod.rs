//! Background task management
//!
//! - [`descriptor`]: Task identity, type and stage gating
//! - [`manager`]: Loading and concurrent execution of tasks
//! - [`tasks`]: Built-in tasks
//! - [`error`]: Task errors

pub mod descriptor;
pub mod error;
pub mod manager;
pub mod tasks;

pub use descriptor::{Task, TaskDescriptor, TaskType};
pub use error::TaskError;
pub use manager::{TaskManager, TaskOutcome, TaskSetup, setup};
