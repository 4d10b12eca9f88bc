//! Built-in tasks
//!
//! New tasks are added by appending their setup to [`builtin_tasks`].

pub mod restore_repositories;
pub mod store_repositories;
pub mod update_repositories;

use crate::task::manager::TaskSetup;

/// Setups of every built-in task
pub fn builtin_tasks() -> Vec<TaskSetup> {
    vec![
        restore_repositories::async_setup(),
        update_repositories::async_setup(),
        store_repositories::async_setup(),
    ]
}
