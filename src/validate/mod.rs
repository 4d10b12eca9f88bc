//! Structural compliance checks
//!
//! Each category selects an ordered list of [`ValidationRule`] values. The
//! [`ValidationPipeline`] runs them against a fetched repository and either
//! accumulates failures (background scans) or stops at the first one
//! (action mode).
//!
//! - [`pipeline`]: Rule execution and per-category rule lists
//! - [`rules`]: Concrete rules

pub mod pipeline;
pub mod rules;

use thiserror::Error;

use crate::repository::Repository;

pub use pipeline::{RuleContext, ValidationPipeline};

/// A single rule's compliance failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationException {
    pub message: String,
}

impl ValidationException {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// How failures are surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Steady-state scanning: record failures and keep going
    Background,
    /// CI/action invocation: the first failure is a hard stop
    Action,
}

impl RunMode {
    pub fn from_action(action: bool) -> Self {
        if action {
            RunMode::Action
        } else {
            RunMode::Background
        }
    }
}

/// One structural compliance check
pub trait ValidationRule: Send + Sync {
    fn name(&self) -> &'static str;

    /// A fatal failure stops the remaining rules
    fn fatal(&self) -> bool {
        false
    }

    /// Rules that only run in action mode
    fn action_only(&self) -> bool {
        false
    }

    fn check(&self, repository: &Repository) -> Result<(), ValidationException>;
}
