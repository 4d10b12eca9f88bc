//! Explicit engine context handed to every component

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::host::HostRuntime;
use crate::repository::RepositoryRegistry;
use crate::source::SourceClient;
use crate::store::RepositoryStore;
use crate::system::System;
use crate::validate::{RuleContext, RunMode};
use crate::version::VersionComparator;

/// Configuration, collaborators and shared state of one engine instance
pub struct HacsContext {
    pub config: Config,
    pub system: Arc<System>,
    pub client: Arc<dyn SourceClient>,
    pub store: Arc<dyn RepositoryStore>,
    pub host: Arc<dyn HostRuntime>,
    pub versions: Arc<VersionComparator>,
    pub repositories: RepositoryRegistry,
}

impl HacsContext {
    pub fn new(
        config: Config,
        system: Arc<System>,
        client: Arc<dyn SourceClient>,
        store: Arc<dyn RepositoryStore>,
        host: Arc<dyn HostRuntime>,
    ) -> Self {
        Self {
            config,
            system,
            client,
            store,
            host,
            versions: Arc::new(VersionComparator::new()),
            repositories: RepositoryRegistry::new(),
        }
    }

    pub fn run_mode(&self) -> RunMode {
        RunMode::from_action(self.system.is_action())
    }

    pub fn rule_context(&self) -> RuleContext {
        RuleContext {
            homeassistant_version: self.config.homeassistant_version.clone(),
            versions: self.versions.clone(),
        }
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_millis(self.config.scan.interval_ms)
    }

    pub fn repository_timeout(&self) -> Duration {
        Duration::from_millis(self.config.scan.repository_timeout_ms)
    }

    pub fn task_timeout(&self) -> Duration {
        Duration::from_millis(self.config.scan.task_timeout_ms)
    }
}
