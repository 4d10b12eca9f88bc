use std::sync::Arc;

use tracing::debug;

use crate::error::HacsError;
use crate::repository::{Category, Repository};
use crate::validate::rules::common::{
    HacsManifest, HomeAssistantVersion, RepositoryArchived, RepositoryDescription,
};
use crate::validate::rules::content::{PluginJavascript, PythonScriptFile, ThemeYaml};
use crate::validate::rules::integration::{IntegrationManifestFile, IntegrationManifestKeys};
use crate::validate::{RunMode, ValidationRule};
use crate::version::VersionComparator;

/// Inputs rules need besides the repository itself
#[derive(Clone)]
pub struct RuleContext {
    /// Running host version, when known
    pub homeassistant_version: Option<String>,
    pub versions: Arc<VersionComparator>,
}

/// Ordered list of rules for one category
pub struct ValidationPipeline {
    category: Category,
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationPipeline {
    pub fn new(category: Category, rules: Vec<Box<dyn ValidationRule>>) -> Self {
        Self { category, rules }
    }

    /// Common rules followed by the category's own rules
    pub fn for_category(category: Category, context: &RuleContext) -> Self {
        let mut rules: Vec<Box<dyn ValidationRule>> = vec![
            Box::new(RepositoryArchived),
            Box::new(HacsManifest),
            Box::new(RepositoryDescription),
            Box::new(HomeAssistantVersion::new(
                context.homeassistant_version.clone(),
                context.versions.clone(),
            )),
        ];

        match category {
            Category::Integration => {
                rules.push(Box::new(IntegrationManifestFile));
                rules.push(Box::new(IntegrationManifestKeys));
            }
            Category::Plugin => rules.push(Box::new(PluginJavascript)),
            Category::Theme => rules.push(Box::new(ThemeYaml)),
            Category::PythonScript => rules.push(Box::new(PythonScriptFile)),
            Category::AppDaemon => {}
        }

        Self::new(category, rules)
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Run every applicable rule in registration order.
    ///
    /// Returns the accumulated failure messages. In action mode the first
    /// failure is returned as [`HacsError::Action`] instead.
    pub fn run(&self, repository: &Repository, mode: RunMode) -> Result<Vec<String>, HacsError> {
        let mut errors = Vec::new();

        for rule in &self.rules {
            if rule.action_only() && mode != RunMode::Action {
                continue;
            }

            let Err(exception) = rule.check(repository) else {
                debug!(
                    "<Validation {}> passed for {}",
                    rule.name(),
                    repository.data.full_name
                );
                continue;
            };

            if mode == RunMode::Action {
                return Err(HacsError::Action(format!("{}: {}", rule.name(), exception)));
            }

            debug!(
                "<Validation {}> failed for {} ({}): {}",
                rule.name(),
                repository.data.full_name,
                self.category,
                exception
            );
            errors.push(exception.message);

            if rule.fatal() {
                break;
            }
        }

        Ok(errors)
    }
}
