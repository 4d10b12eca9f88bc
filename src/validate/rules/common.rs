use std::sync::Arc;

use tracing::debug;

use crate::repository::Repository;
use crate::repository::manifest::REPOSITORY_MANIFEST;
use crate::validate::{ValidationException, ValidationRule};
use crate::version::VersionComparator;

/// Archived repositories receive no further checks
pub struct RepositoryArchived;

impl ValidationRule for RepositoryArchived {
    fn name(&self) -> &'static str {
        "repository_archived"
    }

    fn fatal(&self) -> bool {
        true
    }

    fn check(&self, repository: &Repository) -> Result<(), ValidationException> {
        if repository.data.archived {
            return Err(ValidationException::new("The repository is archived"));
        }
        Ok(())
    }
}

/// `hacs.json` must exist at the repository root
pub struct HacsManifest;

impl ValidationRule for HacsManifest {
    fn name(&self) -> &'static str {
        "hacs_manifest"
    }

    fn action_only(&self) -> bool {
        true
    }

    fn check(&self, repository: &Repository) -> Result<(), ValidationException> {
        if !repository
            .tree
            .iter()
            .any(|entry| entry.path == REPOSITORY_MANIFEST)
        {
            return Err(ValidationException::new(format!(
                "The repository has no '{}' file",
                REPOSITORY_MANIFEST
            )));
        }
        Ok(())
    }
}

pub struct RepositoryDescription;

impl ValidationRule for RepositoryDescription {
    fn name(&self) -> &'static str {
        "repository_description"
    }

    fn action_only(&self) -> bool {
        true
    }

    fn check(&self, repository: &Repository) -> Result<(), ValidationException> {
        let has_description = repository
            .data
            .description
            .as_deref()
            .is_some_and(|description| !description.trim().is_empty());
        if !has_description {
            return Err(ValidationException::new("The repository has no description"));
        }
        Ok(())
    }
}

/// The running host must satisfy the minimum version from `hacs.json`
pub struct HomeAssistantVersion {
    running: Option<String>,
    versions: Arc<VersionComparator>,
}

impl HomeAssistantVersion {
    pub fn new(running: Option<String>, versions: Arc<VersionComparator>) -> Self {
        Self { running, versions }
    }
}

impl ValidationRule for HomeAssistantVersion {
    fn name(&self) -> &'static str {
        "homeassistant_version"
    }

    fn check(&self, repository: &Repository) -> Result<(), ValidationException> {
        let (Some(running), Some(required)) = (
            self.running.as_deref(),
            repository.repository_manifest.homeassistant.as_deref(),
        ) else {
            return Ok(());
        };

        match self.versions.is_at_least(running, required) {
            Ok(true) => Ok(()),
            Ok(false) => Err(ValidationException::new(format!(
                "The repository requires Home Assistant {}, running {}",
                required, running
            ))),
            Err(e) => {
                debug!("Skipping host version check: {}", e);
                Ok(())
            }
        }
    }
}
