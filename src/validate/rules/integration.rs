use crate::repository::Repository;
use crate::repository::content::join_path;
use crate::repository::manifest::INTEGRATION_MANIFEST;
use crate::validate::{ValidationException, ValidationRule};

/// `manifest.json` must exist inside the integration directory
pub struct IntegrationManifestFile;

impl ValidationRule for IntegrationManifestFile {
    fn name(&self) -> &'static str {
        "integration_manifest"
    }

    fn check(&self, repository: &Repository) -> Result<(), ValidationException> {
        let found = match repository.content.path.remote.as_deref() {
            Some(directory) => {
                let expected = join_path(directory, INTEGRATION_MANIFEST);
                repository.tree.iter().any(|entry| entry.path == expected)
            }
            None => repository
                .tree
                .iter()
                .any(|entry| entry.filename() == INTEGRATION_MANIFEST),
        };

        if !found {
            return Err(ValidationException::new(format!(
                "The repository has no '{}' file",
                INTEGRATION_MANIFEST
            )));
        }
        Ok(())
    }
}

/// The parsed manifest must carry the keys the host requires of custom integrations
pub struct IntegrationManifestKeys;

impl ValidationRule for IntegrationManifestKeys {
    fn name(&self) -> &'static str {
        "integration_manifest_keys"
    }

    fn check(&self, repository: &Repository) -> Result<(), ValidationException> {
        // A missing or unparseable manifest is reported when it is fetched
        let Some(manifest) = &repository.integration_manifest else {
            return Ok(());
        };

        let missing: Vec<&str> = [
            ("name", manifest.name.is_none()),
            ("version", manifest.version.is_none()),
            ("documentation", manifest.documentation.is_none()),
            ("issue_tracker", manifest.issue_tracker.is_none()),
            ("codeowners", manifest.codeowners.is_none()),
        ]
        .into_iter()
        .filter_map(|(key, absent)| absent.then_some(key))
        .collect();

        if !missing.is_empty() {
            return Err(ValidationException::new(format!(
                "The integration manifest is missing required keys: {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }
}
