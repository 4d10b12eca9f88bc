//! Repository (`hacs.json`) and integration (`manifest.json`) manifests

use serde::Deserialize;
use thiserror::Error;

use crate::source::FetchError;

/// Repository manifest filename, always at the repository root
pub const REPOSITORY_MANIFEST: &str = "hacs.json";

/// Integration manifest filename, inside the integration directory
pub const INTEGRATION_MANIFEST: &str = "manifest.json";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("The repository has no '{0}' file")]
    Missing(String),

    #[error("'{path}' is not valid: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Contents of `hacs.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RepositoryManifest {
    pub name: Option<String>,
    pub content_in_root: bool,
    pub filename: Option<String>,
    pub render_readme: bool,
    /// Minimum host version
    pub homeassistant: Option<String>,
    pub zip_release: bool,
    pub hide_default_branch: bool,
}

impl RepositoryManifest {
    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        serde_json::from_str(content).map_err(|source| ManifestError::Malformed {
            path: REPOSITORY_MANIFEST.to_string(),
            source,
        })
    }
}

/// Contents of an integration's `manifest.json`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IntegrationManifest {
    pub domain: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub config_flow: bool,
    #[serde(default)]
    pub documentation: Option<String>,
    #[serde(default)]
    pub issue_tracker: Option<String>,
    #[serde(default)]
    pub codeowners: Option<Vec<String>>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl IntegrationManifest {
    pub fn parse(path: &str, content: &str) -> Result<Self, ManifestError> {
        serde_json::from_str(content).map_err(|source| ManifestError::Malformed {
            path: path.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_manifest_defaults_missing_fields() {
        let manifest = RepositoryManifest::parse(r#"{"name": "Awesome"}"#).unwrap();

        assert_eq!(manifest.name.as_deref(), Some("Awesome"));
        assert!(!manifest.content_in_root);
        assert_eq!(manifest.homeassistant, None);
    }

    #[test]
    fn repository_manifest_reads_content_in_root() {
        let manifest = RepositoryManifest::parse(
            r#"{"content_in_root": true, "filename": "card.js", "homeassistant": "2023.1.0"}"#,
        )
        .unwrap();

        assert!(manifest.content_in_root);
        assert_eq!(manifest.filename.as_deref(), Some("card.js"));
        assert_eq!(manifest.homeassistant.as_deref(), Some("2023.1.0"));
    }

    #[test]
    fn integration_manifest_parses_known_keys() {
        let manifest = IntegrationManifest::parse(
            "custom_components/awesome/manifest.json",
            r#"{
                "domain": "awesome",
                "name": "Awesome",
                "version": "1.2.0",
                "config_flow": true,
                "codeowners": ["@owner"],
                "requirements": ["awesome-lib==1.0"]
            }"#,
        )
        .unwrap();

        assert_eq!(manifest.domain, "awesome");
        assert!(manifest.config_flow);
        assert_eq!(manifest.codeowners, Some(vec!["@owner".to_string()]));
        assert_eq!(manifest.documentation, None);
    }

    #[test]
    fn integration_manifest_without_domain_is_malformed() {
        let result = IntegrationManifest::parse("manifest.json", r#"{"name": "Awesome"}"#);

        assert!(matches!(result, Err(ManifestError::Malformed { .. })));
    }

    #[test]
    fn integration_manifest_rejects_invalid_json() {
        let result = IntegrationManifest::parse("manifest.json", "{ domain: awesome");

        let message = result.unwrap_err().to_string();
        assert!(message.starts_with("'manifest.json' is not valid"));
    }
}
