//! In-memory source host

use std::collections::HashMap;

use async_trait::async_trait;

use hacs_lifecycle::source::{FetchError, FileEntry, Release, RepoHandle, SourceClient};

/// Remote state of one repository
#[derive(Clone, Default)]
pub struct RemoteRepository {
    pub description: Option<String>,
    pub archived: bool,
    pub tag: Option<String>,
    pub tree: Vec<FileEntry>,
    pub files: HashMap<String, String>,
}

impl RemoteRepository {
    pub fn new(paths: &[&str]) -> Self {
        Self {
            description: Some("Test repository".to_string()),
            tree: paths.iter().map(|path| FileEntry::blob(path)).collect(),
            ..Self::default()
        }
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_string());
        self
    }

    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.to_string());
        self
    }

    /// A compliant integration with domain `domain`
    pub fn integration(domain: &str, config_flow: bool) -> Self {
        let manifest_path = format!("custom_components/{}/manifest.json", domain);
        let manifest = format!(
            r#"{{
                "domain": "{domain}",
                "name": "{domain}",
                "version": "1.0.0",
                "config_flow": {config_flow},
                "documentation": "https://example.com/{domain}",
                "issue_tracker": "https://example.com/{domain}/issues",
                "codeowners": ["@owner"]
            }}"#
        );
        Self::new(&[
            "hacs.json",
            &format!("custom_components/{}/__init__.py", domain),
            &manifest_path,
        ])
        .with_file("hacs.json", r#"{"name": "Test"}"#)
        .with_file(&manifest_path, &manifest)
    }

    /// A compliant plugin
    pub fn plugin(name: &str) -> Self {
        Self::new(&["hacs.json", &format!("dist/{}.js", name)]).with_file("hacs.json", "{}")
    }
}

/// Source client serving repositories from memory
///
/// Repositories that are not registered answer with `NotFound`.
#[derive(Default)]
pub struct MockSource {
    repositories: HashMap<String, RemoteRepository>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repository(mut self, full_name: &str, repository: RemoteRepository) -> Self {
        self.repositories
            .insert(full_name.to_lowercase(), repository);
        self
    }

    fn repository(&self, full_name: &str) -> Result<&RemoteRepository, FetchError> {
        self.repositories
            .get(&full_name.to_lowercase())
            .ok_or_else(|| FetchError::NotFound(full_name.to_string()))
    }
}

#[async_trait]
impl SourceClient for MockSource {
    async fn get_repository(&self, full_name: &str) -> Result<RepoHandle, FetchError> {
        let repository = self.repository(full_name)?;
        Ok(RepoHandle {
            full_name: full_name.to_string(),
            default_branch: "main".to_string(),
            description: repository.description.clone(),
            archived: repository.archived,
            topics: vec![],
            stargazers_count: 0,
        })
    }

    async fn get_tree(
        &self,
        full_name: &str,
        _git_ref: &str,
    ) -> Result<Vec<FileEntry>, FetchError> {
        Ok(self.repository(full_name)?.tree.clone())
    }

    async fn get_manifest(
        &self,
        full_name: &str,
        _git_ref: &str,
        path: &str,
    ) -> Result<Option<String>, FetchError> {
        Ok(self.repository(full_name)?.files.get(path).cloned())
    }

    async fn get_latest_release(&self, full_name: &str) -> Result<Option<Release>, FetchError> {
        Ok(self.repository(full_name)?.tag.clone().map(|tag| Release {
            tag_name: tag,
            body: None,
        }))
    }
}
