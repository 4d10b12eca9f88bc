//! The `Repository` entity

use std::path::PathBuf;

use crate::repository::Category;
use crate::repository::manifest::{IntegrationManifest, RepositoryManifest};
use crate::source::FileEntry;
use crate::store::StoredRepository;

/// Identity and remote metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryData {
    /// `owner/name`, case preserved
    pub full_name: String,
    pub full_name_lower: String,
    pub category: Category,
    pub description: Option<String>,
    pub default_branch: Option<String>,
    pub archived: bool,
    pub topics: Vec<String>,
    pub stargazers_count: u64,
    /// Integration domain from `manifest.json`
    pub domain: Option<String>,
    pub config_flow: bool,
    pub first_install: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionState {
    /// Installed version
    pub local: Option<String>,
    /// Latest fetched version
    pub remote: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentPath {
    /// Package root inside the tree, empty for the repository root
    pub remote: Option<String>,
    /// Target directory on the host
    pub local: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Content {
    pub path: ContentPath,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidateState {
    pub errors: Vec<String>,
    /// Errors recorded by the latest update pass, replaced on the next one
    update_errors: Vec<String>,
    updating: bool,
    completed: bool,
}

impl ValidateState {
    /// True iff a full pipeline run finished without errors
    pub fn success(&self) -> bool {
        self.completed && self.errors.is_empty()
    }

    /// Record an error once
    pub fn record(&mut self, error: String) {
        if self.errors.contains(&error) {
            return;
        }
        if self.updating {
            self.update_errors.push(error.clone());
        }
        self.errors.push(error);
    }

    pub(crate) fn begin(&mut self) {
        self.errors.clear();
        self.update_errors.clear();
        self.updating = false;
        self.completed = false;
    }

    /// Drop what the previous update pass recorded, keep the pipeline result
    pub(crate) fn begin_update(&mut self) {
        let stale = std::mem::take(&mut self.update_errors);
        self.errors.retain(|error| !stale.contains(error));
        self.updating = true;
    }

    pub(crate) fn complete(&mut self) {
        self.completed = true;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Releases {
    pub last_tag: Option<String>,
    pub body: Option<String>,
}

/// One tracked external package
#[derive(Debug, Clone)]
pub struct Repository {
    pub data: RepositoryData,
    /// Flat file listing at `git_ref`
    pub tree: Vec<FileEntry>,
    /// Tracked ref: `tags/<tag>` for releases, the branch name otherwise
    pub git_ref: Option<String>,
    pub repository_manifest: RepositoryManifest,
    pub integration_manifest: Option<IntegrationManifest>,
    pub releases: Releases,
    pub version: VersionState,
    pub content: Content,
    pub validate: ValidateState,
    pub pending_restart: bool,
    pub pending_update: bool,
    pub(crate) removed: bool,
}

impl Repository {
    pub fn new(full_name: &str, category: Category) -> Self {
        Self {
            data: RepositoryData {
                full_name: full_name.to_string(),
                full_name_lower: full_name.to_lowercase(),
                category,
                description: None,
                default_branch: None,
                archived: false,
                topics: Vec::new(),
                stargazers_count: 0,
                domain: None,
                config_flow: false,
                first_install: true,
            },
            tree: Vec::new(),
            git_ref: None,
            repository_manifest: RepositoryManifest::default(),
            integration_manifest: None,
            releases: Releases::default(),
            version: VersionState::default(),
            content: Content::default(),
            validate: ValidateState::default(),
            pending_restart: false,
            pending_update: false,
            removed: false,
        }
    }

    /// Rebuild a repository from its persisted state
    pub fn from_stored(stored: &StoredRepository) -> Self {
        let mut repository = Self::new(&stored.full_name, stored.category);
        repository.version.local = stored.version_local.clone();
        repository.pending_restart = stored.pending_restart;
        repository.data.first_install = stored.first_install;
        repository
    }

    pub fn to_stored(&self) -> StoredRepository {
        StoredRepository {
            full_name: self.data.full_name.clone(),
            category: self.category(),
            version_local: self.version.local.clone(),
            pending_restart: self.pending_restart,
            first_install: self.data.first_install,
        }
    }

    pub fn category(&self) -> Category {
        self.data.category
    }

    pub fn is_installed(&self) -> bool {
        self.version.local.is_some()
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Repository part of `owner/name`
    pub fn short_name(&self) -> &str {
        self.data
            .full_name
            .rsplit('/')
            .next()
            .unwrap_or(&self.data.full_name)
    }

    /// Directory name the package is installed under
    pub fn local_name(&self) -> String {
        if let Some(domain) = &self.data.domain {
            return domain.clone();
        }
        if self.category() == Category::Integration {
            let directory = self
                .content
                .path
                .remote
                .as_deref()
                .and_then(|remote| remote.rsplit_once('/'))
                .map(|(_, directory)| directory);
            if let Some(directory) = directory {
                return directory.to_string();
            }
        }
        self.short_name().to_lowercase()
    }
}
