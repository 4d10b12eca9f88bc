//! Validate/update state machine of one repository
//!
//! Both passes run the same strictly sequential steps:
//! 1. fetch repository metadata, latest release and tree (`fetch_common`)
//! 2. resolve the content path (`resolve_content`)
//! 3. fetch and parse the category manifest (`load_category_manifest`)
//!
//! `validate()` then runs the category's validation pipeline, `update()`
//! refreshes the remote version and the pending-update flag.

use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::config::SELF_REPOSITORY;
use crate::context::HacsContext;
use crate::error::HacsError;
use crate::repository::content::{join_path, local_path, resolve_remote_path};
use crate::repository::data::Releases;
use crate::repository::manifest::{
    INTEGRATION_MANIFEST, IntegrationManifest, ManifestError, REPOSITORY_MANIFEST,
    RepositoryManifest,
};
use crate::repository::{Category, Repository, SharedRepository};
use crate::system::Stage;
use crate::validate::ValidationPipeline;
use crate::version::VersionComparator;
use crate::version::semver::{normalize_version, parse_version};

impl Repository {
    /// Run a full validation pass.
    ///
    /// Returns whether the repository is compliant. Structural problems
    /// (no resolvable content directory) and fetch failures abort the pass.
    /// In action mode any failure is returned as [`HacsError::Action`].
    pub async fn validate(&mut self, ctx: &HacsContext) -> Result<bool, HacsError> {
        self.ensure_tracked()?;
        self.validate.begin();

        self.fetch_common(ctx).await?;
        self.resolve_content(ctx)?;

        match self.load_category_manifest(ctx).await {
            Ok(()) => {}
            Err(ManifestError::Fetch(e)) => return Err(e.into()),
            Err(e) if ctx.system.is_action() => return Err(HacsError::Action(e.to_string())),
            Err(e) => {
                error!("{}: {}", self.data.full_name, e);
                self.validate.record(e.to_string());
            }
        }

        let pipeline = ValidationPipeline::for_category(self.category(), &ctx.rule_context());
        for error in pipeline.run(self, ctx.run_mode())? {
            self.validate.record(error);
        }
        self.validate.complete();

        if ctx.system.stage() != Stage::Startup {
            for error in &self.validate.errors {
                error!("{}: {}", self.data.full_name, error);
            }
        }

        Ok(self.validate.success())
    }

    /// Refresh the remote snapshot, remote version and pending-update flag
    pub async fn update(&mut self, ctx: &HacsContext) -> Result<(), HacsError> {
        self.ensure_tracked()?;
        self.validate.begin_update();

        self.fetch_common(ctx).await?;
        self.resolve_content(ctx)?;

        match self.load_category_manifest(ctx).await {
            Ok(()) => {}
            Err(ManifestError::Fetch(e)) => return Err(e.into()),
            Err(e) => {
                error!("{}: {}", self.data.full_name, e);
                self.validate.record(e.to_string());
            }
        }

        self.refresh_remote_version();
        self.pending_update = self.compute_pending_update(&ctx.versions);
        if self.pending_update {
            info!(
                "Update available for {}: {} -> {}",
                self.data.full_name,
                self.version.local.as_deref().unwrap_or_default(),
                self.version.remote.as_deref().unwrap_or_default()
            );
        }

        Ok(())
    }

    /// Steps run after the package has been placed on disk.
    ///
    /// Only integrations are loaded by the host, other categories never
    /// require a restart.
    pub async fn async_post_installation(&mut self, ctx: &HacsContext) -> Result<(), HacsError> {
        if self.category() != Category::Integration {
            return Ok(());
        }

        if self.data.config_flow {
            if !self.data.full_name.eq_ignore_ascii_case(SELF_REPOSITORY) {
                ctx.host.reload_custom_components().await?;
            }
            if self.data.first_install {
                self.pending_restart = false;
                return Ok(());
            }
        }
        self.pending_restart = true;
        Ok(())
    }

    /// Record a finished installation of the fetched remote version and persist it
    pub async fn complete_installation(&mut self, ctx: &HacsContext) -> Result<(), HacsError> {
        self.ensure_tracked()?;
        self.async_post_installation(ctx).await?;

        if let Some(remote) = &self.version.remote {
            self.version.local = Some(remote.clone());
        }
        self.data.first_install = false;
        self.pending_update = false;

        ctx.store.save_repository(&self.to_stored())?;
        info!(
            "Installed {} {}",
            self.data.full_name,
            self.version.local.as_deref().unwrap_or("from default branch")
        );
        Ok(())
    }

    fn ensure_tracked(&self) -> Result<(), HacsError> {
        if self.removed {
            return Err(HacsError::Removed(self.data.full_name.clone()));
        }
        Ok(())
    }

    async fn fetch_common(&mut self, ctx: &HacsContext) -> Result<(), HacsError> {
        let full_name = self.data.full_name.clone();
        debug!("Fetching {}", full_name);

        let handle = ctx.client.get_repository(&full_name).await?;
        let release = ctx.client.get_latest_release(&full_name).await?;
        let git_ref = match &release {
            Some(release) => format!("tags/{}", release.tag_name),
            None => handle.default_branch.clone(),
        };
        let tree = ctx.client.get_tree(&full_name, &git_ref).await?;

        self.data.description = handle.description;
        self.data.default_branch = Some(handle.default_branch);
        self.data.archived = handle.archived;
        self.data.topics = handle.topics;
        self.data.stargazers_count = handle.stargazers_count;
        self.releases = match release {
            Some(release) => Releases {
                last_tag: Some(release.tag_name),
                body: release.body,
            },
            None => Releases::default(),
        };
        self.tree = tree;

        self.repository_manifest = RepositoryManifest::default();
        if self.tree.iter().any(|entry| entry.path == REPOSITORY_MANIFEST) {
            let content = ctx
                .client
                .get_manifest(&full_name, &git_ref, REPOSITORY_MANIFEST)
                .await?;
            if let Some(content) = content {
                match RepositoryManifest::parse(&content) {
                    Ok(manifest) => self.repository_manifest = manifest,
                    Err(e) => {
                        warn!("{}: {}", full_name, e);
                        self.validate.record(e.to_string());
                    }
                }
            }
        }

        self.git_ref = Some(git_ref);
        Ok(())
    }

    fn resolve_content(&mut self, ctx: &HacsContext) -> Result<(), HacsError> {
        let remote = resolve_remote_path(
            self.category(),
            self.repository_manifest.content_in_root,
            &self.tree,
            self.git_ref.as_deref().unwrap_or_default(),
        )?;
        debug!("Resolved content of {} to {:?}", self.data.full_name, remote);

        self.content.path.remote = Some(remote);
        self.refresh_local_path(ctx);
        Ok(())
    }

    async fn load_category_manifest(&mut self, ctx: &HacsContext) -> Result<(), ManifestError> {
        if self.category() != Category::Integration {
            return Ok(());
        }

        self.integration_manifest = None;
        self.data.domain = None;
        self.data.config_flow = false;
        self.refresh_local_path(ctx);

        let path = join_path(
            self.content.path.remote.as_deref().unwrap_or_default(),
            INTEGRATION_MANIFEST,
        );
        let git_ref = self.git_ref.clone().unwrap_or_default();

        let content = ctx
            .client
            .get_manifest(&self.data.full_name, &git_ref, &path)
            .await?
            .ok_or_else(|| ManifestError::Missing(INTEGRATION_MANIFEST.to_string()))?;
        let manifest = IntegrationManifest::parse(&path, &content)?;

        self.data.domain = Some(manifest.domain.clone());
        self.data.config_flow = manifest.config_flow;
        self.integration_manifest = Some(manifest);

        // The domain names the local directory
        self.refresh_local_path(ctx);
        Ok(())
    }

    fn refresh_local_path(&mut self, ctx: &HacsContext) {
        self.content.path.local = Some(local_path(
            self.category(),
            &ctx.host.config_path(),
            &self.local_name(),
        ));
    }

    /// Only parseable release tags become the remote version
    fn refresh_remote_version(&mut self) {
        self.version.remote = match &self.releases.last_tag {
            Some(tag) if parse_version(normalize_version(tag)).is_some() => Some(tag.clone()),
            Some(tag) => {
                debug!(
                    "Release tag {:?} of {} is not a version",
                    tag, self.data.full_name
                );
                None
            }
            None => None,
        };
    }

    fn compute_pending_update(&self, versions: &VersionComparator) -> bool {
        let (Some(local), Some(remote)) = (&self.version.local, &self.version.remote) else {
            return false;
        };

        match versions.is_at_least(local, remote) {
            Ok(at_least) => !at_least,
            Err(e) => {
                debug!(
                    "Cannot determine update for {}: {}",
                    self.data.full_name, e
                );
                false
            }
        }
    }
}

/// Run `update()` on a tracked repository, bounded by the repository timeout
pub async fn update_tracked(
    repository: &SharedRepository,
    ctx: &HacsContext,
) -> Result<(), HacsError> {
    let mut repository = repository.lock().await;
    let full_name = repository.data.full_name.clone();

    timeout(ctx.repository_timeout(), repository.update(ctx))
        .await
        .unwrap_or(Err(HacsError::Timeout(full_name)))
}

/// Run `validate()` on a tracked repository, bounded by the repository timeout
pub async fn validate_tracked(
    repository: &SharedRepository,
    ctx: &HacsContext,
) -> Result<bool, HacsError> {
    let mut repository = repository.lock().await;
    let full_name = repository.data.full_name.clone();

    timeout(ctx.repository_timeout(), repository.validate(ctx))
        .await
        .unwrap_or(Err(HacsError::Timeout(full_name)))
}
