//! Host application hooks the engine calls into

use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;
use tracing::info;

use crate::error::HacsError;

/// Operations the engine needs from the host application
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait HostRuntime: Send + Sync {
    /// Host configuration directory that local content paths are rooted at
    fn config_path(&self) -> PathBuf;

    /// Drop and rebuild the host's cached registry of custom components
    async fn reload_custom_components(&self) -> Result<(), HacsError>;
}

/// Host backed by a local configuration directory
pub struct LocalHost {
    config_path: PathBuf,
}

impl LocalHost {
    pub fn new(config_path: &Path) -> Self {
        Self {
            config_path: config_path.to_path_buf(),
        }
    }
}

#[async_trait::async_trait]
impl HostRuntime for LocalHost {
    fn config_path(&self) -> PathBuf {
        self.config_path.clone()
    }

    async fn reload_custom_components(&self) -> Result<(), HacsError> {
        info!("Reloading custom_component cache");
        let directory = self.config_path.join("custom_components");

        let mut count = 0usize;
        match tokio::fs::read_dir(&directory).await {
            Ok(mut entries) => {
                while let Some(entry) = entries
                    .next_entry()
                    .await
                    .map_err(|e| HacsError::Host(e.to_string()))?
                {
                    if entry
                        .file_type()
                        .await
                        .map_err(|e| HacsError::Host(e.to_string()))?
                        .is_dir()
                    {
                        count += 1;
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(HacsError::Host(e.to_string())),
        }

        info!("Custom_component cache reloaded ({} components)", count);
        Ok(())
    }
}
