//! Host runtime test double

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use hacs_lifecycle::error::HacsError;
use hacs_lifecycle::host::HostRuntime;

/// Host that counts component-registry reloads
pub struct TestHost {
    config_path: PathBuf,
    reloads: AtomicUsize,
}

impl TestHost {
    pub fn new() -> Self {
        Self {
            config_path: PathBuf::from("/config"),
            reloads: AtomicUsize::new(0),
        }
    }

    pub fn reloads(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostRuntime for TestHost {
    fn config_path(&self) -> PathBuf {
        self.config_path.clone()
    }

    async fn reload_custom_components(&self) -> Result<(), HacsError> {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
