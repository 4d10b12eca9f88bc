//! Process lifecycle state observed by the engine
//!
//! The host owns the stage; the engine reads it to gate task execution and
//! waits on the one-shot start event before the first scheduled pass.

use std::fmt;

use tokio::sync::watch;
use tracing::info;

/// Coarse phase of the host process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Setup,
    Startup,
    Waiting,
    Running,
    Background,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Setup => "setup",
            Stage::Startup => "startup",
            Stage::Waiting => "waiting",
            Stage::Running => "running",
            Stage::Background => "background",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage and start-event channels shared between host and engine
pub struct System {
    stage: watch::Sender<Stage>,
    started: watch::Sender<bool>,
    action: bool,
}

impl System {
    pub fn new(action: bool) -> Self {
        let (stage, _) = watch::channel(Stage::Setup);
        let (started, _) = watch::channel(false);
        Self {
            stage,
            started,
            action,
        }
    }

    pub fn stage(&self) -> Stage {
        *self.stage.borrow()
    }

    /// Called by the host lifecycle only
    pub fn set_stage(&self, stage: Stage) {
        let previous = self.stage.send_replace(stage);
        if previous != stage {
            info!("Stage changed from {} to {}", previous, stage);
        }
    }

    /// Whether the engine runs as a one-shot CI action
    pub fn is_action(&self) -> bool {
        self.action
    }

    /// Fire the start event. Later calls are no-ops.
    pub fn fire_started(&self) {
        self.started.send_if_modified(|started| {
            let first = !*started;
            *started = true;
            first
        });
    }

    pub fn has_started(&self) -> bool {
        *self.started.borrow()
    }

    /// Resolves once the start event has fired, immediately if it already has
    pub async fn wait_started(&self) {
        let mut rx = self.started.subscribe();
        // The sender lives as long as `self`, so this cannot fail while borrowed.
        let _ = rx.wait_for(|started| *started).await;
    }

    pub fn subscribe_stage(&self) -> watch::Receiver<Stage> {
        self.stage.subscribe()
    }
}

impl Default for System {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn new_system_starts_in_setup_stage() {
        let system = System::default();
        assert_eq!(system.stage(), Stage::Setup);
        assert!(!system.has_started());
        assert!(!system.is_action());
    }

    #[test]
    fn set_stage_is_visible_to_subscribers() {
        let system = System::default();
        let rx = system.subscribe_stage();

        system.set_stage(Stage::Running);

        assert_eq!(system.stage(), Stage::Running);
        assert_eq!(*rx.borrow(), Stage::Running);
    }

    #[tokio::test]
    async fn wait_started_resolves_after_start_event() {
        let system = Arc::new(System::default());
        let waiter = {
            let system = system.clone();
            tokio::spawn(async move { system.wait_started().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        system.fire_started();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
        assert!(system.has_started());
    }

    #[tokio::test]
    async fn wait_started_returns_immediately_when_already_started() {
        let system = System::default();
        system.fire_started();
        system.fire_started();

        tokio::time::timeout(Duration::from_secs(1), system.wait_started())
            .await
            .unwrap();
    }
}
