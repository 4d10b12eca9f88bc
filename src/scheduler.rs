//! Scheduled runtime passes
//!
//! The first pass runs as soon as the start event fires, later passes run
//! once per scan interval. A pass that overruns the interval delays the next
//! one instead of triggering a burst of catch-up passes.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::context::HacsContext;
use crate::task::{TaskManager, TaskOutcome};

pub struct Scheduler {
    ctx: Arc<HacsContext>,
    tasks: Arc<TaskManager>,
}

impl Scheduler {
    pub fn new(ctx: Arc<HacsContext>, tasks: Arc<TaskManager>) -> Self {
        Self { ctx, tasks }
    }

    /// Execute the runtime tasks eligible in the current stage once
    pub async fn run_pass(&self) -> Vec<TaskOutcome> {
        let outcomes = self.tasks.async_execute_runtime_tasks().await;
        let failed = outcomes
            .iter()
            .filter(|outcome| !outcome.is_success())
            .count();
        if failed > 0 {
            warn!("{} of {} tasks failed", failed, outcomes.len());
        } else {
            debug!("Pass finished ({} tasks)", outcomes.len());
        }
        outcomes
    }

    /// Run passes until `shutdown` turns true or its sender is dropped
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        if *shutdown.borrow() {
            return;
        }

        tokio::select! {
            _ = self.ctx.system.wait_started() => {}
            _ = shutdown.changed() => {
                info!("Scheduler stopped before start");
                return;
            }
        }

        let period = self.ctx.scan_interval().max(Duration::from_millis(1));
        info!("Scheduler started, interval {:?}", period);

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                _ = ticker.tick() => {
                    self.run_pass().await;
                }
            }
        }
        info!("Scheduler stopped");
    }
}
