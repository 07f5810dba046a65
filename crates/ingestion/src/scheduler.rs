//! Periodic pipeline triggering, disabled by default
//!
//! When enabled, a background task ticks at the configured interval and goes
//! through the coordinator's normal `trigger()` path, so scheduled runs obey
//! the same single-flight rule as manual ones.

use crate::coordinator::{PipelineCoordinator, TriggerOutcome};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Handle for managing the periodic trigger task
///
/// Dropping this handle signals the task to shut down.
pub struct SchedulerHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task_handle: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Create a no-op handle (for disabled scheduling)
    fn noop() -> Self {
        Self {
            shutdown_tx: None,
            task_handle: None,
        }
    }

    /// Signal the scheduler task to shut down
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Wait for the scheduler task to complete
    pub async fn wait(mut self) {
        self.shutdown();
        if let Some(handle) = self.task_handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Start periodic triggering if the coordinator's config enables it.
///
/// Returns a handle that shuts the task down when dropped. With scheduling
/// disabled (the default) this is a no-op.
pub fn start_scheduler(coordinator: Arc<PipelineCoordinator>) -> SchedulerHandle {
    let status = coordinator.status();
    if !status.schedule_enabled {
        info!("Periodic ingestion disabled");
        return SchedulerHandle::noop();
    }

    let interval_secs = coordinator.schedule_interval_secs();
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

    let task_handle = tokio::spawn(async move {
        info!("Starting periodic ingestion (every {interval_secs}s)");
        let interval = Duration::from_secs(interval_secs);

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => {
                    info!("Periodic ingestion received shutdown signal");
                    break;
                }
                _ = tokio::time::sleep(interval) => {}
            }

            match coordinator.trigger() {
                TriggerOutcome::Accepted { run_id, .. } => {
                    debug!("Scheduled ingestion run {run_id} accepted");
                }
                TriggerOutcome::AlreadyRunning => {
                    // The previous run outlasted the interval; skip this tick
                    debug!("Scheduled ingestion skipped: run already active");
                }
            }
        }

        info!("Periodic ingestion stopped");
    });

    SchedulerHandle {
        shutdown_tx: Some(shutdown_tx),
        task_handle: Some(task_handle),
    }
}
