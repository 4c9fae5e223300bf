// Refresh scheduler.
// Fires the refresh cycle on a fixed interval and on manual request.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::cache::SnapshotStore;
use crate::feed::Fetch;

use super::refresh::{Refresher, Trigger};

/// Default time between scheduled refreshes.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Handle to a running scheduler task.
pub struct SchedulerHandle {
    trigger_tx: mpsc::Sender<Trigger>,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Request an immediate refresh. The periodic timer is not affected.
    ///
    /// Returns false when a manual refresh is already pending, in which case the
    /// request is folded into that one.
    pub fn trigger_now(&self) -> bool {
        match self.trigger_tx.try_send(Trigger::Manual) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::debug!(
                    event = "scheduler.trigger_coalesced",
                    "Manual refresh already pending"
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }

    /// Stop the scheduler, letting an in-flight refresh finish first.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.task.await {
            tracing::error!(event = "scheduler.join_failed", error = %e, "Scheduler task failed");
        }
    }
}

/// Start the scheduler on the current tokio runtime.
///
/// The first tick fires one `interval` after start. With `refresh_on_start` an
/// extra refresh runs immediately.
pub fn spawn<F, S>(
    refresher: Arc<Refresher<F, S>>,
    interval: Duration,
    refresh_on_start: bool,
) -> SchedulerHandle
where
    F: Fetch + 'static,
    S: SnapshotStore + 'static,
{
    // Capacity 1: a manual trigger arriving while one is pending is dropped.
    let (trigger_tx, mut trigger_rx) = mpsc::channel(1);
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(
            event = "scheduler.started",
            interval_secs = interval.as_secs(),
            "Refresh scheduler started"
        );

        if refresh_on_start {
            refresher.refresh(Trigger::Startup).await;
        }

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => break,
                _ = ticker.tick() => {
                    refresher.refresh(Trigger::Tick).await;
                }
                Some(trigger) = trigger_rx.recv() => {
                    refresher.refresh(trigger).await;
                }
            }
        }

        tracing::info!(event = "scheduler.stopped", "Refresh scheduler stopped");
    });

    SchedulerHandle {
        trigger_tx,
        shutdown_tx,
        task,
    }
}
