use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::controller::SyncController;
use super::store::LinkStore;

/// `tokio::time::interval` panics on a zero period.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Handle to the periodic background refresh.
///
/// Dropping the handle aborts the task; `stop` lets an in-flight refresh
/// finish first.
pub struct RefreshHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    pub(crate) fn spawn<S: LinkStore>(controller: SyncController<S>, period: Duration) -> Self {
        let period = period.max(MIN_PERIOD);
        let (shutdown, mut shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(async move {
            // First tick one full period from now; the caller has just refreshed.
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            log::info!("Refreshing links every {}s", period.as_secs_f64());

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        if let Err(e) = controller.refresh(true).await {
                            log::warn!("Periodic refresh: {}", e);
                        }
                    }
                }
            }

            log::info!("Periodic refresh stopped");
        });

        Self {
            shutdown: Some(shutdown),
            task: Some(task),
        }
    }

    /// Ask the task to stop after any refresh it is running.
    pub fn cancel(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }

    /// Cancel and wait for the task to exit.
    pub async fn stop(mut self) {
        self.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    log::error!("Periodic refresh task failed: {}", e);
                }
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|t| t.is_finished())
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
