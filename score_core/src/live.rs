use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

/// Timer message requesting one perturbation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveTick {
    /// Live period that scheduled this tick.
    pub epoch: u64,
}

/// Handle to a running ticker task. Dropping it cancels the task.
#[derive(Debug)]
pub struct LiveHandle {
    epoch: u64,
    task: Option<JoinHandle<()>>,
}

impl LiveHandle {
    /// Remote handle for watching the task after this handle is gone.
    pub fn abort_handle(&self) -> Option<AbortHandle> {
        self.task.as_ref().map(JoinHandle::abort_handle)
    }

    /// Whether the ticker task is still scheduled.
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Abort the ticker. Idempotent, and safe after the task has ended.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!(target: "nayaflow::live", epoch = self.epoch, "ticker.cancelled");
        }
    }
}

impl Drop for LiveHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Spawn a task sending a [`LiveTick`] every `period`, first one after a full
/// period. Late ticks are skipped rather than delivered in a burst. The task
/// ends on its own once the receiving side is gone.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_live_ticker(
    period: Duration,
    epoch: u64,
    sender: UnboundedSender<LiveTick>,
) -> LiveHandle {
    let period = period.max(Duration::from_millis(1));
    let task = tokio::spawn(async move {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            if sender.send(LiveTick { epoch }).is_err() {
                break;
            }
        }
    });
    debug!(
        target: "nayaflow::live",
        epoch,
        period_ms = period.as_millis() as u64,
        "ticker.started"
    );
    LiveHandle {
        epoch,
        task: Some(task),
    }
}
