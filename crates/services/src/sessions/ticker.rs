use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::trace;

/// Periodic message source backing the one-second countdown.
///
/// Holds only a weak sender, so it never keeps the receiving task alive. The
/// background task is aborted when the source is stopped or dropped.
#[derive(Debug)]
pub struct TickSource {
    handle: JoinHandle<()>,
}

impl TickSource {
    /// Send `message()` to `target` every `period`, starting one period from now.
    #[must_use]
    pub fn spawn<M, F>(period: Duration, target: mpsc::WeakSender<M>, message: F) -> Self
    where
        M: Send + 'static,
        F: Fn() -> M + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
            loop {
                interval.tick().await;
                let Some(tx) = target.upgrade() else {
                    trace!("tick target dropped");
                    break;
                };
                if tx.send(message()).await.is_err() {
                    break;
                }
            }
        });
        Self { handle }
    }

    /// Stop delivering ticks. Consumes the source so it can only be stopped once.
    pub fn stop(self) {
        drop(self);
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for TickSource {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
