//! Fixed-interval polling
//!
//! A poll is a spawned task that runs its tick immediately and then once per
//! interval until its [`PollHandle`] is stopped or dropped. Dropping the
//! handle is enough to release the timer on every exit path.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Spawns polls with a fixed interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Poller {
    interval: Duration,
}

impl Poller {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Starts polling `tick`
    ///
    /// A tick still running when the handle is cancelled is abandoned. Ticks
    /// never overlap; a slow tick delays the next one.
    pub fn spawn<F, Fut>(&self, name: &'static str, mut tick: F) -> PollHandle
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let shutdown = token.clone();
        let interval = self.interval;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(poll = name, interval_ms = interval.as_millis() as u64, "Polling started");

            loop {
                tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        debug!(poll = name, "Poll tick");
                        tokio::select! {
                            biased;
                            _ = shutdown.cancelled() => break,
                            _ = tick() => {}
                        }
                    }
                }
            }

            info!(poll = name, "Polling stopped");
        });

        PollHandle {
            token,
            task: Some(task),
        }
    }
}

/// Owns a running poll; cancels it when dropped
#[derive(Debug)]
pub struct PollHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    /// Requests cancellation without waiting
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Cancels the poll and waits for its task to finish
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
