//! Fixed-interval refresh for `--watch` views.
//!
//! The first fetch happens when the view is shown, so the poller waits one
//! full period before its first tick. Each tick runs as its own task: a slow
//! fetch is not awaited before the next tick fires, and ticks are never
//! coalesced.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

pub struct Poller {
    handle: JoinHandle<()>,
}

impl Poller {
    /// Starts calling `tick` every `period`. Dropping the returned poller
    /// stops further ticks; fetches already in flight run to completion.
    pub fn spawn<F, Fut>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                tracing::debug!(?period, "Refresh tick");
                tokio::spawn(tick());
            }
        });
        Self { handle }
    }

    /// Consumes the poller; the task is aborted on drop.
    pub fn stop(self) {}

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn no_tick_before_first_period() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let _poller = Poller::spawn(Duration::from_secs(30), move || {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
            }
        });
        tokio::time::sleep(Duration::from_secs(29)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
