use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use scan_logging::scan_debug;
use tokio::runtime::Handle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Owns the single periodic task that drives the progress simulation.
///
/// `start` always cancels the running task before spawning its replacement,
/// so at most one task ever calls back. Cancellation is cooperative: the
/// task exits at its next wake-up.
pub struct Ticker {
    runtime: Handle,
    current: Option<CancellationToken>,
    live: Arc<AtomicUsize>,
}

/// Counts a spawned tick task for as long as its future exists.
struct LiveGuard(Arc<AtomicUsize>);

impl LiveGuard {
    fn new(live: Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::SeqCst);
        Self(live)
    }
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Ticker {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            current: None,
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Calls `on_tick` every `interval`, first after one full interval.
    pub fn start<F>(&mut self, interval: Duration, on_tick: F)
    where
        F: Fn() + Send + 'static,
    {
        self.stop();

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let guard = LiveGuard::new(self.live.clone());
        let period = interval.max(Duration::from_millis(1));
        self.runtime.spawn(async move {
            let _guard = guard;
            let mut ticks = tokio::time::interval(period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick of a tokio interval completes immediately.
            ticks.tick().await;
            loop {
                // Cancellation wins over a due tick.
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = ticks.tick() => on_tick(),
                }
            }
        });
        scan_debug!("ticker started, interval {:?}", period);
        self.current = Some(token);
    }

    /// Releases the running task, if any. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
            scan_debug!("ticker stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    /// Tick tasks that have not exited yet, including ones still winding
    /// down after `stop`.
    pub fn live_tasks(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
