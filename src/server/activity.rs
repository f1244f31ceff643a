//! Optional inactivity watchdog.
//!
//! Every request touches the clock. When the review sits idle for the whole
//! window, the watchdog resolves the gate as denied. A warning is logged once
//! 80% of the window has passed.

use crate::decision::{Decision, DecisionGate, INACTIVITY_FEEDBACK};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct ActivityClock {
    started: Instant,
    /// Milliseconds after `started` of the last request.
    last_ms: Arc<AtomicU64>,
}

impl ActivityClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            last_ms: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn touch(&self) {
        let now = self.started.elapsed().as_millis() as u64;
        self.last_ms.store(now, Ordering::Relaxed);
    }

    pub fn idle_for(&self) -> Duration {
        let last = Duration::from_millis(self.last_ms.load(Ordering::Relaxed));
        self.started.elapsed().saturating_sub(last)
    }
}

impl Default for ActivityClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Run until the gate resolves or the review times out.
pub async fn watch_inactivity(clock: ActivityClock, gate: DecisionGate, timeout: Duration) {
    let warn_after = timeout.mul_f64(0.8);
    let period = (timeout / 4).clamp(Duration::from_millis(10), Duration::from_secs(30));
    let mut ticker = tokio::time::interval(period);
    let mut warned = false;

    loop {
        ticker.tick().await;
        if gate.is_resolved() {
            return;
        }

        let idle = clock.idle_for();
        if idle >= timeout {
            tracing::warn!("Inactivity timeout reached, closing reviewer");
            gate.resolve(Decision::deny(INACTIVITY_FEEDBACK));
            return;
        }

        if idle >= warn_after && !warned {
            let remaining = timeout.saturating_sub(idle);
            tracing::warn!(
                "Review will time out after {}s more of inactivity",
                remaining.as_secs()
            );
            warned = true;
        }
    }
}
