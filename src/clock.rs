// Time sources for decay-based retention.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Time source read by policies that age their entries.
///
/// `now` returns elapsed time since the Unix epoch and must be
/// monotonically non-decreasing; callers clamp negative deltas to zero
/// anyway, so a clock that stalls is safe and one that jumps back is
/// tolerated.
pub trait Clock: Send {
    fn now(&self) -> Duration;

    fn clone_clock(&self) -> Box<dyn Clock>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::from_secs(0))
    }

    fn clone_clock(&self) -> Box<dyn Clock> {
        Box::new(*self)
    }
}

/// Manually driven clock for deterministic tests.
///
/// Clones share the underlying counter, so a test can keep a handle and
/// advance time while a policy owns a boxed copy.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    millis: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, dt: Duration) {
        self.millis.fetch_add(dt.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn set(&self, now: Duration) {
        self.millis.store(now.as_millis() as u64, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_millis(self.millis.load(Ordering::Relaxed))
    }

    fn clone_clock(&self) -> Box<dyn Clock> {
        Box::new(self.clone())
    }
}
