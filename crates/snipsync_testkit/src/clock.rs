//! Deterministic clock for tests.

use snipsync_store::Clock;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// A settable clock.
///
/// Hand one instance to the code under test and keep a second `Arc` to
/// move time forward between steps.
#[derive(Debug, Default)]
pub struct FixedClock(AtomicI64);

impl FixedClock {
    /// Creates a clock frozen at the given time.
    #[must_use]
    pub fn at(ms: i64) -> Arc<Self> {
        Arc::new(Self(AtomicI64::new(ms)))
    }

    /// Moves the clock to an absolute time.
    pub fn set(&self, ms: i64) {
        self.0.store(ms, Ordering::SeqCst);
    }

    /// Advances the clock by a delta.
    pub fn advance(&self, delta_ms: i64) {
        self.0.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}
