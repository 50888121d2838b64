//! Millisecond clocks.
//!
//! Everything in the looper measures time as `f64` milliseconds from an
//! arbitrary origin. [`SystemClock`] is backed by [`Instant`];
//! [`ManualClock`] only moves when told to and is what the tests drive.

use atomic_float::AtomicF64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Wall-clock time source with millisecond resolution.
///
/// Implementations must never go backwards within a session.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Monotonic clock measuring milliseconds since its creation.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn origin(&self) -> Instant {
        self.origin
    }

    /// Convert a timestamp from this clock back into an [`Instant`].
    ///
    /// Negative timestamps map to the origin.
    pub fn instant_at(&self, ms: f64) -> Instant {
        if ms <= 0.0 || !ms.is_finite() {
            return self.origin;
        }
        self.origin + Duration::from_secs_f64(ms / 1000.0)
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock that only advances when told to.
///
/// Clones share the same time, so a test can keep one copy while the
/// controller owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<AtomicF64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Arc::new(AtomicF64::new(start_ms)),
        }
    }

    /// Jump to an absolute time. Moving backwards is ignored.
    pub fn set(&self, ms: f64) {
        let _ = self
            .now
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |now| {
                (ms > now).then_some(ms)
            });
    }

    pub fn advance(&self, delta_ms: f64) {
        if delta_ms > 0.0 {
            self.now.fetch_add(delta_ms, Ordering::AcqRel);
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.load(Ordering::Acquire)
    }
}
