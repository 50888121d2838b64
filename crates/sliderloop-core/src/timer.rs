//! One-shot timer service.

/// Fire-once timer with cancel-before-fire.
///
/// At most one fire is ever pending: arming replaces whatever was armed
/// before.
pub trait Timer {
    /// Arm the timer to fire `delay_ms` after `now_ms`.
    fn arm(&mut self, now_ms: f64, delay_ms: f64);

    fn cancel(&mut self);

    /// Absolute time of the pending fire, if any.
    fn deadline(&self) -> Option<f64>;

    fn is_pending(&self) -> bool {
        self.deadline().is_some()
    }
}

/// Timer that stores a single absolute deadline.
///
/// It never fires by itself; whoever drives the event loop checks
/// [`take_expired`](Self::take_expired) and delivers the tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeadlineTimer {
    deadline: Option<f64>,
}

impl DeadlineTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the pending fire if its deadline has passed.
    pub fn take_expired(&mut self, now_ms: f64) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now_ms => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Timer for DeadlineTimer {
    fn arm(&mut self, now_ms: f64, delay_ms: f64) {
        self.deadline = Some(now_ms + delay_ms.max(0.0));
    }

    fn cancel(&mut self) {
        self.deadline = None;
    }

    fn deadline(&self) -> Option<f64> {
        self.deadline
    }
}
