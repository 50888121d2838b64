//! Recorded automation point.

/// One captured slider value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// Milliseconds since recording started.
    pub time: f64,
    pub value: f32,
}

impl Event {
    pub fn new(time: f64, value: f32) -> Self {
        Self { time, value }
    }
}
