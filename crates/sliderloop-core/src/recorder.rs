//! Captures incoming values as events relative to the start of a take.

use crate::{Event, EventBuffer, Result};

/// Recording state for one take.
#[derive(Debug, Clone, Copy, Default)]
pub struct Recorder {
    recording: bool,
    record_start: f64,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Clock time the current (or last) take started at.
    pub fn record_start(&self) -> f64 {
        self.record_start
    }

    /// Begin a new take. The previous take is discarded immediately.
    pub fn start(&mut self, now_ms: f64, buffer: &mut EventBuffer) {
        self.recording = true;
        self.record_start = now_ms;
        buffer.clear();
    }

    /// Capture `value` at `now_ms` if a take is running.
    ///
    /// Returns `Ok(false)` when not recording. An allocation failure leaves
    /// the buffer as it was and recording continues.
    pub fn on_input(
        &mut self,
        now_ms: f64,
        value: f32,
        buffer: &mut EventBuffer,
        initial_capacity: usize,
    ) -> Result<bool> {
        if !self.recording {
            return Ok(false);
        }

        let time = now_ms - self.record_start;
        buffer.push(Event::new(time, value), initial_capacity)?;
        Ok(true)
    }

    pub fn stop(&mut self) {
        self.recording = false;
    }
}
