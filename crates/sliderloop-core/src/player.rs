//! Looping playback scheduler.
//!
//! The player walks the buffer one event per timer fire. Each fire emits the
//! current event's value and arms the timer for the next one at
//! `play_start + event.time`. After the last event the cursor wraps to the
//! start and `play_start` is reset to the moment the wrap was processed, so
//! each loop is timed from when the previous one actually finished.

use crate::{Clock, EventBuffer, Timer};

/// Position of playback within the buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlaybackCursor {
    /// Clock time the current loop pass started at.
    pub play_start: f64,
    /// Next event to emit.
    pub index: usize,
}

/// Scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerState {
    #[default]
    Stopped,
    /// Playing with a fire pending.
    Scheduled,
    /// Playing with nothing pending (only when the buffer shrank under us).
    Stalled,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Player {
    playing: bool,
    cursor: PlaybackCursor,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn cursor(&self) -> PlaybackCursor {
        self.cursor
    }

    pub fn state<T: Timer>(&self, timer: &T) -> PlayerState {
        match (self.playing, timer.is_pending()) {
            (false, _) => PlayerState::Stopped,
            (true, true) => PlayerState::Scheduled,
            (true, false) => PlayerState::Stalled,
        }
    }

    /// Start looping from the first event.
    ///
    /// Does nothing and returns `false` on an empty buffer.
    pub fn start<C: Clock, T: Timer>(
        &mut self,
        clock: &C,
        timer: &mut T,
        buffer: &EventBuffer,
    ) -> bool {
        if buffer.is_empty() {
            return false;
        }

        self.stop(timer);
        self.playing = true;
        self.cursor = PlaybackCursor {
            play_start: clock.now_ms(),
            index: 0,
        };
        self.schedule_next(clock, timer, buffer);
        true
    }

    /// Arm the timer for the event under the cursor.
    ///
    /// A target already in the past fires as soon as possible.
    pub fn schedule_next<C: Clock, T: Timer>(&self, clock: &C, timer: &mut T, buffer: &EventBuffer) {
        if !self.playing {
            return;
        }
        let Some(event) = buffer.get(self.cursor.index) else {
            return;
        };

        let now = clock.now_ms();
        let target = self.cursor.play_start + event.time;
        let delay = (target - now).max(0.0);

        tracing::trace!(index = self.cursor.index, delay, "Scheduling playback tick");
        timer.arm(now, delay);
    }

    /// Handle a timer fire: emit one value and schedule the next.
    pub fn on_tick<C: Clock, T: Timer>(
        &mut self,
        clock: &C,
        timer: &mut T,
        buffer: &EventBuffer,
    ) -> Option<f32> {
        if !self.playing {
            return None;
        }
        let value = buffer.get(self.cursor.index)?.value;

        self.cursor.index += 1;
        if self.cursor.index >= buffer.len() {
            self.cursor.index = 0;
            self.cursor.play_start = clock.now_ms();
            tracing::trace!(play_start = self.cursor.play_start, "Playback loop restarted");
        }
        self.schedule_next(clock, timer, buffer);

        Some(value)
    }

    pub fn stop<T: Timer>(&mut self, timer: &mut T) {
        self.playing = false;
        timer.cancel();
    }
}
