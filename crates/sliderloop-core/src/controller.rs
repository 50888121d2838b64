//! Record/playback state machine.

use crate::persistence;
use crate::player::{PlaybackCursor, Player, PlayerState};
use crate::recorder::Recorder;
use crate::{Clock, Command, DeadlineTimer, EventBuffer, GrowthPolicy, Result, Timer};
use crossbeam_channel::Sender;
use std::path::Path;

/// Operating mode. Recording and playing never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Mode {
    #[default]
    Idle = 0,
    Recording = 1,
    Playing = 2,
}

impl Mode {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Unknown values decode as `Idle`.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Mode::Recording,
            2 => Mode::Playing,
            _ => Mode::Idle,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Mode::Idle => "idle",
            Mode::Recording => "recording",
            Mode::Playing => "playing",
        })
    }
}

/// Destination for played-back values.
pub trait ValueSink {
    fn emit(&mut self, value: f32);
}

impl ValueSink for Vec<f32> {
    fn emit(&mut self, value: f32) {
        self.push(value);
    }
}

impl ValueSink for Sender<f32> {
    fn emit(&mut self, value: f32) {
        if self.send(value).is_err() {
            tracing::trace!("Output receiver dropped, discarding {}", value);
        }
    }
}

/// Single-channel automation looper.
///
/// Owns the event buffer, the recorder and the player, and enforces that
/// recording and playback are mutually exclusive. Time comes from `C`,
/// timer fires are requested from `T`, and played values go to `S`.
///
/// Nothing here fires on its own: the host calls [`on_tick`](Self::on_tick)
/// (or [`poll`](Self::poll)) once [`next_deadline`](Self::next_deadline)
/// has passed.
pub struct SliderLoop<C, T, S> {
    clock: C,
    timer: T,
    sink: S,
    buffer: EventBuffer,
    recorder: Recorder,
    player: Player,
    growth: GrowthPolicy,
}

impl<C: Clock, T: Timer, S: ValueSink> SliderLoop<C, T, S> {
    pub fn new(clock: C, timer: T, sink: S) -> Self {
        Self {
            clock,
            timer,
            sink,
            buffer: EventBuffer::new(),
            recorder: Recorder::new(),
            player: Player::new(),
            growth: GrowthPolicy::default(),
        }
    }

    pub fn with_growth(mut self, growth: GrowthPolicy) -> Self {
        self.growth = growth;
        self
    }

    pub fn mode(&self) -> Mode {
        if self.player.is_playing() {
            Mode::Playing
        } else if self.recorder.is_recording() {
            Mode::Recording
        } else {
            Mode::Idle
        }
    }

    pub fn buffer(&self) -> &EventBuffer {
        &self.buffer
    }

    pub fn cursor(&self) -> PlaybackCursor {
        self.player.cursor()
    }

    pub fn player_state(&self) -> PlayerState {
        self.player.state(&self.timer)
    }

    pub fn growth(&self) -> GrowthPolicy {
        self.growth
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// When the pending playback tick is due, in clock milliseconds.
    pub fn next_deadline(&self) -> Option<f64> {
        self.timer.deadline()
    }

    /// Start a new take, stopping playback and discarding the old take.
    pub fn record(&mut self) {
        self.stop();
        self.recorder.start(self.clock.now_ms(), &mut self.buffer);
        tracing::debug!("Recording started");
    }

    /// Stop recording and playback. Safe in any mode.
    pub fn stop(&mut self) {
        self.recorder.stop();
        self.player.stop(&mut self.timer);
    }

    /// Loop the buffer from the start.
    ///
    /// Returns `false`, changing nothing, when the buffer is empty.
    pub fn play(&mut self) -> bool {
        if self.buffer.is_empty() {
            tracing::debug!("Nothing recorded, ignoring play");
            return false;
        }

        self.stop();
        let started = self
            .player
            .start(&self.clock, &mut self.timer, &self.buffer);
        tracing::debug!("Playback started with {} points", self.buffer.len());
        started
    }

    /// Feed one value from the control source.
    ///
    /// Ignored unless recording. If the buffer cannot grow the sample is
    /// dropped with a warning and recording carries on.
    pub fn on_input(&mut self, value: f32) {
        let now = self.clock.now_ms();
        if let Err(e) = self.recorder.on_input(
            now,
            value,
            &mut self.buffer,
            self.growth.record_initial_capacity,
        ) {
            tracing::warn!("Dropped recorded sample {}: {}", value, e);
        }
    }

    /// Deliver a timer fire: emit the next value and schedule the one after.
    pub fn on_tick(&mut self) -> Option<f32> {
        let value = self
            .player
            .on_tick(&self.clock, &mut self.timer, &self.buffer)?;
        self.sink.emit(value);
        Some(value)
    }

    /// Save the buffer to `path`. Returns the number of points written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<usize> {
        persistence::save(&self.buffer, path)
    }

    /// Replace the buffer with the contents of `path`.
    ///
    /// The mode is left as it was. Recording keeps appending to the loaded
    /// points, and playback carries on from the current cursor, stalling if
    /// the cursor now lies past the end. A bad header leaves the buffer empty.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        persistence::load(&mut self.buffer, path, self.growth.load_initial_capacity)
    }

    pub fn dispatch(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Record => self.record(),
            Command::Stop => self.stop(),
            Command::Play => {
                self.play();
            }
            Command::Save(path) => {
                self.save(path)?;
            }
            Command::Load(path) => {
                self.load(path)?;
            }
        }
        Ok(())
    }

    /// Parse and run a textual command.
    pub fn dispatch_str(&mut self, command: &str) -> Result<()> {
        let command = command.parse::<Command>()?;
        self.dispatch(command)
    }
}

impl<C: Clock, S: ValueSink> SliderLoop<C, DeadlineTimer, S> {
    /// Deliver the pending tick if it is due. Fires at most once per call.
    pub fn poll(&mut self) -> Option<f32> {
        let now = self.clock.now_ms();
        if self.timer.take_expired(now) {
            self.on_tick()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Event, ManualClock};

    type TestLoop = SliderLoop<ManualClock, DeadlineTimer, Vec<f32>>;

    fn looper(clock: &ManualClock) -> TestLoop {
        SliderLoop::new(clock.clone(), DeadlineTimer::new(), Vec::new())
    }

    /// Record `points` as (offset from record start, value).
    fn record_points(looper: &mut TestLoop, clock: &ManualClock, points: &[(f64, f32)]) {
        let start = clock.now_ms();
        looper.record();
        for &(offset, value) in points {
            clock.set(start + offset);
            looper.on_input(value);
        }
        looper.stop();
    }

    #[test]
    fn test_starts_idle() {
        let clock = ManualClock::new(0.0);
        let looper = looper(&clock);
        assert_eq!(looper.mode(), Mode::Idle);
        assert!(looper.buffer().is_empty());
        assert_eq!(looper.next_deadline(), None);
    }

    #[test]
    fn test_recorded_times_relative_to_record_start() {
        let clock = ManualClock::new(5000.0);
        let mut looper = looper(&clock);

        looper.record();
        assert_eq!(looper.mode(), Mode::Recording);
        for (t, v) in [(5000.0, 0.1), (5012.5, 0.2), (5012.5, 0.3), (5300.0, 0.4)] {
            clock.set(t);
            looper.on_input(v);
        }

        assert_eq!(
            looper.buffer().as_slice(),
            &[
                Event::new(0.0, 0.1),
                Event::new(12.5, 0.2),
                Event::new(12.5, 0.3),
                Event::new(300.0, 0.4),
            ]
        );
    }

    #[test]
    fn test_input_ignored_unless_recording() {
        let clock = ManualClock::new(0.0);
        let mut looper = looper(&clock);

        looper.on_input(0.7);
        assert!(looper.buffer().is_empty());

        record_points(&mut looper, &clock, &[(0.0, 1.0)]);
        looper.play();
        looper.on_input(0.9);
        assert_eq!(looper.buffer().len(), 1);
    }

    #[test]
    fn test_play_empty_buffer_is_noop() {
        let clock = ManualClock::new(0.0);
        let mut looper = looper(&clock);

        assert!(!looper.play());
        assert_eq!(looper.mode(), Mode::Idle);

        // Recording with nothing captured stays recording
        looper.record();
        assert!(!looper.play());
        assert_eq!(looper.mode(), Mode::Recording);

        clock.advance(1000.0);
        assert_eq!(looper.poll(), None);
        assert!(looper.sink().is_empty());
    }

    #[test]
    fn test_play_stops_recording() {
        let clock = ManualClock::new(0.0);
        let mut looper = looper(&clock);

        looper.record();
        looper.on_input(0.5);
        assert!(looper.play());
        assert_eq!(looper.mode(), Mode::Playing);

        looper.on_input(0.6);
        assert_eq!(looper.buffer().len(), 1);
    }

    #[test]
    fn test_playback_timeline_loops() {
        let clock = ManualClock::new(0.0);
        let mut looper = looper(&clock);
        record_points(&mut looper, &clock, &[(0.0, 1.0), (100.0, 2.0)]);

        clock.set(1000.0);
        looper.play();
        assert_eq!(looper.next_deadline(), Some(1000.0));
        assert_eq!(looper.poll(), Some(1.0));

        // Not due yet
        clock.set(1099.0);
        assert_eq!(looper.poll(), None);

        clock.set(1100.0);
        assert_eq!(looper.poll(), Some(2.0));

        // Loop restart: first event is due immediately
        assert_eq!(looper.next_deadline(), Some(1100.0));
        assert_eq!(looper.poll(), Some(1.0));
        assert_eq!(looper.next_deadline(), Some(1200.0));

        assert_eq!(looper.sink(), &vec![1.0, 2.0, 1.0]);
        assert_eq!(looper.mode(), Mode::Playing);
    }

    #[test]
    fn test_poll_fires_at_most_once() {
        let clock = ManualClock::new(0.0);
        let mut looper = looper(&clock);
        record_points(&mut looper, &clock, &[(0.0, 1.0), (10.0, 2.0), (20.0, 3.0)]);

        looper.play();
        clock.advance(500.0);

        assert_eq!(looper.poll(), Some(1.0));
        assert_eq!(looper.poll(), Some(2.0));
        assert_eq!(looper.poll(), Some(3.0));
        assert_eq!(looper.sink().len(), 3);
    }

    #[test]
    fn test_record_while_playing_stops_playback() {
        let clock = ManualClock::new(0.0);
        let mut looper = looper(&clock);
        record_points(&mut looper, &clock, &[(0.0, 1.0), (50.0, 2.0)]);

        looper.play();
        assert_eq!(looper.poll(), Some(1.0));

        looper.record();
        assert_eq!(looper.mode(), Mode::Recording);
        assert!(looper.buffer().is_empty());
        assert_eq!(looper.next_deadline(), None);

        clock.advance(1000.0);
        assert_eq!(looper.poll(), None);
        assert_eq!(looper.on_tick(), None);
        assert_eq!(looper.sink(), &vec![1.0]);
    }

    #[test]
    fn test_stop_is_safe_in_any_mode() {
        let clock = ManualClock::new(0.0);
        let mut looper = looper(&clock);

        looper.stop();
        assert_eq!(looper.mode(), Mode::Idle);

        looper.record();
        looper.on_input(0.2);
        looper.stop();
        looper.stop();
        assert_eq!(looper.mode(), Mode::Idle);
        assert_eq!(looper.buffer().len(), 1);

        looper.play();
        looper.stop();
        assert_eq!(looper.mode(), Mode::Idle);
        assert_eq!(looper.next_deadline(), None);
    }

    #[test]
    fn test_replay_restarts_from_first_event() {
        let clock = ManualClock::new(0.0);
        let mut looper = looper(&clock);
        record_points(&mut looper, &clock, &[(0.0, 1.0), (10.0, 2.0), (20.0, 3.0)]);

        looper.play();
        looper.poll();
        clock.advance(10.0);
        looper.poll();

        looper.play();
        assert_eq!(looper.cursor().index, 0);
        assert_eq!(looper.poll(), Some(1.0));
    }

    #[test]
    fn test_growth_policy_applies_to_recording() {
        let clock = ManualClock::new(0.0);
        let mut looper = looper(&clock).with_growth(GrowthPolicy::uniform(4));

        looper.record();
        for i in 0..5 {
            clock.advance(1.0);
            looper.on_input(i as f32);
        }
        assert_eq!(looper.buffer().capacity(), 8);
        assert_eq!(looper.buffer().len(), 5);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take.txt");

        let clock = ManualClock::new(0.0);
        let mut looper = looper(&clock);
        record_points(&mut looper, &clock, &[(0.0, 0.25), (40.0, 0.5), (90.0, 0.75)]);
        assert_eq!(looper.save(&path).unwrap(), 3);

        let mut other = self::looper(&clock);
        assert_eq!(other.load(&path).unwrap(), 3);
        assert_eq!(other.buffer().capacity(), 64);
        assert_eq!(other.buffer().as_slice(), looper.buffer().as_slice());
    }

    #[test]
    fn test_load_while_playing_keeps_playing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take.txt");
        std::fs::write(
            &path,
            "sliderloop_data_v1.0\n0.000000 0.500000\n10.000000 0.600000\n20.000000 0.700000\n",
        )
        .unwrap();

        let clock = ManualClock::new(0.0);
        let mut looper = looper(&clock);
        record_points(&mut looper, &clock, &[(0.0, 1.0), (10.0, 2.0)]);
        looper.play();
        assert_eq!(looper.poll(), Some(1.0));

        assert_eq!(looper.load(&path).unwrap(), 3);
        assert_eq!(looper.mode(), Mode::Playing);
        assert_eq!(looper.player_state(), PlayerState::Scheduled);

        clock.advance(10.0);
        assert_eq!(looper.poll(), Some(0.6));
        clock.advance(10.0);
        assert_eq!(looper.poll(), Some(0.7));
        assert_eq!(looper.poll(), Some(0.5));
    }

    #[test]
    fn test_load_shorter_take_stalls_playback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take.txt");
        std::fs::write(&path, "sliderloop_data_v1.0\n0.000000 0.500000\n").unwrap();

        let clock = ManualClock::new(0.0);
        let mut looper = looper(&clock);
        record_points(&mut looper, &clock, &[(0.0, 1.0), (10.0, 2.0)]);
        looper.play();
        assert_eq!(looper.poll(), Some(1.0));

        looper.load(&path).unwrap();
        assert_eq!(looper.buffer().as_slice(), &[Event::new(0.0, 0.5)]);

        clock.advance(10.0);
        assert_eq!(looper.poll(), None);
        assert_eq!(looper.mode(), Mode::Playing);
        assert_eq!(looper.player_state(), PlayerState::Stalled);
        assert_eq!(looper.next_deadline(), None);

        assert!(looper.play());
        assert_eq!(looper.poll(), Some(0.5));
        assert_eq!(looper.sink(), &vec![1.0, 0.5]);
    }

    #[test]
    fn test_load_while_recording_keeps_recording() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take.txt");
        std::fs::write(
            &path,
            "sliderloop_data_v1.0\n0.000000 0.500000\n5.000000 0.600000\n",
        )
        .unwrap();

        let clock = ManualClock::new(100.0);
        let mut looper = looper(&clock);
        looper.record();
        looper.on_input(0.1);

        clock.advance(20.0);
        assert_eq!(looper.load(&path).unwrap(), 2);
        assert_eq!(looper.mode(), Mode::Recording);

        clock.advance(10.0);
        looper.on_input(0.7);
        assert_eq!(
            looper.buffer().as_slice(),
            &[
                Event::new(0.0, 0.5),
                Event::new(5.0, 0.6),
                Event::new(30.0, 0.7),
            ]
        );
    }

    #[test]
    fn test_load_bad_header_empties_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bogus.txt");
        std::fs::write(&path, "automation v1\n0.0 1.0\n").unwrap();

        let clock = ManualClock::new(0.0);
        let mut looper = looper(&clock);
        record_points(&mut looper, &clock, &[(0.0, 1.0), (10.0, 2.0)]);

        assert!(matches!(looper.load(&path), Err(Error::Format(_))));
        assert!(looper.buffer().is_empty());
        assert!(!looper.play());
    }

    #[test]
    fn test_load_missing_file_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();

        let clock = ManualClock::new(0.0);
        let mut looper = looper(&clock);
        record_points(&mut looper, &clock, &[(0.0, 1.0), (10.0, 2.0)]);
        looper.play();

        let result = looper.load(dir.path().join("missing.txt"));
        assert!(matches!(result, Err(Error::IoOpen { .. })));
        assert_eq!(looper.mode(), Mode::Playing);
        assert_eq!(looper.buffer().len(), 2);
        assert_eq!(looper.poll(), Some(1.0));
    }

    #[test]
    fn test_dispatch_commands() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take.txt");

        let clock = ManualClock::new(0.0);
        let mut looper = looper(&clock);

        looper.dispatch(Command::Record).unwrap();
        looper.on_input(0.3);
        looper.dispatch(Command::Play).unwrap();
        assert_eq!(looper.mode(), Mode::Playing);

        looper
            .dispatch_str(&format!("save {}", path.display()))
            .unwrap();
        looper.dispatch_str("stop").unwrap();
        assert_eq!(looper.mode(), Mode::Idle);

        looper.dispatch(Command::Record).unwrap();
        assert!(looper.buffer().is_empty());
        looper.dispatch(Command::Load(path)).unwrap();
        assert_eq!(looper.buffer().as_slice(), &[Event::new(0.0, 0.3)]);

        assert!(matches!(
            looper.dispatch_str("pause"),
            Err(Error::UnknownCommand(_))
        ));
    }

    #[test]
    fn test_channel_sink() {
        let (tx, rx) = crossbeam_channel::unbounded::<f32>();
        let clock = ManualClock::new(0.0);
        let mut looper = SliderLoop::new(clock.clone(), DeadlineTimer::new(), tx);

        looper.record();
        looper.on_input(0.8);
        looper.play();
        looper.poll();

        assert_eq!(rx.try_recv(), Ok(0.8));
    }

    #[test]
    fn test_mode_u8_round_trip() {
        for mode in [Mode::Idle, Mode::Recording, Mode::Playing] {
            assert_eq!(Mode::from_u8(mode.as_u8()), mode);
        }
        assert_eq!(Mode::from_u8(200), Mode::Idle);
        assert_eq!(Mode::Playing.to_string(), "playing");
    }
}
