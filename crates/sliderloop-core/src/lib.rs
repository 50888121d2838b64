//! Single-channel automation recorder and looping player.
//!
//! # Primary API
//!
//! - [`SliderLoop`]: Idle / Recording / Playing state machine
//! - [`EventBuffer`]: growable store of recorded [`Event`]s
//! - [`Recorder`] / [`Player`]: the two halves driven by the controller
//! - [`persistence`]: the `sliderloop_data_v1.0` text format
//! - [`Clock`] / [`Timer`]: time and one-shot timer services the host provides
//!
//! # Example
//!
//! ```
//! use sliderloop_core::{DeadlineTimer, ManualClock, Mode, SliderLoop};
//!
//! let clock = ManualClock::new(0.0);
//! let mut looper = SliderLoop::new(clock.clone(), DeadlineTimer::new(), Vec::<f32>::new());
//!
//! looper.record();
//! looper.on_input(0.2);
//! clock.advance(100.0);
//! looper.on_input(0.8);
//!
//! looper.play();
//! assert_eq!(looper.mode(), Mode::Playing);
//! assert_eq!(looper.poll(), Some(0.2));
//!
//! clock.advance(100.0);
//! assert_eq!(looper.poll(), Some(0.8));
//! ```

pub mod error;
pub use error::{Error, Result};

mod clock;
pub use clock::{Clock, ManualClock, SystemClock};

mod timer;
pub use timer::{DeadlineTimer, Timer};

mod config;
pub use config::{GrowthPolicy, DEFAULT_LOAD_CAPACITY, DEFAULT_RECORD_CAPACITY};

mod event;
pub use event::Event;

mod buffer;
pub use buffer::EventBuffer;

mod recorder;
pub use recorder::Recorder;

mod player;
pub use player::{PlaybackCursor, Player, PlayerState};

pub mod persistence;

mod command;
pub use command::Command;

mod controller;
pub use controller::{Mode, SliderLoop, ValueSink};
