//! # sliderloop - Automation Looper
//!
//! Records the values of one control (a slider, a knob, a CC lane) with
//! their timing, then loops them back until stopped.
//!
//! ## Architecture
//!
//! sliderloop is an umbrella crate that coordinates:
//! - **sliderloop-core** - Event buffer, recorder, looping player, text persistence
//! - **looper** - Host thread that owns a looper and drives its timer
//!
//! ## Quick Start
//!
//! ```no_run
//! use sliderloop::prelude::*;
//!
//! let looper = LooperThread::builder().build()?;
//! let handle = looper.handle();
//!
//! handle.record()?;
//! for value in [0.1, 0.4, 0.9] {
//!     handle.input(value)?;
//!     std::thread::sleep(std::time::Duration::from_millis(50));
//! }
//! handle.play()?;
//!
//! for value in looper.output().iter().take(6) {
//!     println!("{value}");
//! }
//! handle.save("take.txt")?;
//! # Ok::<(), sliderloop::Error>(())
//! ```

/// Re-export of sliderloop-core for direct access
pub use sliderloop_core as core;

pub use sliderloop_core::{
    persistence, Clock, Command, DeadlineTimer, Event, EventBuffer, GrowthPolicy, ManualClock,
    Mode, SliderLoop, SystemClock, Timer, ValueSink,
};

mod error;
pub use error::{Error, Result};

mod builder;
pub use builder::{LooperBuilder, DEFAULT_COMMAND_CAPACITY};

mod looper;
pub use looper::{LooperHandle, LooperThread};

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Command, Error, Event, EventBuffer, GrowthPolicy, LooperBuilder, LooperHandle,
        LooperThread, Mode, Result, SliderLoop,
    };
}
