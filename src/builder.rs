//! Builder for configuring and spawning a [`LooperThread`].

use crate::core::{Error as CoreError, GrowthPolicy};
use crate::{LooperThread, Result};

/// Default depth of the command channel.
pub const DEFAULT_COMMAND_CAPACITY: usize = 1024;

/// # Example
///
/// ```no_run
/// use sliderloop::LooperThread;
///
/// let looper = LooperThread::builder()
///     .record_initial_capacity(256)
///     .thread_name("slider-a")
///     .build()?;
///
/// let handle = looper.handle();
/// handle.record()?;
/// handle.input(0.5)?;
/// handle.play()?;
///
/// let first = looper.output().recv().unwrap();
/// # Ok::<(), sliderloop::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct LooperBuilder {
    growth: GrowthPolicy,
    command_capacity: usize,
    thread_name: String,
}

impl Default for LooperBuilder {
    fn default() -> Self {
        Self {
            growth: GrowthPolicy::default(),
            command_capacity: DEFAULT_COMMAND_CAPACITY,
            thread_name: "sliderloop".into(),
        }
    }
}

impl LooperBuilder {
    pub fn growth(mut self, growth: GrowthPolicy) -> Self {
        self.growth = growth;
        self
    }

    /// Default: 16
    pub fn record_initial_capacity(mut self, capacity: usize) -> Self {
        self.growth.record_initial_capacity = capacity;
        self
    }

    /// Default: 64
    pub fn load_initial_capacity(mut self, capacity: usize) -> Self {
        self.growth.load_initial_capacity = capacity;
        self
    }

    /// Messages that may queue before senders block. Default: 1024
    pub fn command_capacity(mut self, capacity: usize) -> Self {
        self.command_capacity = capacity;
        self
    }

    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.growth.validate()?;
        if self.command_capacity == 0 {
            return Err(CoreError::InvalidConfig("command_capacity must be at least 1".into()).into());
        }
        Ok(())
    }

    /// Validate the configuration and start the looper thread.
    pub fn build(self) -> Result<LooperThread> {
        self.validate()?;
        LooperThread::spawn(self.growth, self.command_capacity, self.thread_name)
    }
}
