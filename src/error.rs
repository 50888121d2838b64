//! Centralized error type for the sliderloop host crate.
//!
//! Wraps the core error so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] sliderloop_core::Error),

    #[error("Failed to spawn looper thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Looper thread is not running")]
    Disconnected,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
