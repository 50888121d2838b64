//! Error types for sliderloop-core.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for sliderloop-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A save or load path could not be opened.
    #[error("Couldn't open file {}: {source}", .path.display())]
    IoOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A loaded file does not start with the `sliderloop_data` header.
    #[error("Invalid file format: {0}")]
    Format(String),

    /// The event buffer could not grow.
    #[error("Memory error: could not grow event buffer to {requested} events")]
    Allocation { requested: usize },

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Missing argument for '{0}'")]
    MissingArgument(&'static str),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
