//! Event buffer growth configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Capacity the buffer starts at when the first recorded sample arrives.
pub const DEFAULT_RECORD_CAPACITY: usize = 16;

/// Capacity the buffer starts at when the first loaded point arrives.
pub const DEFAULT_LOAD_CAPACITY: usize = 64;

/// How the event buffer grows.
///
/// An empty buffer jumps straight to the initial capacity for whichever
/// operation is filling it; after that, capacity doubles every time it
/// runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthPolicy {
    pub record_initial_capacity: usize,
    pub load_initial_capacity: usize,
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self {
            record_initial_capacity: DEFAULT_RECORD_CAPACITY,
            load_initial_capacity: DEFAULT_LOAD_CAPACITY,
        }
    }
}

impl GrowthPolicy {
    /// Same initial capacity for recording and loading.
    pub fn uniform(initial_capacity: usize) -> Self {
        Self {
            record_initial_capacity: initial_capacity,
            load_initial_capacity: initial_capacity,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.record_initial_capacity == 0 {
            return Err(Error::InvalidConfig(
                "record_initial_capacity must be at least 1".into(),
            ));
        }
        if self.load_initial_capacity == 0 {
            return Err(Error::InvalidConfig(
                "load_initial_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
