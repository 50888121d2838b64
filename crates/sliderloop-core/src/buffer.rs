//! Growable event storage.

use crate::{Error, Event, Result};

/// Ordered sequence of recorded events.
///
/// Tracks its own logical capacity instead of relying on `Vec`'s growth
/// strategy, so the doubling schedule is exact: an empty buffer jumps to the
/// caller's initial capacity, and every later overflow doubles it. Clearing
/// keeps the allocation for the next take.
#[derive(Debug, Clone, Default)]
pub struct EventBuffer {
    events: Vec<Event>,
    capacity: usize,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[Event] {
        &self.events
    }

    /// Drop all events, keeping capacity.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Append an event, growing first if the buffer is full.
    ///
    /// `initial_capacity` is only used when the buffer has never allocated.
    /// On [`Error::Allocation`] nothing is appended and existing events are
    /// untouched.
    pub fn push(&mut self, event: Event, initial_capacity: usize) -> Result<()> {
        if self.events.len() >= self.capacity {
            self.grow(initial_capacity)?;
        }
        self.events.push(event);
        Ok(())
    }

    /// Clear, then append every event from `events` in order.
    ///
    /// Stops at the first allocation failure; events appended before it are
    /// kept.
    pub fn replace_from<I>(&mut self, events: I, initial_capacity: usize) -> Result<usize>
    where
        I: IntoIterator<Item = Event>,
    {
        self.clear();
        for event in events {
            self.push(event, initial_capacity)?;
        }
        Ok(self.len())
    }

    fn grow(&mut self, initial_capacity: usize) -> Result<()> {
        let requested = if self.capacity == 0 {
            initial_capacity.max(1)
        } else {
            self.capacity.saturating_mul(2)
        };

        self.events
            .try_reserve_exact(requested - self.events.len())
            .map_err(|_| Error::Allocation { requested })?;
        self.capacity = requested;

        tracing::trace!("Event buffer grown to {} events", requested);
        Ok(())
    }
}

impl<'a> IntoIterator for &'a EventBuffer {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
