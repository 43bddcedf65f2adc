//! Key batching: one blocking read followed by every event already queued.

use std::collections::VecDeque;
use std::io;
use std::mem;

use super::key::KeyEvent;
use super::surface::TerminalSurface;

/// Ordered run of key events collected by a single poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyBatch {
    events: VecDeque<KeyEvent>,
}

impl KeyBatch {
    pub fn new(events: impl IntoIterator<Item = KeyEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn next(&mut self) -> Option<KeyEvent> {
        self.events.pop_front()
    }

    /// The event that would be returned by the next call to [`KeyBatch::next`].
    pub fn peek(&self) -> Option<&KeyEvent> {
        self.events.front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl From<Vec<KeyEvent>> for KeyBatch {
    fn from(events: Vec<KeyEvent>) -> Self {
        Self::new(events)
    }
}

/// Owns the queue of events read from the surface but not yet consumed.
#[derive(Debug, Default)]
pub struct KeyBatcher {
    pending: VecDeque<KeyEvent>,
}

impl KeyBatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the next batch.
    ///
    /// Blocks for one event unless unconsumed events are already queued, then
    /// drains everything the surface reports as pending without blocking.
    pub fn poll<S>(&mut self, surface: &mut S) -> io::Result<KeyBatch>
    where
        S: TerminalSurface + ?Sized,
    {
        if self.pending.is_empty() {
            let first = surface.read_key()?;
            self.pending.push_back(first);
        }
        while surface.has_pending_key()? {
            let next = surface.read_key()?;
            self.pending.push_back(next);
        }
        let batch = KeyBatch {
            events: mem::take(&mut self.pending),
        };
        tracing::trace!(len = batch.len(), "key batch collected");
        Ok(batch)
    }

    /// Returns a single event, reading from the surface only when nothing is queued.
    pub fn next_key<S>(&mut self, surface: &mut S) -> io::Result<KeyEvent>
    where
        S: TerminalSurface + ?Sized,
    {
        match self.pending.pop_front() {
            Some(key) => Ok(key),
            None => surface.read_key(),
        }
    }

    /// Puts unconsumed events back in front of anything still queued.
    pub fn requeue(&mut self, mut batch: KeyBatch) {
        while let Some(key) = batch.events.pop_back() {
            self.pending.push_front(key);
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}
