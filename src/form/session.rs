//! Per-form session context.
//!
//! One [`FormSession`] lives for exactly one form run. It owns the key queue,
//! the flag for a transient message that must be cleared on the next poll, and
//! the render operations produced since the last flush.

use std::io;
use std::mem;

use super::batcher::{KeyBatch, KeyBatcher};
use super::key::KeyEvent;
use super::render::{EditOp, RenderOp};
use super::surface::TerminalSurface;

#[derive(Debug, Default)]
pub struct FormSession {
    batcher: KeyBatcher,
    message_pending: bool,
    ops: Vec<RenderOp>,
}

impl FormSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the next key batch for a field edit.
    pub fn next_batch<S>(&mut self, surface: &mut S) -> io::Result<KeyBatch>
    where
        S: TerminalSurface + ?Sized,
    {
        let fresh_read = self.batcher.pending() == 0;
        let batch = self.batcher.poll(surface)?;
        if fresh_read {
            self.clear_message();
        }
        Ok(batch)
    }

    /// Returns one key for focus navigation.
    pub fn next_key<S>(&mut self, surface: &mut S) -> io::Result<KeyEvent>
    where
        S: TerminalSurface + ?Sized,
    {
        let fresh_read = self.batcher.pending() == 0;
        let key = self.batcher.next_key(surface)?;
        if fresh_read {
            self.clear_message();
        }
        Ok(key)
    }

    /// Hands events left over after a commit or cancellation back to the queue.
    pub fn requeue(&mut self, batch: KeyBatch) {
        self.batcher.requeue(batch);
    }

    /// Shows a transient message with an alert; it is cleared on the next fresh poll.
    pub fn show_message(&mut self, message: impl Into<String>) {
        self.ops.push(RenderOp::Message(message.into()));
        self.ops.push(RenderOp::Alert);
        self.message_pending = true;
    }

    pub fn message_pending(&self) -> bool {
        self.message_pending
    }

    pub fn push(&mut self, op: RenderOp) {
        self.ops.push(op);
    }

    pub fn push_edit(&mut self, index: usize, ops: Vec<EditOp>) {
        self.ops
            .extend(ops.into_iter().map(|op| RenderOp::Edit { index, op }));
    }

    pub fn take_ops(&mut self) -> Vec<RenderOp> {
        mem::take(&mut self.ops)
    }

    fn clear_message(&mut self) {
        if self.message_pending {
            self.ops.push(RenderOp::ClearMessage);
            self.message_pending = false;
        }
    }
}
