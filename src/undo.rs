//! Cursor positions to restore on undo
//!
//! The host's own undo restores text but not where the cursor was before a
//! modal command ran (a cut selects before it deletes). Before each mutating
//! command the dispatcher records the cursor here so `undo` can put it back.

use std::collections::VecDeque;

use crate::commands::Command;

/// Default number of snapshots kept
pub const DEFAULT_UNDO_DEPTH: usize = 100;

/// Cursor position captured before a mutating command ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoEntry {
    pub command: Command,
    pub line: usize,
    pub column: usize,
}

/// Bounded stack of pre-mutation cursor snapshots
#[derive(Debug, Clone)]
pub struct UndoHistory {
    entries: VecDeque<UndoEntry>,
    max_size: usize,
}

impl UndoHistory {
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_UNDO_DEPTH)
    }

    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_size,
        }
    }

    /// Record a snapshot, silently dropping the oldest past capacity
    pub fn push(&mut self, entry: UndoEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.max_size {
            self.entries.pop_front();
        }
    }

    pub fn pop(&mut self) -> Option<UndoEntry> {
        self.entries.pop_back()
    }

    /// Pop up to `count` snapshots and return the last one popped
    ///
    /// That entry is the oldest of the batch, i.e. where the cursor was
    /// before the earliest of the undone commands.
    pub fn unwind(&mut self, count: u32) -> Option<UndoEntry> {
        let mut last = None;
        for _ in 0..count {
            match self.pop() {
                Some(entry) => last = Some(entry),
                None => break,
            }
        }
        last
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Most recent snapshot
    pub fn last(&self) -> Option<&UndoEntry> {
        self.entries.back()
    }
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new()
    }
}
