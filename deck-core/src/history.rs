//! Snapshot-based undo/redo.
//!
//! Each entry is a full, independent copy of the presentation. Capture is
//! explicit: callers record once per logical user action, before mutating.

use std::collections::VecDeque;

use crate::presentation::Presentation;

/// Default bound on each stack.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Bounded undo and redo stacks of presentation snapshots.
///
/// `past` grows at the back (most recent last). `future` grows at the front
/// (most recently undone first), so redo always takes the front entry.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    past: VecDeque<Presentation>,
    future: VecDeque<Presentation>,
    limit: usize,
}

impl History {
    /// Create empty history with the given bound per stack.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: VecDeque::new(),
            limit,
        }
    }

    /// Capture `current` before an edit. Clears the redo stack.
    pub fn record(&mut self, current: &Presentation) {
        self.past.push_back(current.clone());
        self.future.clear();
        self.evict_past();
    }

    /// Step back. Returns the snapshot to make current, or `None` if there is
    /// nothing to undo.
    pub fn undo(&mut self, current: &Presentation) -> Option<Presentation> {
        let previous = self.past.pop_back()?;
        self.future.push_front(current.clone());
        while self.future.len() > self.limit {
            self.future.pop_back();
        }
        Some(previous)
    }

    /// Step forward. Returns the snapshot to make current, or `None` if there
    /// is nothing to redo.
    pub fn redo(&mut self, current: &Presentation) -> Option<Presentation> {
        let next = self.future.pop_front()?;
        self.past.push_back(current.clone());
        self.evict_past();
        Some(next)
    }

    /// Drop both stacks.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    /// Check if undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Check if redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of undo entries.
    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.past.len()
    }

    /// Number of redo entries.
    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.future.len()
    }

    /// The per-stack bound.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    fn evict_past(&mut self) {
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}
