//! Undo/redo history for view selections.
//!
//! Snapshot-based: before each change the caller captures the previous
//! value. Pure state management with no UI dependencies.

use std::collections::VecDeque;

const DEFAULT_MAX_DEPTH: usize = 50;

/// Bounded undo/redo stacks of snapshots.
#[derive(Debug, Clone)]
pub struct HistoryManager<T> {
    /// Most recent = back of deque.
    undo_stack: VecDeque<T>,
    /// Most recent = back of deque.
    redo_stack: VecDeque<T>,
    max_depth: usize,
}

impl<T> HistoryManager<T> {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Capture the state a change is about to replace.
    ///
    /// Any new change invalidates the redo history. The oldest entry is
    /// dropped once the stack is full.
    pub fn capture_before_change(&mut self, snapshot: T) {
        self.undo_stack.push_back(snapshot);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
        self.redo_stack.clear();
    }

    /// Step back: `current` goes to the redo stack, the previous snapshot is returned.
    pub fn undo(&mut self, current: T) -> Option<T> {
        let previous = self.undo_stack.pop_back()?;
        self.redo_stack.push_back(current);
        Some(previous)
    }

    /// Step forward: `current` goes to the undo stack, the next snapshot is returned.
    pub fn redo(&mut self, current: T) -> Option<T> {
        let next = self.redo_stack.pop_back()?;
        self.undo_stack.push_back(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }
}

impl<T> Default for HistoryManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_undo_redo() {
        let mut history = HistoryManager::new();
        history.capture_before_change(1);
        assert!(history.can_undo());
        assert!(!history.can_redo());

        assert_eq!(history.undo(2), Some(1));
        assert!(!history.can_undo());
        assert!(history.can_redo());

        assert_eq!(history.redo(1), Some(2));
        assert!(history.can_undo());
    }

    #[test]
    fn test_undo_on_empty_keeps_redo_untouched() {
        let mut history: HistoryManager<u8> = HistoryManager::new();
        assert_eq!(history.undo(5), None);
        assert_eq!(history.redo_depth(), 0);
    }

    #[test]
    fn test_redo_cleared_on_new_change() {
        let mut history = HistoryManager::new();
        history.capture_before_change(1);
        history.undo(2);
        assert!(history.can_redo());

        history.capture_before_change(1);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_max_depth_drops_oldest() {
        let mut history = HistoryManager::with_max_depth(2);
        history.capture_before_change(1);
        history.capture_before_change(2);
        history.capture_before_change(3);
        assert_eq!(history.undo_depth(), 2);
        assert_eq!(history.undo(4), Some(3));
        assert_eq!(history.undo(3), Some(2));
        assert_eq!(history.undo(2), None);
    }

    #[test]
    fn test_clear() {
        let mut history = HistoryManager::new();
        history.capture_before_change(1);
        history.capture_before_change(2);
        history.undo(3);
        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
