//! Bounded, branch-overwriting undo/redo history of canvas snapshots.

use crate::element::Element;

/// Maximum number of snapshots to keep.
pub const MAX_HISTORY: usize = 50;

/// A deep copy of the full element array at one point in editing history.
/// Snapshots never alias live state.
pub type Snapshot = Vec<Element>;

/// A single linear log with a cursor. Committing after an undo truncates the
/// abandoned branch; exceeding [`MAX_HISTORY`] evicts the oldest snapshot and
/// re-anchors the cursor in the same step, so the cursor always points at the
/// snapshot that matches live state.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Snapshot>,
    index: usize,
}

impl History {
    /// Start a history whose baseline snapshot is `initial`.
    pub fn new(initial: Snapshot) -> Self {
        Self {
            snapshots: vec![initial],
            index: 0,
        }
    }

    /// Record `snapshot` as the new current state.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push(snapshot);
        if self.snapshots.len() > MAX_HISTORY {
            self.snapshots.remove(0);
        }
        self.index = self.snapshots.len() - 1;
    }

    /// Step back one snapshot, returning it, or `None` at the boundary.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(&self.snapshots[self.index])
    }

    /// Step forward one snapshot, returning it, or `None` at the boundary.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.index + 1 >= self.snapshots.len() {
            return None;
        }
        self.index += 1;
        Some(&self.snapshots[self.index])
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    /// Discard everything and restart from a new baseline.
    pub fn reset(&mut self, initial: Snapshot) {
        self.snapshots.clear();
        self.snapshots.push(initial);
        self.index = 0;
    }

    /// Number of retained snapshots, baseline included. Never zero: a
    /// history always holds at least its baseline.
    pub fn depth(&self) -> usize {
        self.snapshots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Element, ElementKind};

    fn snapshot_of(n: usize) -> Snapshot {
        (0..n)
            .map(|_| Element::with_defaults(ElementKind::Text))
            .collect()
    }

    #[test]
    fn test_boundaries_are_no_ops() {
        let mut history = History::new(snapshot_of(0));
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_undo_redo_walk() {
        let mut history = History::new(snapshot_of(0));
        history.push(snapshot_of(1));
        history.push(snapshot_of(2));

        assert_eq!(history.undo().map(Vec::len), Some(1));
        assert_eq!(history.undo().map(Vec::len), Some(0));
        assert!(history.undo().is_none());
        assert_eq!(history.redo().map(Vec::len), Some(1));
        assert_eq!(history.redo().map(Vec::len), Some(2));
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_commit_after_undo_truncates_branch() {
        let mut history = History::new(snapshot_of(0));
        history.push(snapshot_of(1));
        history.push(snapshot_of(2));

        history.undo();
        history.push(snapshot_of(3));

        assert!(!history.can_redo());
        assert_eq!(history.undo().map(Vec::len), Some(1));
    }

    #[test]
    fn test_bounded_at_max_history() {
        let mut history = History::new(snapshot_of(0));
        for i in 1..=200 {
            history.push(snapshot_of(i));
        }
        assert_eq!(history.depth(), MAX_HISTORY);

        // Only the most recent MAX_HISTORY - 1 states are reachable via undo.
        let mut steps = 0;
        while history.can_undo() {
            history.undo();
            steps += 1;
        }
        assert_eq!(steps, MAX_HISTORY - 1);
    }

    #[test]
    fn test_eviction_keeps_cursor_on_current_snapshot() {
        let mut history = History::new(snapshot_of(0));
        for i in 1..=60 {
            history.push(snapshot_of(i));
        }
        // The first undo must land on the snapshot pushed just before the
        // latest one, not drift from eviction.
        assert_eq!(history.undo().map(Vec::len), Some(59));
    }
}
