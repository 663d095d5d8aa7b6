// SPDX-License-Identifier: MIT OR Apache-2.0
//! Snapshot-based undo/redo history.
//!
//! Every recorded edit captures a full deep copy of the document state
//! *before* the mutation. The past stack is bounded; the future stack is
//! cleared by any new edit.

use indexmap::IndexMap;
use std::collections::VecDeque;
use wirescript_graph::{Comment, CommentId, Edge, EdgeId, GraphNode, NodeId};

/// Maximum undo depth; the oldest snapshot is evicted first
pub const HISTORY_LIMIT: usize = 50;

/// A full deep copy of document state at a point in time
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Document name
    pub name: String,
    /// Nodes in document order
    pub nodes: IndexMap<NodeId, GraphNode>,
    /// Edges in document order
    pub edges: IndexMap<EdgeId, Edge>,
    /// Canvas comments
    pub comments: IndexMap<CommentId, Comment>,
    /// Stable document identity
    pub project_id: String,
    /// Primary selected node
    pub selected_node: Option<NodeId>,
}

/// Undo/redo stacks
///
/// Invariant: the past stack holds snapshots strictly older than the
/// current state and the future stack strictly newer; any recorded edit
/// invalidates the future stack entirely.
#[derive(Debug, Default)]
pub struct History {
    past: VecDeque<Snapshot>,
    future: Vec<Snapshot>,
}

impl History {
    /// Create empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the pre-mutation state of a new edit.
    ///
    /// Evicts the oldest snapshot beyond [`HISTORY_LIMIT`] and clears the
    /// future stack.
    pub fn record(&mut self, snapshot: Snapshot) {
        self.past.push_back(snapshot);
        while self.past.len() > HISTORY_LIMIT {
            self.past.pop_front();
        }
        self.future.clear();
    }

    /// Step back: the current state moves onto the future stack and the
    /// most recent past snapshot becomes current. `None` when there is
    /// nothing to undo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.past.pop_back()?;
        self.future.push(current);
        Some(previous)
    }

    /// Mirror of [`History::undo`]
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.future.pop()?;
        self.past.push_back(current);
        Some(next)
    }

    /// Whether an undo step is available
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Whether a redo step is available
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of past snapshots
    pub fn past_depth(&self) -> usize {
        self.past.len()
    }

    /// Number of future snapshots
    pub fn future_depth(&self) -> usize {
        self.future.len()
    }

    /// Drop both stacks
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(name: &str) -> Snapshot {
        Snapshot {
            name: name.to_string(),
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
            comments: IndexMap::new(),
            project_id: "p".to_string(),
            selected_node: None,
        }
    }

    #[test]
    fn test_limit_evicts_oldest() {
        let mut history = History::new();
        for i in 0..60 {
            history.record(snapshot(&format!("edit-{i}")));
        }
        assert_eq!(history.past_depth(), HISTORY_LIMIT);

        // Undo all the way down: the deepest reachable state is the 11th
        // recorded edit, the first ten were evicted.
        let mut current = snapshot("current");
        for _ in 0..HISTORY_LIMIT {
            current = history.undo(current).unwrap();
        }
        assert_eq!(current.name, "edit-10");
        assert!(!history.can_undo());
    }

    #[test]
    fn test_record_clears_future() {
        let mut history = History::new();
        history.record(snapshot("first"));
        history.record(snapshot("second"));

        let restored = history.undo(snapshot("current")).unwrap();
        assert_eq!(restored.name, "second");
        assert!(history.can_redo());

        history.record(snapshot("branch"));
        assert!(!history.can_redo());
        assert!(history.redo(snapshot("x")).is_none());
    }

    #[test]
    fn test_undo_redo_mirror() {
        let mut history = History::new();
        history.record(snapshot("old"));

        let old = history.undo(snapshot("new")).unwrap();
        assert_eq!(old.name, "old");
        let new = history.redo(old).unwrap();
        assert_eq!(new.name, "new");
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_empty_stacks_noop() {
        let mut history = History::new();
        assert!(history.undo(snapshot("a")).is_none());
        assert!(history.redo(snapshot("a")).is_none());
    }
}
