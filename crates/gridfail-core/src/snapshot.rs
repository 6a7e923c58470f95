//! Point-in-time copies of a grid's operational state.
//!
//! A [`GridSnapshot`] holds every node's `active`/`load` and every line's
//! `active`/`current_load`, indexed like the live grid. Restoring a snapshot
//! is all-or-nothing: a snapshot of the wrong shape is rejected before any
//! element is touched.

use crate::error::{GridError, GridResult};
use crate::Grid;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeState {
    pub active: bool,
    pub load: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineState {
    pub active: bool,
    pub current_load: f64,
}

/// Immutable operational state of a [`Grid`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridSnapshot {
    nodes: Vec<NodeState>,
    lines: Vec<LineState>,
}

impl GridSnapshot {
    pub fn nodes(&self) -> &[NodeState] {
        &self.nodes
    }

    pub fn lines(&self) -> &[LineState] {
        &self.lines
    }
}

impl Grid {
    /// Capture the operational state of every element.
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            nodes: self
                .nodes()
                .map(|node| NodeState {
                    active: node.active,
                    load: node.load,
                })
                .collect(),
            lines: self
                .lines()
                .map(|line| LineState {
                    active: line.active,
                    current_load: line.current_load,
                })
                .collect(),
        }
    }

    /// Roll the grid back to `snapshot`.
    pub fn restore(&mut self, snapshot: &GridSnapshot) -> GridResult<()> {
        if snapshot.nodes.len() != self.node_count() || snapshot.lines.len() != self.line_count()
        {
            return Err(GridError::SnapshotMismatch {
                snapshot_nodes: snapshot.nodes.len(),
                snapshot_lines: snapshot.lines.len(),
                grid_nodes: self.node_count(),
                grid_lines: self.line_count(),
            });
        }
        self.apply(snapshot);
        Ok(())
    }

    /// Run `f` against the grid, then restore the state from before the call.
    ///
    /// Whatever `f` returns (including an `Err`) is passed through after the
    /// rollback, so the grid never escapes in a modified state.
    pub fn with_rollback<T>(&mut self, f: impl FnOnce(&mut Grid) -> T) -> T {
        let snapshot = self.snapshot();
        let out = f(self);
        self.apply(&snapshot);
        out
    }

    // Topology is fixed after construction, so a snapshot taken from this grid
    // always has the right shape.
    fn apply(&mut self, snapshot: &GridSnapshot) {
        for (node, state) in self.nodes_mut().zip(&snapshot.nodes) {
            node.active = state.active;
            node.load = state.load;
        }
        for (line, state) in self.lines_mut().zip(&snapshot.lines) {
            line.active = state.active;
            line.current_load = state.current_load;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ElementRef, GridBuilder, LineId, NodeId};

    fn pair() -> Grid {
        let mut b = GridBuilder::new(2).unwrap();
        b.add_node(0, "A", 1.0, 5.0).unwrap();
        b.add_node(1, "B", 2.0, 5.0).unwrap();
        b.add_edge(0, 1, 4.0, 1.5).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn test_restore_rolls_back_every_field() {
        let mut grid = pair();
        let before = grid.snapshot();
        grid.set_active(ElementRef::Node(NodeId::new(0)), false).unwrap();
        grid.set_active(ElementRef::Line(LineId::new(0)), false).unwrap();
        grid.set_load(ElementRef::Node(NodeId::new(1)), 9.0).unwrap();
        grid.set_load(ElementRef::Line(LineId::new(0)), 7.25).unwrap();
        assert_ne!(grid.snapshot(), before);

        grid.restore(&before).unwrap();
        assert_eq!(grid.snapshot(), before);
    }

    #[test]
    fn test_restore_rejects_foreign_snapshot() {
        let mut grid = pair();
        let mut b = GridBuilder::new(1).unwrap();
        b.add_node(0, "Solo", 0.0, 1.0).unwrap();
        let other = b.build().unwrap().snapshot();

        grid.set_load(ElementRef::Node(NodeId::new(0)), 3.0).unwrap();
        let err = grid.restore(&other).unwrap_err();
        assert!(matches!(err, GridError::SnapshotMismatch { .. }));
        // Untouched by the rejected restore
        assert_eq!(grid.node(NodeId::new(0)).unwrap().load, 3.0);
    }

    #[test]
    fn test_with_rollback_passes_result_through() {
        let mut grid = pair();
        let before = grid.snapshot();
        let result: Result<(), &str> = grid.with_rollback(|g| {
            g.set_active(ElementRef::Node(NodeId::new(1)), false).unwrap();
            Err("boom")
        });
        assert_eq!(result, Err("boom"));
        assert_eq!(grid.snapshot(), before);
    }
}
