//! Load-vs-capacity scans.

use crate::{ElementRef, Grid, LineId, NodeId};
use serde::Serialize;

/// Elements that are active and at or above their rated capacity.
///
/// Both lists are in ascending id order. Each line appears once regardless of
/// which endpoint it is viewed from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverloadSet {
    pub nodes: Vec<NodeId>,
    pub lines: Vec<LineId>,
}

impl OverloadSet {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len() + self.lines.len()
    }

    /// Nodes first, then lines.
    pub fn elements(&self) -> impl Iterator<Item = ElementRef> + '_ {
        self.nodes
            .iter()
            .map(|&id| ElementRef::Node(id))
            .chain(self.lines.iter().map(|&id| ElementRef::Line(id)))
    }

    /// Overloaded lines as unordered endpoint pairs (smaller index first).
    pub fn line_pairs(&self, grid: &Grid) -> Vec<(NodeId, NodeId)> {
        self.lines
            .iter()
            .filter_map(|&id| grid.line(id).ok())
            .map(|line| line.endpoints())
            .collect()
    }
}

/// Scan every node and line. Equality with capacity counts as overload.
pub fn check_overloads(grid: &Grid) -> OverloadSet {
    OverloadSet {
        nodes: grid
            .nodes()
            .filter(|node| node.is_overloaded())
            .map(|node| node.id)
            .collect(),
        lines: grid
            .lines()
            .filter(|line| line.is_overloaded())
            .map(|line| line.id)
            .collect(),
    }
}

impl Grid {
    /// See [`check_overloads`].
    pub fn check_overloads(&self) -> OverloadSet {
        check_overloads(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GridBuilder;

    fn stressed() -> Grid {
        let mut b = GridBuilder::new(3).unwrap();
        b.add_node(0, "A", 10.0, 10.0).unwrap();
        b.add_node(1, "B", 9.99, 10.0).unwrap();
        b.add_node(2, "C", 1.0, 10.0).unwrap();
        b.add_edge(2, 0, 5.0, 5.0).unwrap();
        b.add_edge(0, 1, 5.0, 4.0).unwrap();
        b.add_edge(1, 2, 5.0, 6.0).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn test_inclusive_threshold() {
        let overloads = stressed().check_overloads();
        assert_eq!(overloads.nodes, vec![NodeId::new(0)]);
        assert_eq!(overloads.lines, vec![LineId::new(0), LineId::new(2)]);
        assert_eq!(overloads.len(), 3);
    }

    #[test]
    fn test_line_pairs_are_unordered() {
        let grid = stressed();
        let pairs = grid.check_overloads().line_pairs(&grid);
        assert_eq!(
            pairs,
            vec![
                (NodeId::new(0), NodeId::new(2)),
                (NodeId::new(1), NodeId::new(2))
            ]
        );
    }

    #[test]
    fn test_inactive_elements_are_ignored() {
        let mut grid = stressed();
        grid.set_active(ElementRef::Node(NodeId::new(0)), false).unwrap();
        grid.set_active(ElementRef::Line(LineId::new(2)), false).unwrap();
        let overloads = grid.check_overloads();
        assert!(overloads.nodes.is_empty());
        assert_eq!(overloads.lines, vec![LineId::new(0)]);
    }

    #[test]
    fn test_detection_is_idempotent() {
        let grid = stressed();
        assert_eq!(grid.check_overloads(), grid.check_overloads());
    }

    #[test]
    fn test_elements_lists_nodes_first() {
        let elements: Vec<ElementRef> = stressed().check_overloads().elements().collect();
        assert_eq!(elements[0], ElementRef::Node(NodeId::new(0)));
        assert_eq!(elements.len(), 3);
    }
}
