//! N-1 style critical-element screening.
//!
//! Each active node and each active line is removed on its own and the
//! consequence checked:
//!
//! - a node is critical if losing it splits the grid;
//! - a line is critical if losing it splits the grid, or if redistributing
//!   its flow leaves anything overloaded.
//!
//! Every probe runs under [`Grid::with_rollback`], so probes are independent
//! of each other and of the order they run in.

use crate::error::CascadeResult;
use crate::redistribution::{ProportionalSlack, RedistributionPolicy};
use gridfail_core::{ElementRef, Grid, GridResult, LineId, NodeId, OverloadSet};
use serde::Serialize;

/// Why an element was classified critical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Criticality {
    /// Removing the element leaves this many components
    Disconnects { components: usize },
    /// Redistributing the element's flow overloads these elements
    Overloads { overloads: OverloadSet },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriticalElement {
    pub element: ElementRef,
    pub criticality: Criticality,
}

/// Screening result, nodes and lines each in index order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriticalReport {
    /// Whether the grid was connected before any probe. When false every
    /// probe reports [`Criticality::Disconnects`].
    pub base_connected: bool,
    pub nodes_tested: usize,
    pub lines_tested: usize,
    pub critical_nodes: Vec<CriticalElement>,
    pub critical_lines: Vec<CriticalElement>,
}

impl CriticalReport {
    pub fn is_empty(&self) -> bool {
        self.critical_nodes.is_empty() && self.critical_lines.is_empty()
    }

    pub fn critical_node_ids(&self) -> Vec<NodeId> {
        self.critical_nodes
            .iter()
            .filter_map(|c| match c.element {
                ElementRef::Node(id) => Some(id),
                ElementRef::Line(_) => None,
            })
            .collect()
    }

    pub fn critical_line_ids(&self) -> Vec<LineId> {
        self.critical_lines
            .iter()
            .filter_map(|c| match c.element {
                ElementRef::Line(id) => Some(id),
                ElementRef::Node(_) => None,
            })
            .collect()
    }
}

/// Runs single-element removal probes against a grid.
#[derive(Debug, Clone)]
pub struct CriticalAnalyzer<P = ProportionalSlack> {
    policy: P,
}

impl CriticalAnalyzer<ProportionalSlack> {
    pub fn new() -> Self {
        Self {
            policy: ProportionalSlack,
        }
    }
}

impl Default for CriticalAnalyzer<ProportionalSlack> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: RedistributionPolicy> CriticalAnalyzer<P> {
    pub fn with_policy(policy: P) -> Self {
        Self { policy }
    }

    /// Probe every active element. The grid is unchanged afterwards.
    pub fn analyze(&self, grid: &mut Grid) -> CascadeResult<CriticalReport> {
        let base_connected = grid.is_connected();
        let nodes: Vec<NodeId> = grid
            .nodes()
            .filter(|node| node.active)
            .map(|node| node.id)
            .collect();
        let lines: Vec<LineId> = grid
            .lines()
            .filter(|line| line.active)
            .map(|line| line.id)
            .collect();

        let mut critical_nodes = Vec::new();
        for &id in &nodes {
            let element = ElementRef::Node(id);
            if let Some(criticality) = grid.with_rollback(|g| probe_node(g, id))? {
                critical_nodes.push(CriticalElement {
                    element,
                    criticality,
                });
            }
        }

        let mut critical_lines = Vec::new();
        for &id in &lines {
            let element = ElementRef::Line(id);
            if let Some(criticality) = grid.with_rollback(|g| self.probe_line(g, id))? {
                critical_lines.push(CriticalElement {
                    element,
                    criticality,
                });
            }
        }

        Ok(CriticalReport {
            base_connected,
            nodes_tested: nodes.len(),
            lines_tested: lines.len(),
            critical_nodes,
            critical_lines,
        })
    }

    fn probe_line(&self, grid: &mut Grid, id: LineId) -> GridResult<Option<Criticality>> {
        let line = grid.line(id)?;
        let load = line.current_load;
        let endpoints = (line.from, line.to);
        grid.set_active(ElementRef::Line(id), false)?;
        if let Some(split) = disconnection(grid) {
            return Ok(Some(split));
        }
        self.policy.redistribute(grid, load, endpoints)?;
        let overloads = grid.check_overloads();
        if overloads.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Criticality::Overloads { overloads }))
        }
    }
}

fn probe_node(grid: &mut Grid, id: NodeId) -> GridResult<Option<Criticality>> {
    grid.set_active(ElementRef::Node(id), false)?;
    Ok(disconnection(grid))
}

fn disconnection(grid: &Grid) -> Option<Criticality> {
    if grid.is_connected() {
        None
    } else {
        Some(Criticality::Disconnects {
            components: grid.find_components().len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridfail_core::GridBuilder;

    fn path() -> Grid {
        let mut b = GridBuilder::new(3).unwrap();
        b.add_node(0, "A", 1.0, 10.0).unwrap();
        b.add_node(1, "B", 1.0, 10.0).unwrap();
        b.add_node(2, "C", 1.0, 10.0).unwrap();
        b.add_edge(0, 1, 10.0, 1.0).unwrap();
        b.add_edge(1, 2, 10.0, 1.0).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn test_path_middle_node_is_critical() {
        let mut grid = path();
        let report = CriticalAnalyzer::new().analyze(&mut grid).unwrap();
        assert!(report.base_connected);
        assert_eq!(report.critical_node_ids(), vec![NodeId::new(1)]);
        assert_eq!(
            report.critical_nodes[0].criticality,
            Criticality::Disconnects { components: 2 }
        );
        // Both lines of a path are bridges
        assert_eq!(
            report.critical_line_ids(),
            vec![LineId::new(0), LineId::new(1)]
        );
        assert_eq!(report.nodes_tested, 3);
        assert_eq!(report.lines_tested, 2);
    }

    #[test]
    fn test_line_critical_by_overload() {
        // Triangle: losing 0-1 pushes its 6.0 onto 0-2 and 1-2 (slack 1 each)
        let mut b = GridBuilder::new(3).unwrap();
        for i in 0..3 {
            b.add_node(i, format!("N{i}"), 1.0, 10.0).unwrap();
        }
        b.add_edge(0, 1, 10.0, 6.0).unwrap();
        b.add_edge(0, 2, 5.0, 4.0).unwrap();
        b.add_edge(1, 2, 5.0, 4.0).unwrap();
        let mut grid = b.build().unwrap();
        let before = grid.snapshot();

        let report = CriticalAnalyzer::new().analyze(&mut grid).unwrap();
        assert!(report.critical_nodes.is_empty());
        let first = &report.critical_lines[0];
        assert_eq!(first.element, ElementRef::Line(LineId::new(0)));
        match &first.criticality {
            Criticality::Overloads { overloads } => {
                assert_eq!(overloads.lines, vec![LineId::new(1), LineId::new(2)]);
            }
            other => panic!("expected overload, got {other:?}"),
        }
        assert_eq!(grid.snapshot(), before);
    }

    #[test]
    fn test_ring_has_no_disconnecting_element() {
        let mut b = GridBuilder::new(4).unwrap();
        for i in 0..4 {
            b.add_node(i, format!("N{i}"), 1.0, 10.0).unwrap();
        }
        for i in 0..4 {
            b.add_edge(i, (i + 1) % 4, 100.0, 1.0).unwrap();
        }
        let mut grid = b.build().unwrap();
        let report = CriticalAnalyzer::new().analyze(&mut grid).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_inactive_elements_are_skipped() {
        let mut grid = path();
        grid.set_active(ElementRef::Line(LineId::new(1)), false)
            .unwrap();
        grid.set_active(ElementRef::Node(NodeId::new(2)), false)
            .unwrap();
        let report = CriticalAnalyzer::new().analyze(&mut grid).unwrap();
        assert_eq!(report.nodes_tested, 2);
        assert_eq!(report.lines_tested, 1);
        // A-B: removing either endpoint leaves a single node
        assert!(report.critical_nodes.is_empty());
        assert_eq!(report.critical_line_ids(), vec![LineId::new(0)]);
    }
}
