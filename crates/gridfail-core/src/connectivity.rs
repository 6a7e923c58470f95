//! Island detection over the active part of the grid.
//!
//! Only active nodes participate, and a line only joins its endpoints when the
//! line and both endpoints are active. A grid with no active nodes counts as
//! connected.

use crate::{Grid, NodeId};
use petgraph::unionfind::UnionFind;
use serde::Serialize;

/// Summary statistics used by `gridfail show` (degree over active lines only).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridStats {
    pub node_count: usize,
    pub active_nodes: usize,
    pub line_count: usize,
    pub active_lines: usize,
    pub components: usize,
    pub min_degree: usize,
    pub avg_degree: f64,
    pub max_degree: usize,
}

/// Calculates node/line tallies, component count, and the active-degree distribution.
pub fn grid_stats(grid: &Grid) -> GridStats {
    let mut degrees = Vec::with_capacity(grid.node_count());
    for node in grid.nodes().filter(|node| node.active) {
        degrees.push(live_neighbors(grid, node.id).len());
    }
    let min_degree = degrees.iter().copied().min().unwrap_or(0);
    let max_degree = degrees.iter().copied().max().unwrap_or(0);
    let avg_degree = if degrees.is_empty() {
        0.0
    } else {
        degrees.iter().sum::<usize>() as f64 / degrees.len() as f64
    };
    GridStats {
        node_count: grid.node_count(),
        active_nodes: grid.active_node_count(),
        line_count: grid.line_count(),
        active_lines: grid.active_line_count(),
        components: find_components(grid).len(),
        min_degree,
        avg_degree,
        max_degree,
    }
}

/// True iff every active node is reachable from every other over active lines.
///
/// Union-find over the live lines; this is the query the critical-component
/// sweep issues once per probed element.
pub fn is_connected(grid: &Grid) -> bool {
    let mut sets = UnionFind::<usize>::new(grid.node_count());
    for line in grid.lines().filter(|line| line.active) {
        if is_live(grid, line.from) && is_live(grid, line.to) {
            sets.union(line.from.value(), line.to.value());
        }
    }
    let mut active = grid.nodes().filter(|node| node.active);
    let Some(first) = active.next() else {
        return true;
    };
    let root = sets.find(first.id.value());
    active.all(|node| sets.find(node.id.value()) == root)
}

/// Partition active nodes into components (depth-first).
///
/// Components are listed in order of their lowest node index; members appear
/// in the order the traversal reaches them, following lines in id order.
pub fn find_components(grid: &Grid) -> Vec<Vec<NodeId>> {
    let mut visited = vec![false; grid.node_count()];
    let mut components = Vec::new();
    for start in grid.nodes().filter(|node| node.active).map(|node| node.id) {
        if visited[start.value()] {
            continue;
        }
        let mut members = Vec::new();
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            if visited[node.value()] {
                continue;
            }
            visited[node.value()] = true;
            members.push(node);
            // Reverse so the lowest line id is explored first
            for neighbor in live_neighbors(grid, node).into_iter().rev() {
                if !visited[neighbor.value()] {
                    stack.push(neighbor);
                }
            }
        }
        components.push(members);
    }
    components
}

fn is_live(grid: &Grid, node: NodeId) -> bool {
    grid.node(node).map(|n| n.active).unwrap_or(false)
}

/// Neighbours of `node` over active lines whose far end is active, in line id order.
fn live_neighbors(grid: &Grid, node: NodeId) -> Vec<NodeId> {
    grid.lines_at(node)
        .map(|lines| {
            lines
                .into_iter()
                .filter(|line| line.active)
                .filter_map(|line| line.other_end(node))
                .filter(|&far| is_live(grid, far))
                .collect()
        })
        .unwrap_or_default()
}

impl Grid {
    /// See [`is_connected`].
    pub fn is_connected(&self) -> bool {
        is_connected(self)
    }

    /// See [`find_components`].
    pub fn find_components(&self) -> Vec<Vec<NodeId>> {
        find_components(self)
    }
}
