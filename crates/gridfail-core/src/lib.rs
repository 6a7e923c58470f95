//! # gridfail-core: Transmission Grid Model
//!
//! Provides the data structures the cascade simulator operates on: substations,
//! transmission lines, and the [`Grid`] that owns them.
//!
//! ## Design Philosophy
//!
//! The grid is an **undirected simple graph** backed by a petgraph `UnGraph`:
//! - **Nodes**: [`Substation`]s with a demand (`load`) and a `max_capacity`
//! - **Edges**: [`Line`]s with a `current_load` and a `capacity`
//!
//! Each line is stored exactly once in the graph's edge arena. Both endpoints
//! see the same record, so the two "views" of a line can never disagree on
//! `active` or `current_load`.
//!
//! Topology is fixed at construction time ([`GridBuilder`]). Afterwards only
//! operational state changes: active flags and loads. That state can be
//! captured with [`Grid::snapshot`] and rolled back with [`Grid::restore`].
//!
//! ## Quick Start
//!
//! ```rust
//! use gridfail_core::*;
//!
//! let mut builder = GridBuilder::new(3).unwrap();
//! builder.add_node(0, "A", 8.0, 10.0).unwrap();
//! builder.add_node(1, "B", 5.0, 10.0).unwrap();
//! builder.add_node(2, "C", 5.0, 10.0).unwrap();
//! builder.add_edge(0, 1, 10.0, 9.0).unwrap();
//! builder.add_edge(1, 2, 10.0, 2.0).unwrap();
//! let grid = builder.build().unwrap();
//!
//! assert!(grid.is_connected());
//! assert!(grid.check_overloads().is_empty());
//! ```
//!
//! ## Modules
//!
//! - [`connectivity`] - island detection over the active subgraph
//! - [`overload`] - load-vs-capacity scans
//! - [`snapshot`] - point-in-time copies of operational state
//! - [`error`] - [`GridError`] and [`GridResult`]

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod connectivity;
pub mod error;
pub mod grid;
pub mod overload;
pub mod snapshot;

pub use connectivity::{find_components, grid_stats, is_connected, GridStats};
pub use error::{GridError, GridResult};
pub use grid::{Grid, GridBuilder};
pub use overload::{check_overloads, OverloadSet};
pub use snapshot::{GridSnapshot, LineState, NodeState};

// Newtype wrappers for IDs for type safety
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(usize);
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LineId(usize);

impl NodeId {
    #[inline]
    pub fn new(value: usize) -> Self {
        NodeId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl LineId {
    #[inline]
    pub fn new(value: usize) -> Self {
        LineId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A substation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Substation {
    pub id: NodeId,
    pub name: String,
    /// Current demand in MW
    pub load: f64,
    /// Rated capacity in MW
    pub max_capacity: f64,
    /// Operational status flag
    pub active: bool,
}

impl Substation {
    /// Ratio of demand to capacity.
    pub fn severity(&self) -> f64 {
        self.load / self.max_capacity
    }

    /// Active and at or above capacity. Equality counts as overload.
    pub fn is_overloaded(&self) -> bool {
        self.active && self.load >= self.max_capacity
    }
}

/// A transmission line between two distinct substations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub id: LineId,
    pub from: NodeId,
    pub to: NodeId,
    /// Thermal limit in MW
    pub capacity: f64,
    /// Current flow in MW
    pub current_load: f64,
    /// Operational status flag
    pub active: bool,
}

impl Line {
    /// Ratio of flow to capacity.
    pub fn severity(&self) -> f64 {
        self.current_load / self.capacity
    }

    /// Unused capacity. Negative when the line is overloaded.
    pub fn slack(&self) -> f64 {
        self.capacity - self.current_load
    }

    /// Active and at or above capacity. Equality counts as overload.
    pub fn is_overloaded(&self) -> bool {
        self.active && self.current_load >= self.capacity
    }

    /// The endpoint opposite `node`, or `None` if `node` is not an endpoint.
    pub fn other_end(&self, node: NodeId) -> Option<NodeId> {
        if node == self.from {
            Some(self.to)
        } else if node == self.to {
            Some(self.from)
        } else {
            None
        }
    }

    /// Endpoints as an unordered pair, smaller index first.
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        if self.from <= self.to {
            (self.from, self.to)
        } else {
            (self.to, self.from)
        }
    }
}

/// Reference to a single grid element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ElementRef {
    Node(NodeId),
    Line(LineId),
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementRef::Node(id) => write!(f, "node {id}"),
            ElementRef::Line(id) => write!(f, "line {id}"),
        }
    }
}
