//! The grid container and its staged builder.

use crate::error::{GridError, GridResult};
use crate::{ElementRef, Line, LineId, NodeId, Substation};
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use std::collections::HashSet;

/// An owned, fixed-topology transmission grid.
///
/// Node ids are `0..node_count()` and line ids are `0..line_count()`, both in
/// construction order. Neither set changes after [`GridBuilder::build`].
#[derive(Debug, Clone)]
pub struct Grid {
    graph: UnGraph<Substation, Line>,
}

impl Grid {
    /// Start building a grid with `node_count` substation slots.
    pub fn builder(node_count: usize) -> GridResult<GridBuilder> {
        GridBuilder::new(node_count)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn line_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node(&self, id: NodeId) -> GridResult<&Substation> {
        self.graph
            .node_weight(NodeIndex::new(id.value()))
            .ok_or(GridError::UnknownNode(id.value()))
    }

    pub fn line(&self, id: LineId) -> GridResult<&Line> {
        self.graph
            .edge_weight(EdgeIndex::new(id.value()))
            .ok_or(GridError::UnknownLine(id.value()))
    }

    fn node_mut(&mut self, id: NodeId) -> GridResult<&mut Substation> {
        self.graph
            .node_weight_mut(NodeIndex::new(id.value()))
            .ok_or(GridError::UnknownNode(id.value()))
    }

    fn line_mut(&mut self, id: LineId) -> GridResult<&mut Line> {
        self.graph
            .edge_weight_mut(EdgeIndex::new(id.value()))
            .ok_or(GridError::UnknownLine(id.value()))
    }

    /// Substations in index order.
    pub fn nodes(&self) -> impl Iterator<Item = &Substation> {
        self.graph.node_weights()
    }

    /// Lines in index order.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.graph.edge_weights()
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Substation> {
        self.graph.node_weights_mut()
    }

    pub(crate) fn lines_mut(&mut self) -> impl Iterator<Item = &mut Line> {
        self.graph.edge_weights_mut()
    }

    /// Lines incident to `node`, ordered by line id (active or not).
    pub fn lines_at(&self, node: NodeId) -> GridResult<Vec<&Line>> {
        self.node(node)?;
        let mut lines: Vec<&Line> = self
            .graph
            .edges(NodeIndex::new(node.value()))
            .map(|edge| edge.weight())
            .collect();
        lines.sort_by_key(|line| line.id);
        Ok(lines)
    }

    /// The line joining `a` and `b`, in either direction.
    pub fn find_line(&self, a: NodeId, b: NodeId) -> Option<&Line> {
        if a.value() >= self.node_count() || b.value() >= self.node_count() {
            return None;
        }
        self.graph
            .find_edge(NodeIndex::new(a.value()), NodeIndex::new(b.value()))
            .and_then(|idx| self.graph.edge_weight(idx))
    }

    pub fn node_by_name(&self, name: &str) -> Option<&Substation> {
        self.nodes().find(|node| node.name == name)
    }

    pub fn is_active(&self, element: ElementRef) -> GridResult<bool> {
        match element {
            ElementRef::Node(id) => Ok(self.node(id)?.active),
            ElementRef::Line(id) => Ok(self.line(id)?.active),
        }
    }

    pub fn set_active(&mut self, element: ElementRef, active: bool) -> GridResult<()> {
        match element {
            ElementRef::Node(id) => self.node_mut(id)?.active = active,
            ElementRef::Line(id) => self.line_mut(id)?.active = active,
        }
        Ok(())
    }

    /// Demand of a node or flow of a line.
    pub fn load(&self, element: ElementRef) -> GridResult<f64> {
        match element {
            ElementRef::Node(id) => Ok(self.node(id)?.load),
            ElementRef::Line(id) => Ok(self.line(id)?.current_load),
        }
    }

    /// Rated capacity of a node or line.
    pub fn capacity(&self, element: ElementRef) -> GridResult<f64> {
        match element {
            ElementRef::Node(id) => Ok(self.node(id)?.max_capacity),
            ElementRef::Line(id) => Ok(self.line(id)?.capacity),
        }
    }

    /// Overwrite the demand of a node or the flow of a line.
    ///
    /// Loads above capacity are accepted (that is how overloads arise); negative
    /// or non-finite loads are rejected.
    pub fn set_load(&mut self, element: ElementRef, load: f64) -> GridResult<()> {
        if !load.is_finite() || load < 0.0 {
            return Err(GridError::validation(
                "load",
                format!("must be a finite value >= 0, got {load}"),
            ));
        }
        match element {
            ElementRef::Node(id) => self.node_mut(id)?.load = load,
            ElementRef::Line(id) => self.line_mut(id)?.current_load = load,
        }
        Ok(())
    }

    pub fn active_node_count(&self) -> usize {
        self.nodes().filter(|node| node.active).count()
    }

    pub fn active_line_count(&self) -> usize {
        self.lines().filter(|line| line.active).count()
    }
}

/// Staged, validating constructor for [`Grid`].
///
/// Every `add_*` call is checked in full before anything is recorded, so a
/// rejected call leaves the builder unchanged.
#[derive(Debug, Clone)]
pub struct GridBuilder {
    slots: Vec<Option<Substation>>,
    lines: Vec<Line>,
    pairs: HashSet<(usize, usize)>,
}

impl GridBuilder {
    pub fn new(node_count: usize) -> GridResult<Self> {
        if node_count == 0 {
            return Err(GridError::validation("node_count", "must be > 0"));
        }
        Ok(Self {
            slots: vec![None; node_count],
            lines: Vec::new(),
            pairs: HashSet::new(),
        })
    }

    pub fn node_count(&self) -> usize {
        self.slots.len()
    }

    /// Populate node slot `index`.
    pub fn add_node(
        &mut self,
        index: usize,
        name: impl Into<String>,
        load: f64,
        max_capacity: f64,
    ) -> GridResult<NodeId> {
        let name = name.into();
        let n = self.slots.len();
        if index >= n {
            return Err(GridError::validation(
                "index",
                format!("node index {index} out of range 0..{}", n - 1),
            ));
        }
        if self.slots[index].is_some() {
            return Err(GridError::validation(
                "index",
                format!("node index {index} already populated"),
            ));
        }
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(GridError::validation(
                "name",
                format!("node name must be a non-empty token without whitespace, got {name:?}"),
            ));
        }
        if !load.is_finite() || load < 0.0 {
            return Err(GridError::validation(
                "load",
                format!("load of node {name} must be >= 0, got {load}"),
            ));
        }
        if !max_capacity.is_finite() || max_capacity <= 0.0 {
            return Err(GridError::validation(
                "max_capacity",
                format!("max capacity of node {name} must be > 0, got {max_capacity}"),
            ));
        }
        if load > max_capacity {
            return Err(GridError::validation(
                "load",
                format!("load {load} of node {name} exceeds max capacity {max_capacity}"),
            ));
        }
        let id = NodeId::new(index);
        self.slots[index] = Some(Substation {
            id,
            name,
            load,
            max_capacity,
            active: true,
        });
        Ok(id)
    }

    /// Add an undirected line between two distinct nodes.
    pub fn add_edge(
        &mut self,
        from: usize,
        to: usize,
        capacity: f64,
        current_load: f64,
    ) -> GridResult<LineId> {
        let n = self.slots.len();
        if from >= n {
            return Err(GridError::validation(
                "from",
                format!("node index {from} out of range 0..{}", n - 1),
            ));
        }
        if to >= n {
            return Err(GridError::validation(
                "to",
                format!("node index {to} out of range 0..{}", n - 1),
            ));
        }
        if from == to {
            return Err(GridError::validation(
                "to",
                format!("self-loops are not allowed: {from} to {to}"),
            ));
        }
        if !capacity.is_finite() || capacity <= 0.0 {
            return Err(GridError::validation(
                "capacity",
                format!("capacity of line {from}-{to} must be > 0, got {capacity}"),
            ));
        }
        if !current_load.is_finite() || current_load < 0.0 {
            return Err(GridError::validation(
                "current_load",
                format!("load of line {from}-{to} must be >= 0, got {current_load}"),
            ));
        }
        let pair = (from.min(to), from.max(to));
        if self.pairs.contains(&pair) {
            return Err(GridError::validation(
                "to",
                format!("duplicate line between {from} and {to}"),
            ));
        }
        let id = LineId::new(self.lines.len());
        self.pairs.insert(pair);
        self.lines.push(Line {
            id,
            from: NodeId::new(from),
            to: NodeId::new(to),
            capacity,
            current_load,
            active: true,
        });
        Ok(id)
    }

    /// Finish construction. Fails if any node slot was never populated.
    pub fn build(self) -> GridResult<Grid> {
        if let Some(missing) = self.slots.iter().position(Option::is_none) {
            return Err(GridError::validation(
                "index",
                format!("node {missing} was never defined"),
            ));
        }
        let mut graph = UnGraph::with_capacity(self.slots.len(), self.lines.len());
        for node in self.slots.into_iter().flatten() {
            graph.add_node(node);
        }
        for line in self.lines {
            let (a, b) = (
                NodeIndex::new(line.from.value()),
                NodeIndex::new(line.to.value()),
            );
            graph.add_edge(a, b, line);
        }
        Ok(Grid { graph })
    }
}
