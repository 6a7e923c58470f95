//! Graphviz export.
//!
//! Nodes are emitted as `n{index}` with their name and load, lines as
//! undirected `--` edges. When an operational state is supplied (usually a
//! cascade's final state), failed elements are drawn dashed grey and
//! overloaded survivors red.

use gridfail_core::{Grid, GridSnapshot};
use std::fmt::Write as _;

const FAILED_STYLE: &str = "style=dashed, color=gray";
const OVERLOADED_STYLE: &str = "color=red";

/// Render `grid` as a DOT graph, styled by `state` when given.
pub fn render_dot(grid: &Grid, state: Option<&GridSnapshot>) -> String {
    let mut buffer = String::new();
    buffer.push_str("graph gridfail {\n");
    for node in grid.nodes() {
        let (active, load) = state
            .and_then(|s| s.nodes().get(node.id.value()))
            .map(|s| (s.active, s.load))
            .unwrap_or((node.active, node.load));
        let label = sanitize_label(&format!(
            "{}\\n{:.2}/{:.2}",
            node.name, load, node.max_capacity
        ));
        let _ = write!(buffer, "  n{} [label=\"{}\"", node.id, label);
        if let Some(style) = style_for(active, load, node.max_capacity) {
            let _ = write!(buffer, ", {style}");
        }
        buffer.push_str("];\n");
    }
    for line in grid.lines() {
        let (active, load) = state
            .and_then(|s| s.lines().get(line.id.value()))
            .map(|s| (s.active, s.current_load))
            .unwrap_or((line.active, line.current_load));
        let _ = write!(
            buffer,
            "  n{} -- n{} [label=\"{:.2}/{:.2}\"",
            line.from, line.to, load, line.capacity
        );
        if let Some(style) = style_for(active, load, line.capacity) {
            let _ = write!(buffer, ", {style}");
        }
        buffer.push_str("];\n");
    }
    buffer.push('}');
    buffer.push('\n');
    buffer
}

fn style_for(active: bool, load: f64, capacity: f64) -> Option<&'static str> {
    if !active {
        Some(FAILED_STYLE)
    } else if load >= capacity {
        Some(OVERLOADED_STYLE)
    } else {
        None
    }
}

fn sanitize_label(label: &str) -> String {
    label.replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridfail_core::{ElementRef, GridBuilder, LineId, NodeId};

    fn grid() -> Grid {
        let mut b = GridBuilder::new(3).unwrap();
        b.add_node(0, "A", 8.0, 10.0).unwrap();
        b.add_node(1, "B\"x", 5.0, 10.0).unwrap();
        b.add_node(2, "C", 5.0, 10.0).unwrap();
        b.add_edge(0, 1, 10.0, 9.0).unwrap();
        b.add_edge(1, 2, 10.0, 2.0).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn test_plain_render() {
        let dot = render_dot(&grid(), None);
        assert!(dot.starts_with("graph gridfail {\n"));
        assert!(dot.contains("n0 [label=\"A\\n8.00/10.00\"];"));
        assert!(dot.contains("B\\\"x"));
        assert!(dot.contains("n0 -- n1 [label=\"9.00/10.00\"];"));
        assert!(!dot.contains("dashed"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_state_styles_failed_and_overloaded() {
        let mut g = grid();
        g.set_active(ElementRef::Line(LineId::new(0)), false).unwrap();
        g.set_load(ElementRef::Line(LineId::new(1)), 12.0).unwrap();
        g.set_active(ElementRef::Node(NodeId::new(2)), false).unwrap();
        let state = g.snapshot();

        let dot = render_dot(&grid(), Some(&state));
        assert!(dot.contains("n0 -- n1 [label=\"9.00/10.00\", style=dashed, color=gray];"));
        assert!(dot.contains("n1 -- n2 [label=\"12.00/10.00\", color=red];"));
        assert!(dot.contains("n2 [label=\"C\\n5.00/10.00\", style=dashed, color=gray];"));
    }
}
