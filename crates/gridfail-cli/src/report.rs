//! Plain-text renderings of grid state and analysis results.

use anyhow::Result;
use gridfail_algo::{CascadeReport, CriticalReport, Criticality};
use gridfail_core::{grid_stats, ElementRef, Grid, GridSnapshot, NodeId, OverloadSet};
use std::io::Write;
use tabwriter::TabWriter;

pub fn node_name(grid: &Grid, id: NodeId) -> String {
    grid.node(id)
        .map(|node| node.name.clone())
        .unwrap_or_else(|_| id.to_string())
}

pub fn element_name(grid: &Grid, element: ElementRef) -> String {
    match element {
        ElementRef::Node(id) => format!("node {}", node_name(grid, id)),
        ElementRef::Line(id) => match grid.line(id) {
            Ok(line) => format!(
                "line {}-{}",
                node_name(grid, line.from),
                node_name(grid, line.to)
            ),
            Err(_) => format!("line {id}"),
        },
    }
}

fn status(active: bool) -> &'static str {
    if active {
        "Active"
    } else {
        "Failed"
    }
}

/// Per-element load table. `state` overrides the grid's own flags and loads.
pub fn write_status<W: Write>(out: W, grid: &Grid, state: Option<&GridSnapshot>) -> Result<()> {
    let mut tw = TabWriter::new(out);
    writeln!(tw, "NODE\tLOAD (MW)\tCAPACITY (MW)\tSTATUS")?;
    for node in grid.nodes() {
        let (active, load) = state
            .and_then(|s| s.nodes().get(node.id.value()))
            .map(|s| (s.active, s.load))
            .unwrap_or((node.active, node.load));
        writeln!(
            tw,
            "{}\t{:.2}\t{:.2}\t{}",
            node.name,
            load,
            node.max_capacity,
            status(active)
        )?;
    }
    writeln!(tw)?;
    writeln!(tw, "LINE\tLOAD (MW)\tCAPACITY (MW)\tSTATUS")?;
    for line in grid.lines() {
        let (active, load) = state
            .and_then(|s| s.lines().get(line.id.value()))
            .map(|s| (s.active, s.current_load))
            .unwrap_or((line.active, line.current_load));
        writeln!(
            tw,
            "{}-{}\t{:.2}\t{:.2}\t{}",
            node_name(grid, line.from),
            node_name(grid, line.to),
            load,
            line.capacity,
            status(active)
        )?;
    }
    tw.flush()?;
    Ok(())
}

pub fn write_stats<W: Write>(mut out: W, grid: &Grid) -> Result<()> {
    let stats = grid_stats(grid);
    writeln!(out, "Grid statistics:")?;
    writeln!(
        out,
        "  Nodes         : {} ({} active)",
        stats.node_count, stats.active_nodes
    )?;
    writeln!(
        out,
        "  Lines         : {} ({} active)",
        stats.line_count, stats.active_lines
    )?;
    writeln!(out, "  Components    : {}", stats.components)?;
    writeln!(
        out,
        "  Degree [min/avg/max]: {}/{:.2}/{}",
        stats.min_degree, stats.avg_degree, stats.max_degree
    )?;
    Ok(())
}

fn write_overloads<W: Write>(out: &mut W, grid: &Grid, overloads: &OverloadSet) -> Result<()> {
    if !overloads.nodes.is_empty() {
        writeln!(out, "Overloaded nodes:")?;
        for &id in &overloads.nodes {
            writeln!(out, "- {}", node_name(grid, id))?;
        }
    }
    if !overloads.lines.is_empty() {
        writeln!(out, "Overloaded transmission lines:")?;
        for (a, b) in overloads.line_pairs(grid) {
            writeln!(
                out,
                "- Between {} and {}",
                node_name(grid, a),
                node_name(grid, b)
            )?;
        }
    }
    Ok(())
}

/// Overload scan plus connectivity verdict.
pub fn write_check<W: Write>(mut out: W, grid: &Grid) -> Result<()> {
    let overloads = grid.check_overloads();
    if overloads.is_empty() {
        writeln!(out, "No overloads detected.")?;
    } else {
        writeln!(out, "Overloads detected:")?;
        write_overloads(&mut out, grid, &overloads)?;
    }
    if grid.is_connected() {
        writeln!(out, "Grid is connected.")?;
    } else {
        write_components(&mut out, grid, &grid.find_components())?;
    }
    Ok(())
}

fn write_components<W: Write>(out: &mut W, grid: &Grid, components: &[Vec<NodeId>]) -> Result<()> {
    writeln!(
        out,
        "Grid is disconnected! Number of components: {}",
        components.len()
    )?;
    for (index, members) in components.iter().enumerate() {
        let names: Vec<String> = members.iter().map(|&id| node_name(grid, id)).collect();
        writeln!(out, "Component {}: {}", index + 1, names.join(" "))?;
    }
    Ok(())
}

/// Failure log and final tally of a cascade run.
pub fn write_cascade<W: Write>(mut out: W, grid: &Grid, report: &CascadeReport) -> Result<()> {
    let mode = if report.random { "random" } else { "uniform" };
    writeln!(
        out,
        "Simulating {}% {mode} load increase",
        report.load_increase_percent
    )?;
    if report.is_stable() {
        writeln!(out, "No failures.")?;
    } else {
        writeln!(out, "Failures:")?;
        for record in &report.failures {
            writeln!(
                out,
                "  {:>3}. {} failed (load {:.2} MW, capacity {:.2} MW, severity {:.3})",
                record.step,
                element_name(grid, record.element),
                record.load,
                record.capacity,
                record.severity
            )?;
        }
        writeln!(
            out,
            "Redistributed {:.2} MW, dropped {:.2} MW",
            report.redistributed_load, report.dropped_load
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Final grid state:")?;
    writeln!(
        out,
        "Active nodes: {}/{}",
        report.active_nodes, report.total_nodes
    )?;
    writeln!(
        out,
        "Active lines: {}/{}",
        report.active_lines, report.total_lines
    )?;
    if report.connected {
        writeln!(out, "Grid remains connected.")?;
    } else {
        write_components(&mut out, grid, &report.components)?;
    }
    Ok(())
}

pub fn write_critical<W: Write>(mut out: W, grid: &Grid, report: &CriticalReport) -> Result<()> {
    writeln!(
        out,
        "Critical component analysis ({} nodes, {} lines tested)",
        report.nodes_tested, report.lines_tested
    )?;
    if !report.base_connected {
        writeln!(
            out,
            "Warning: the grid is already disconnected; every removal reports a split."
        )?;
    }
    if report.is_empty() {
        writeln!(out, "No critical components found.")?;
        return Ok(());
    }
    for critical in report.critical_nodes.iter().chain(&report.critical_lines) {
        let reason = match &critical.criticality {
            Criticality::Disconnects { components } => {
                format!("disconnects the grid into {components} components")
            }
            Criticality::Overloads { overloads } => {
                let names: Vec<String> = overloads
                    .elements()
                    .map(|element| element_name(grid, element))
                    .collect();
                format!("overloads {}", names.join(", "))
            }
        };
        writeln!(out, "- {}: {reason}", element_name(grid, critical.element))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridfail_algo::{CascadeEngine, CriticalAnalyzer, NoopObserver, UniformSurge};
    use gridfail_core::GridBuilder;

    fn triangle() -> Grid {
        let mut b = GridBuilder::new(3).unwrap();
        b.add_node(0, "A", 8.0, 10.0).unwrap();
        b.add_node(1, "B", 5.0, 10.0).unwrap();
        b.add_node(2, "C", 5.0, 10.0).unwrap();
        b.add_edge(0, 1, 10.0, 9.0).unwrap();
        b.add_edge(0, 2, 10.0, 2.0).unwrap();
        b.add_edge(1, 2, 10.0, 2.0).unwrap();
        b.build().unwrap()
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_cascade_summary() {
        let mut grid = triangle();
        let report = CascadeEngine::default()
            .simulate(&mut grid, 20.0, UniformSurge, NoopObserver)
            .unwrap();
        let text = render(|buf| write_cascade(buf, &grid, &report));
        assert!(text.contains("Simulating 20% uniform load increase"));
        assert!(text.contains("line A-B failed"));
        assert!(text.contains("Active lines: 2/3"));
        assert!(text.contains("Grid remains connected."));
    }

    #[test]
    fn test_status_table_uses_state() {
        let mut grid = triangle();
        let report = CascadeEngine::default()
            .simulate(&mut grid, 20.0, UniformSurge, NoopObserver)
            .unwrap();
        let live = render(|buf| write_status(buf, &grid, None));
        assert!(!live.contains("Failed"));
        let after = render(|buf| write_status(buf, &grid, Some(&report.final_state)));
        assert!(after.contains("Failed"));
        assert!(after.contains("7.80"));
    }

    #[test]
    fn test_check_and_critical_text() {
        let mut grid = triangle();
        let text = render(|buf| write_check(buf, &grid));
        assert!(text.contains("No overloads detected."));
        assert!(text.contains("Grid is connected."));

        let report = CriticalAnalyzer::new().analyze(&mut grid).unwrap();
        let text = render(|buf| write_critical(buf, &grid, &report));
        assert!(text.contains("3 nodes, 3 lines tested"));
    }
}
