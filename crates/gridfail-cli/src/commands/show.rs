use anyhow::Result;
use gridfail_cli::OutputFormat;
use gridfail_core::grid_stats;
use serde_json::json;
use std::io;
use tracing::info;

use crate::commands::{load, print_json};
use crate::report;

pub fn handle(source: &str, format: OutputFormat) -> Result<()> {
    let grid = load(source)?;
    info!(
        "Loaded {} nodes and {} lines from {source}",
        grid.node_count(),
        grid.line_count()
    );
    match format {
        OutputFormat::Json => {
            let nodes: Vec<_> = grid.nodes().collect();
            let lines: Vec<_> = grid.lines().collect();
            print_json(&json!({
                "stats": grid_stats(&grid),
                "nodes": nodes,
                "lines": lines,
            }))
        }
        OutputFormat::Plain => {
            println!("Grid status for {source}:");
            report::write_stats(io::stdout(), &grid)?;
            println!();
            report::write_status(io::stdout(), &grid, None)
        }
    }
}
