use anyhow::{Context, Result};
use gridfail_algo::CriticalAnalyzer;
use gridfail_cli::OutputFormat;
use std::io;
use tracing::info;

use crate::commands::{load, print_json};
use crate::report;

pub fn handle(source: &str, format: OutputFormat) -> Result<()> {
    let mut grid = load(source)?;
    let report = CriticalAnalyzer::new()
        .analyze(&mut grid)
        .context("running critical component analysis")?;
    info!(
        "{} critical nodes, {} critical lines",
        report.critical_nodes.len(),
        report.critical_lines.len()
    );
    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Plain => report::write_critical(io::stdout(), &grid, &report),
    }
}
