use anyhow::{Context, Result};
use gridfail_cli::ExportFormat;
use gridfail_io::{write_grid, Format};
use std::path::Path;
use tracing::info;

use crate::commands::{ensure_parent, load};

pub fn handle(source: &str, format: Option<ExportFormat>, out: &Path) -> Result<()> {
    let grid = load(source)?;
    let format = format.map(Format::from).unwrap_or_else(|| Format::from_path(out));
    ensure_parent(out)?;
    write_grid(&grid, out, format)
        .with_context(|| format!("writing {} to {}", format.friendly_name(), out.display()))?;
    info!(
        "Exported {} nodes and {} lines to {} ({})",
        grid.node_count(),
        grid.line_count(),
        out.display(),
        format.friendly_name()
    );
    Ok(())
}
