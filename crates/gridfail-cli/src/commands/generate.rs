use anyhow::{Context, Result};
use gridfail_cli::GridfailConfig;
use gridfail_io::{generate_seeded, write_grid, Format};
use std::path::Path;
use tracing::info;

use crate::commands::ensure_parent;

pub fn handle(stations: usize, seed: Option<u64>, out: &Path, config: &GridfailConfig) -> Result<()> {
    let seed = seed.or(config.simulation.seed);
    let grid = generate_seeded(stations, seed)
        .with_context(|| format!("generating a {stations}-station grid"))?;
    let format = Format::from_path(out);
    ensure_parent(out)?;
    write_grid(&grid, out, format).with_context(|| format!("writing {}", out.display()))?;
    info!(
        stations,
        lines = grid.line_count(),
        seed = ?seed,
        "Generated grid written to {}",
        out.display()
    );
    Ok(())
}
