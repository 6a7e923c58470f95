pub mod check;
pub mod completions;
pub mod critical;
pub mod export;
pub mod generate;
pub mod interactive;
pub mod preset;
pub mod show;
pub mod simulate;

use anyhow::{Context, Result};
use gridfail_core::Grid;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Resolve a grid argument (`preset:<name>` or a path).
pub fn load(source: &str) -> Result<Grid> {
    gridfail_io::load_grid(source).with_context(|| format!("loading grid from {source}"))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Create the parent directory of `path` if needed.
pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    Ok(())
}
