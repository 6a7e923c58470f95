//! # gridfail-io: Grid Files, Presets, and Export
//!
//! - [`flat`] - the whitespace token file (`N`, nodes, `M`, lines)
//! - [`json`] - JSON grid documents
//! - [`dot`] - Graphviz export, optionally styled by a cascade outcome
//! - [`format`] - extension-based format selection
//! - [`presets`] - built-in demonstration grids
//! - [`generate`] - seeded ring-with-cross-ties sample grids

pub mod dot;
pub mod error;
pub mod flat;
pub mod format;
pub mod generate;
pub mod json;
pub mod presets;

pub use dot::render_dot;
pub use error::{FormatError, FormatResult};
pub use flat::{parse_flat, read_flat, write_flat, write_flat_file};
pub use format::{read_grid, render_grid, write_grid, Format};
pub use generate::{generate_grid, generate_seeded, DEFAULT_STATIONS};
pub use json::{parse_json, read_json, write_json, write_json_file, GridDocument};
pub use presets::{find_preset, preset_grid, Preset, PRESETS};

use gridfail_core::Grid;
use std::path::Path;

/// Prefix that selects a built-in grid instead of a file.
pub const PRESET_PREFIX: &str = "preset:";

/// Resolve a grid argument: `preset:<name>` or a file path.
pub fn load_grid(source: &str) -> FormatResult<Grid> {
    match source.strip_prefix(PRESET_PREFIX) {
        Some(name) => preset_grid(name),
        None => read_grid(Path::new(source)),
    }
}
