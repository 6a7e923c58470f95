//! Format selection for grid files.

use crate::error::{FormatError, FormatResult};
use crate::{dot, flat, json};
use gridfail_core::Grid;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Supported grid file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Whitespace-separated token file
    Flat,
    /// JSON grid document
    Json,
    /// Graphviz text (write only)
    Dot,
}

impl Format {
    pub const ALL: &'static [Format] = &[Format::Flat, Format::Json, Format::Dot];

    /// Expected file extensions for this format.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Format::Flat => &["txt", "grid"],
            Format::Json => &["json"],
            Format::Dot => &["dot", "gv"],
        }
    }

    /// Human-readable format name.
    pub fn friendly_name(&self) -> &'static str {
        match self {
            Format::Flat => "flat grid file",
            Format::Json => "JSON grid document",
            Format::Dot => "Graphviz DOT",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Format::Flat => "flat",
            Format::Json => "json",
            Format::Dot => "dot",
        }
    }

    pub fn is_readable(&self) -> bool {
        !matches!(self, Format::Dot)
    }

    /// Pick a format from a path's extension. Anything unrecognised is flat.
    pub fn from_path(path: &Path) -> Format {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some(ext) if Format::Json.extensions().contains(&ext) => Format::Json,
            Some(ext) if Format::Dot.extensions().contains(&ext) => Format::Dot,
            _ => Format::Flat,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "flat" | "txt" => Ok(Format::Flat),
            "json" => Ok(Format::Json),
            "dot" | "graphviz" => Ok(Format::Dot),
            other => Err(FormatError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Read a grid, choosing the parser from the extension.
pub fn read_grid(path: &Path) -> FormatResult<Grid> {
    match Format::from_path(path) {
        Format::Json => json::read_json(path),
        Format::Flat => flat::read_flat(path),
        Format::Dot => Err(FormatError::UnsupportedFormat(format!(
            "{} cannot be read as a grid",
            path.display()
        ))),
    }
}

/// Render a grid in `format`.
pub fn render_grid(grid: &Grid, format: Format) -> FormatResult<String> {
    match format {
        Format::Flat => Ok(flat::write_flat(grid)),
        Format::Json => json::write_json(grid),
        Format::Dot => Ok(dot::render_dot(grid, None)),
    }
}

/// Write a grid in `format`.
pub fn write_grid(grid: &Grid, path: &Path, format: Format) -> FormatResult<()> {
    fs::write(path, render_grid(grid, format)?)?;
    Ok(())
}
