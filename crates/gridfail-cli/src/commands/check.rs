use anyhow::Result;
use gridfail_cli::OutputFormat;
use serde_json::json;
use std::io;

use crate::commands::{load, print_json};
use crate::report;

pub fn handle(source: &str, format: OutputFormat) -> Result<()> {
    let grid = load(source)?;
    match format {
        OutputFormat::Json => {
            let overloads = grid.check_overloads();
            let connected = grid.is_connected();
            print_json(&json!({
                "overloads": overloads,
                "overloaded_line_pairs": overloads.line_pairs(&grid),
                "connected": connected,
                "components": grid.find_components(),
            }))
        }
        OutputFormat::Plain => report::write_check(io::stdout(), &grid),
    }
}
