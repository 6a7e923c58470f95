use anyhow::{Context, Result};
use gridfail_cli::{OutputFormat, PresetCommands};
use gridfail_io::{find_preset, write_flat, write_grid, Format, PRESETS};
use serde_json::json;
use std::io::{self, Write};
use tabwriter::TabWriter;

use crate::commands::{ensure_parent, print_json};

pub fn handle(command: &PresetCommands, default_format: OutputFormat) -> Result<()> {
    match command {
        PresetCommands::List { format } => list(format.unwrap_or(default_format)),
        PresetCommands::Write { name, out } => {
            let preset = find_preset(name)?;
            let grid = preset.build()?;
            match out {
                Some(path) => {
                    ensure_parent(path)?;
                    write_grid(&grid, path, Format::from_path(path))
                        .with_context(|| format!("writing preset {name} to {}", path.display()))?;
                    println!("Wrote preset {} to {}", preset.name, path.display());
                }
                None => print!("{}", write_flat(&grid)),
            }
            Ok(())
        }
    }
}

fn list(format: OutputFormat) -> Result<()> {
    let mut rows = Vec::with_capacity(PRESETS.len());
    for preset in PRESETS {
        let grid = preset.build()?;
        rows.push((preset, grid.node_count(), grid.line_count()));
    }
    match format {
        OutputFormat::Json => {
            let presets: Vec<_> = rows
                .iter()
                .map(|(preset, nodes, lines)| {
                    json!({
                        "name": preset.name,
                        "description": preset.description,
                        "suggested_percent": preset.suggested_percent,
                        "nodes": nodes,
                        "lines": lines,
                    })
                })
                .collect();
            print_json(&presets)
        }
        OutputFormat::Plain => {
            let mut tw = TabWriter::new(io::stdout());
            writeln!(tw, "NAME\tNODES\tLINES\tSURGE\tDESCRIPTION")?;
            for (preset, nodes, lines) in &rows {
                writeln!(
                    tw,
                    "{}\t{}\t{}\t{}%\t{}",
                    preset.name, nodes, lines, preset.suggested_percent, preset.description
                )?;
            }
            tw.flush()?;
            Ok(())
        }
    }
}
