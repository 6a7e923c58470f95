//! Line-driven menu over a single grid. Reads choices from any `BufRead`, so
//! the session runs the same on a terminal, a pipe, or a test buffer.

use anyhow::Result;
use gridfail_algo::CriticalAnalyzer;
use gridfail_cli::GridfailConfig;
use gridfail_core::Grid;
use gridfail_io::{generate_seeded, write_grid, Format, DEFAULT_STATIONS};
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::{info, warn};

use crate::commands::load;
use crate::commands::simulate::{run_cascade, SimulationOptions};
use crate::report;

const MENU: &str = "\
Electric Grid Failure Prediction Menu:
1. Display Grid Status
2. Check Initial Overloads and Connectivity
3. Simulate Uniform Load Increase
4. Simulate Random Load Increase
5. Critical Component Analysis
6. Save Grid to File
7. Load Grid from File
8. Exit";

pub fn handle(source: Option<&str>, config: &GridfailConfig) -> Result<()> {
    let grid = match source {
        Some(source) => load(source)?,
        None => {
            info!("No grid given; generating a {DEFAULT_STATIONS}-station sample grid");
            generate_seeded(DEFAULT_STATIONS, config.simulation.seed)?
        }
    };
    let stdin = io::stdin();
    run_session(grid, config, stdin.lock(), io::stdout())
}

/// Drive the menu until `8` or end of input.
pub fn run_session<R: BufRead, W: Write>(
    mut grid: Grid,
    config: &GridfailConfig,
    mut input: R,
    mut out: W,
) -> Result<()> {
    loop {
        writeln!(out, "\n{MENU}")?;
        let Some(choice) = prompt(&mut input, &mut out, "Enter choice: ")? else {
            writeln!(out)?;
            break;
        };
        let outcome = match choice.as_str() {
            "1" => report::write_status(&mut out, &grid, None),
            "2" => report::write_check(&mut out, &grid),
            "3" | "4" => surge(&mut grid, config, choice == "4", &mut input, &mut out),
            "5" => critical(&mut grid, &mut out),
            "6" => save(&grid, &mut input, &mut out),
            "7" => reload(&mut grid, &mut input, &mut out),
            "8" => {
                writeln!(out, "Exiting program.")?;
                break;
            }
            "" => Ok(()),
            _ => {
                writeln!(out, "Invalid choice. Please select 1-8.")?;
                Ok(())
            }
        };
        if let Err(err) = outcome {
            warn!("{err:#}");
            writeln!(out, "Error: {err:#}")?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Print `message` and read one trimmed line; `None` at end of input.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, message: &str) -> Result<Option<String>> {
    write!(out, "{message}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn surge<R: BufRead, W: Write>(
    grid: &mut Grid,
    config: &GridfailConfig,
    random: bool,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let message = if random {
        "Enter base load increase percentage (e.g., 10 for 10%): "
    } else {
        "Enter load increase percentage (e.g., 10 for 10%): "
    };
    let Some(text) = prompt(input, out, message)? else {
        return Ok(());
    };
    let Ok(percent) = text.parse::<f64>() else {
        writeln!(out, "Invalid input. Please enter a number.")?;
        return Ok(());
    };
    let options = SimulationOptions {
        percent,
        random,
        ..Default::default()
    };
    let outcome = run_cascade(grid, options, config)?;
    report::write_cascade(&mut *out, grid, &outcome)
}

fn critical<W: Write>(grid: &mut Grid, out: &mut W) -> Result<()> {
    let outcome = CriticalAnalyzer::new().analyze(grid)?;
    report::write_critical(&mut *out, grid, &outcome)
}

fn save<R: BufRead, W: Write>(grid: &Grid, input: &mut R, out: &mut W) -> Result<()> {
    let Some(name) = prompt(input, out, "Enter filename to save grid: ")? else {
        return Ok(());
    };
    let path = Path::new(&name);
    write_grid(grid, path, Format::from_path(path))?;
    writeln!(out, "Grid saved to {name}")?;
    Ok(())
}

/// A failed load keeps the current grid.
fn reload<R: BufRead, W: Write>(grid: &mut Grid, input: &mut R, out: &mut W) -> Result<()> {
    let Some(name) = prompt(input, out, "Enter filename to load grid: ")? else {
        return Ok(());
    };
    *grid = load(&name)?;
    writeln!(out, "Grid loaded from {name}")?;
    Ok(())
}
