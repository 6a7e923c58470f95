use anyhow::{anyhow, Context, Result};
use gridfail_algo::{CascadeConfig, CascadeEngine, CascadeReport, RandomSurge, UniformSurge};
use gridfail_cli::{GridfailConfig, OutputFormat};
use gridfail_core::Grid;
use gridfail_io::{find_preset, render_dot, PRESET_PREFIX};
use std::fs;
use std::io;
use std::path::Path;
use tracing::info;

use crate::commands::{ensure_parent, load, print_json};
use crate::observer::TracingObserver;
use crate::report;

/// Command-line knobs for one cascade run; unset values fall back to the config.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulationOptions {
    pub percent: f64,
    pub random: bool,
    pub seed: Option<u64>,
    pub max_steps: Option<usize>,
}

/// Run one cascade on `grid`, leaving it untouched.
pub fn run_cascade(
    grid: &mut Grid,
    options: SimulationOptions,
    config: &GridfailConfig,
) -> Result<CascadeReport> {
    let engine = CascadeEngine::new(CascadeConfig {
        max_steps: options.max_steps.or(config.simulation.max_steps),
    });
    let observer = TracingObserver::new(grid);
    let report = if options.random {
        let factors = RandomSurge::from_seed_or_entropy(options.seed.or(config.simulation.seed))
            .with_range(
                config.simulation.random_factor_min,
                config.simulation.random_factor_max,
            )?;
        engine.simulate(grid, options.percent, factors, observer)?
    } else {
        engine.simulate(grid, options.percent, UniformSurge, observer)?
    };
    Ok(report)
}

/// An explicit percent wins; presets fall back to the surge they were built for.
fn resolve_percent(source: &str, percent: Option<f64>) -> Result<f64> {
    if let Some(percent) = percent {
        return Ok(percent);
    }
    match source.strip_prefix(PRESET_PREFIX) {
        Some(name) => {
            let preset = find_preset(name)?;
            info!(
                "Using {}% surge suggested by preset {}",
                preset.suggested_percent, preset.name
            );
            Ok(preset.suggested_percent)
        }
        None => Err(anyhow!("--percent is required for grid files")),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn handle(
    source: &str,
    percent: Option<f64>,
    random: bool,
    seed: Option<u64>,
    max_steps: Option<usize>,
    dot: Option<&Path>,
    format: OutputFormat,
    config: &GridfailConfig,
) -> Result<()> {
    let percent = resolve_percent(source, percent)?;
    let mut grid = load(source)?;
    let options = SimulationOptions {
        percent,
        random,
        seed,
        max_steps,
    };
    let report = run_cascade(&mut grid, options, config)
        .with_context(|| format!("simulating {percent}% surge on {source}"))?;

    if let Some(path) = dot {
        ensure_parent(path)?;
        fs::write(path, render_dot(&grid, Some(&report.final_state)))
            .with_context(|| format!("writing {}", path.display()))?;
        info!("Wrote cascade rendering to {}", path.display());
    }

    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Plain => {
            report::write_cascade(io::stdout(), &grid, &report)?;
            println!();
            report::write_status(io::stdout(), &grid, Some(&report.final_state))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridfail_io::preset_grid;

    #[test]
    fn test_percent_defaults_for_presets_only() {
        assert_eq!(resolve_percent("preset:stable", None).unwrap(), 15.0);
        assert_eq!(resolve_percent("preset:stable", Some(3.0)).unwrap(), 3.0);
        assert!(resolve_percent("grid.txt", None).is_err());
        assert!(resolve_percent("preset:nope", None).is_err());
    }

    #[test]
    fn test_run_cascade_honours_config_bound() {
        let mut grid = preset_grid("cascade").unwrap();
        let mut config = GridfailConfig::default();
        config.simulation.max_steps = Some(1);
        let options = SimulationOptions {
            percent: 12.0,
            ..Default::default()
        };
        assert!(run_cascade(&mut grid, options, &config).is_err());

        let options = SimulationOptions {
            max_steps: Some(1000),
            ..options
        };
        let report = run_cascade(&mut grid, options, &config).unwrap();
        assert!(report.failures.len() > 1);
    }

    #[test]
    fn test_seeded_random_runs_repeat() {
        let config = GridfailConfig::default();
        let options = SimulationOptions {
            percent: 12.0,
            random: true,
            seed: Some(42),
            max_steps: None,
        };
        let mut grid = preset_grid("cascade").unwrap();
        let first = run_cascade(&mut grid, options, &config).unwrap();
        let second = run_cascade(&mut grid, options, &config).unwrap();
        assert_eq!(first, second);
    }
}
