use anyhow::Result;
use clap::Parser;
use gridfail_cli::{load_config, Cli, Commands, GridfailConfig};
use std::process;
use tracing::{debug, error, Level};
use tracing_subscriber::FmtSubscriber;

mod commands;
mod observer;
mod report;

use crate::commands::{
    check, completions, critical, export, generate, interactive, preset, show, simulate,
};

fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("gridfail: {err:#}");
            process::exit(2);
        }
    };

    let level = cli
        .log_level
        .or_else(|| config.log_level().ok())
        .unwrap_or(Level::INFO);
    // stdout carries reports and JSON; logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("gridfail: could not install logger: {err}");
    }
    debug!(?config, "configuration loaded");

    if let Err(err) = run(&cli, &config) {
        error!("{err:#}");
        process::exit(1);
    }
}

fn run(cli: &Cli, config: &GridfailConfig) -> Result<()> {
    match &cli.command {
        Commands::Show { grid, format } => show::handle(grid, config.resolve_format(*format)?),
        Commands::Check { grid, format } => check::handle(grid, config.resolve_format(*format)?),
        Commands::Simulate {
            grid,
            percent,
            random,
            seed,
            max_steps,
            dot,
            format,
        } => simulate::handle(
            grid,
            *percent,
            *random,
            *seed,
            *max_steps,
            dot.as_deref(),
            config.resolve_format(*format)?,
            config,
        ),
        Commands::Critical { grid, format } => {
            critical::handle(grid, config.resolve_format(*format)?)
        }
        Commands::Export { grid, format, out } => export::handle(grid, *format, out),
        Commands::Generate { nodes, seed, out } => generate::handle(*nodes, *seed, out, config),
        Commands::Preset { command } => preset::handle(command, config.output_format()?),
        Commands::Interactive { grid } => interactive::handle(grid.as_deref(), config),
        Commands::Completions { shell, out } => completions::handle(*shell, out.as_deref()),
    }
}
