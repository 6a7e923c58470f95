use clap::{CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "gridfail",
    author,
    version,
    about = "Cascading-failure simulation for electric transmission grids",
    long_about = None
)]
pub struct Cli {
    /// Set the logging level (defaults to the config file, then "info")
    #[arg(long, global = true)]
    pub log_level: Option<tracing::Level>,

    /// Configuration file (defaults to <config dir>/gridfail/gridfail.toml)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print grid statistics and the status of every node and line
    Show {
        /// Grid file, or preset:<name>
        grid: String,
        /// Output format (defaults to the config file)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Report overloaded elements and connectivity
    Check {
        /// Grid file, or preset:<name>
        grid: String,
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Apply a load surge and propagate failures
    Simulate {
        /// Grid file, or preset:<name>
        grid: String,
        /// Load increase in percent (presets default to their suggested surge)
        #[arg(short, long)]
        percent: Option<f64>,
        /// Draw a random factor per element instead of a uniform surge
        #[arg(long)]
        random: bool,
        /// Seed for random factors (overrides the config file)
        #[arg(long)]
        seed: Option<u64>,
        /// Fail with an error after this many element failures
        #[arg(long)]
        max_steps: Option<usize>,
        /// Write a Graphviz rendering of the outcome
        #[arg(long, value_hint = ValueHint::FilePath)]
        dot: Option<PathBuf>,
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Find nodes and lines whose loss disconnects or overloads the grid
    Critical {
        /// Grid file, or preset:<name>
        grid: String,
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Convert a grid to another file format
    Export {
        /// Grid file, or preset:<name>
        grid: String,
        /// Output format (defaults to the output file's extension)
        #[arg(long, value_enum)]
        format: Option<ExportFormat>,
        /// Output file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: PathBuf,
    },
    /// Generate a random ring-with-cross-ties sample grid
    Generate {
        /// Number of stations
        #[arg(short, long, default_value_t = gridfail_io::DEFAULT_STATIONS)]
        nodes: usize,
        /// Seed (overrides the config file)
        #[arg(long)]
        seed: Option<u64>,
        /// Output file (format from extension)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: PathBuf,
    },
    /// Built-in demonstration grids
    Preset {
        #[command(subcommand)]
        command: PresetCommands,
    },
    /// Menu-driven session over one grid
    Interactive {
        /// Grid file, or preset:<name>; a generated sample grid when omitted
        grid: Option<String>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
        /// Write to this file, or into this directory under the shell's usual name
        #[arg(short, long, value_hint = ValueHint::AnyPath)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum PresetCommands {
    /// List the built-in grids
    List {
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Write a built-in grid to a file (flat text on stdout when no file is given)
    Write {
        /// Preset name
        name: String,
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Flat,
    Json,
    Dot,
}

impl From<ExportFormat> for gridfail_io::Format {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Flat => gridfail_io::Format::Flat,
            ExportFormat::Json => gridfail_io::Format::Json,
            ExportFormat::Dot => gridfail_io::Format::Dot,
        }
    }
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        build_cli_command().debug_assert();
    }

    #[test]
    fn test_parse_simulate() {
        let cli = Cli::try_parse_from([
            "gridfail",
            "--log-level",
            "debug",
            "simulate",
            "preset:cascade",
            "--percent",
            "12",
            "--random",
            "--seed",
            "3",
        ])
        .unwrap();
        assert_eq!(cli.log_level, Some(tracing::Level::DEBUG));
        match cli.command {
            Commands::Simulate {
                grid,
                percent,
                random,
                seed,
                ..
            } => {
                assert_eq!(grid, "preset:cascade");
                assert_eq!(percent, Some(12.0));
                assert!(random);
                assert_eq!(seed, Some(3));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
