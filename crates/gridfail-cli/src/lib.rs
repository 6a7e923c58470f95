pub mod cli;
pub mod config;

pub use cli::{
    build_cli_command, Cli, Commands, ExportFormat, OutputFormat, PresetCommands,
};
pub use config::{load_config, GridfailConfig};
