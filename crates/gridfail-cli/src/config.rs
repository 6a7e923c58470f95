//! `gridfail.toml` handling.
//!
//! Looked up at `--config <path>` or `<config dir>/gridfail/gridfail.toml`.
//! A missing default file means defaults; a missing explicit file is an error.

use crate::cli::OutputFormat;
use anyhow::{anyhow, Context, Result};
use gridfail_algo::{validate_factor_range, RANDOM_FACTOR_RANGE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GridfailConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Cascade engine defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Lower bound for random surge factors
    #[serde(default = "default_factor_min")]
    pub random_factor_min: f64,
    /// Upper bound for random surge factors
    #[serde(default = "default_factor_max")]
    pub random_factor_max: f64,
    /// Failure bound per run (unbounded when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<usize>,
    /// Seed for random surges and generated grids (entropy when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            random_factor_min: default_factor_min(),
            random_factor_max: default_factor_max(),
            max_steps: None,
            seed: None,
        }
    }
}

fn default_factor_min() -> f64 {
    RANDOM_FACTOR_RANGE.0
}

fn default_factor_max() -> f64 {
    RANDOM_FACTOR_RANGE.1
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Report format: plain or json
    #[serde(default = "default_output_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_output_format(),
        }
    }
}

fn default_output_format() -> String {
    "plain".to_string()
}

impl GridfailConfig {
    /// Reject values that would only fail later, mid-command.
    pub fn validate(&self) -> Result<()> {
        validate_factor_range(
            self.simulation.random_factor_min,
            self.simulation.random_factor_max,
        )
        .context("invalid [simulation] factor range")?;
        self.log_level()?;
        self.output_format()?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<tracing::Level> {
        self.logging
            .level
            .parse()
            .map_err(|_| anyhow!("invalid [logging] level '{}'", self.logging.level))
    }

    pub fn output_format(&self) -> Result<OutputFormat> {
        match self.output.format.to_ascii_lowercase().as_str() {
            "plain" => Ok(OutputFormat::Plain),
            "json" => Ok(OutputFormat::Json),
            other => Err(anyhow!("invalid [output] format '{other}'")),
        }
    }

    /// The command-line choice wins over the config file.
    pub fn resolve_format(&self, flag: Option<OutputFormat>) -> Result<OutputFormat> {
        match flag {
            Some(format) => Ok(format),
            None => self.output_format(),
        }
    }
}

/// `<config dir>/gridfail/gridfail.toml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("gridfail").join("gridfail.toml"))
}

/// Load and validate the configuration.
pub fn load_config(explicit: Option<&Path>) -> Result<GridfailConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(GridfailConfig::default()),
        },
    };
    let contents = fs::read_to_string(&path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: GridfailConfig = toml::from_str(&contents)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("validating config {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GridfailConfig::default();
        assert_eq!(config.simulation.random_factor_min, 0.5);
        assert_eq!(config.simulation.random_factor_max, 1.5);
        assert_eq!(config.simulation.max_steps, None);
        assert_eq!(config.log_level().unwrap(), tracing::Level::INFO);
        assert_eq!(config.output_format().unwrap(), OutputFormat::Plain);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: GridfailConfig = toml::from_str(
            r#"
            [simulation]
            seed = 11
            max_steps = 50

            [output]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.simulation.seed, Some(11));
        assert_eq!(config.simulation.max_steps, Some(50));
        assert_eq!(config.simulation.random_factor_min, 0.5);
        assert_eq!(config.logging.level, "info");
        assert_eq!(
            config.resolve_format(None).unwrap(),
            OutputFormat::Json
        );
        assert_eq!(
            config.resolve_format(Some(OutputFormat::Plain)).unwrap(),
            OutputFormat::Plain
        );
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = GridfailConfig::default();
        config.simulation.random_factor_min = 2.0;
        assert!(config.validate().is_err());

        let mut config = GridfailConfig::default();
        config.logging.level = "loud".into();
        assert!(config.validate().is_err());

        let mut config = GridfailConfig::default();
        config.output.format = "yaml".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serializes_back_to_toml() {
        let text = toml::to_string_pretty(&GridfailConfig::default()).unwrap();
        assert!(text.contains("[simulation]"));
        assert!(text.contains("random_factor_max = 1.5"));
        assert!(!text.contains("seed"));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        assert!(load_config(Some(Path::new("/definitely/not/here.toml"))).is_err());
    }
}
