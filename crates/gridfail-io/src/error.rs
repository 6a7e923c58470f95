use gridfail_core::GridError;
use thiserror::Error;

/// Errors from reading, writing, or generating grids.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed flat-file input. `line` is 1-based; 0 means end of input.
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Well-formed input describing an invalid grid
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("Unknown preset '{0}' (expected one of: stable, overload, cascade)")]
    UnknownPreset(String),

    #[error("Unsupported format '{0}' (expected flat, json, or dot)")]
    UnsupportedFormat(String),
}

pub type FormatResult<T> = Result<T, FormatError>;

impl FormatError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        FormatError::Parse {
            line,
            message: message.into(),
        }
    }
}
