//! Error types for grid construction and state management.
//!
//! Every variant describes a rejected operation: the grid is left exactly as it
//! was before the call. There is no fatal error class in the model.

use thiserror::Error;

/// Errors raised by the grid model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// Construction input failed validation. `field` names the offending input.
    #[error("Validation error on `{field}`: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// A node id outside the grid was referenced
    #[error("Unknown node index {0}")]
    UnknownNode(usize),

    /// A line id outside the grid was referenced
    #[error("Unknown line index {0}")]
    UnknownLine(usize),

    /// A snapshot taken from a differently shaped grid was offered for restore
    #[error(
        "Snapshot shape mismatch: snapshot has {snapshot_nodes} nodes/{snapshot_lines} lines, \
         grid has {grid_nodes} nodes/{grid_lines} lines"
    )]
    SnapshotMismatch {
        snapshot_nodes: usize,
        snapshot_lines: usize,
        grid_nodes: usize,
        grid_lines: usize,
    },
}

impl GridError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        GridError::Validation {
            field,
            message: message.into(),
        }
    }

    /// The offending field for validation errors.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            GridError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Convenience type alias for Results using GridError.
pub type GridResult<T> = Result<T, GridError>;
