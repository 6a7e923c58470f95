use gridfail_core::GridError;
use thiserror::Error;

/// Errors from cascade simulation and critical-component analysis.
///
/// None of these leave the grid modified: parameter errors are raised before
/// any state change and everything else is raised after rollback.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CascadeError {
    /// A simulation parameter was out of range
    #[error("Invalid parameter `{name}`: {message}")]
    InvalidParameter {
        name: &'static str,
        message: String,
    },

    /// The propagation loop exceeded the configured failure bound
    #[error("Cascade did not converge within {limit} failures")]
    DidNotConverge { limit: usize },

    /// Grid model errors
    #[error(transparent)]
    Grid(#[from] GridError),
}

impl CascadeError {
    pub(crate) fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        CascadeError::InvalidParameter {
            name,
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results using CascadeError.
pub type CascadeResult<T> = Result<T, CascadeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CascadeError::invalid("load_increase_percent", "must be >= 0, got -5");
        assert!(err.to_string().contains("load_increase_percent"));
        assert!(CascadeError::DidNotConverge { limit: 3 }
            .to_string()
            .contains("3 failures"));
    }

    #[test]
    fn test_grid_error_conversion() {
        let err: CascadeError = GridError::UnknownNode(7).into();
        assert!(matches!(err, CascadeError::Grid(GridError::UnknownNode(7))));
        assert_eq!(err.to_string(), "Unknown node index 7");
    }
}
