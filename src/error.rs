//! Error types shared by every stage of a training invocation.

use thiserror::Error;

/// Errors produced while preparing or running a training invocation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrainError {
    /// Wrong number or wrong types of invocation arguments; an empty
    /// message stands for a wrong number
    #[error("{0}")]
    Usage(String),

    /// Malformed option string
    #[error("{0}")]
    Parse(String),

    /// A per-instance vector does not match the number of instances
    #[error("Length of {what} vector does not match # of instances ({found} != {expected}).")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// The instance matrix is not usable as a sparse matrix
    #[error("{0}")]
    Format(String),

    /// Rejected by the solver's parameter check
    #[error("{0}")]
    ParameterValidation(String),

    /// The trained model could not be converted for the host
    #[error("can't convert model to host structure: {0}")]
    Conversion(String),
}

impl TrainError {
    /// Whether the host should print the usage text alongside the diagnostic.
    ///
    /// Only a wrong argument count and malformed options do.
    pub fn wants_usage(&self) -> bool {
        match self {
            TrainError::Usage(message) => message.is_empty(),
            TrainError::Parse(_) => true,
            _ => false,
        }
    }
}

/// Result type for training operations
pub type Result<T> = std::result::Result<T, TrainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wants_usage() {
        assert!(TrainError::Usage(String::new()).wants_usage());
        assert!(TrainError::Parse("unknown option -x".to_string()).wants_usage());
        assert!(!TrainError::Usage("arguments must be double".to_string()).wants_usage());
        assert!(!TrainError::Format("Training_instance_matrix must be sparse".to_string())
            .wants_usage());
    }
}
