//! Error types for the HAL crate.

use thiserror::Error;

/// Errors that can occur at the external boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// Circuit exceeds backend capabilities.
    #[error("Circuit exceeds backend capabilities: {0}")]
    CircuitTooLarge(String),

    /// A specific operation of the submitted circuit could not be executed.
    #[error("Operation {index} ('{name}') failed: {message}")]
    GateFailed {
        /// Position of the operation in the external circuit.
        index: usize,
        /// Name of the operation.
        name: String,
        /// What went wrong.
        message: String,
    },

    /// The circuit cannot carry this kind of operation.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic backend error.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl HalError {
    /// Index of the failing operation, when the backend reported one.
    pub fn operation_index(&self) -> Option<usize> {
        match self {
            HalError::GateFailed { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_failed_display() {
        let err = HalError::GateFailed {
            index: 3,
            name: "frob".into(),
            message: "unknown operation".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains('3'));
        assert!(msg.contains("frob"));
        assert_eq!(err.operation_index(), Some(3));
    }

    #[test]
    fn test_operation_index_absent() {
        let err = HalError::Backend("boom".into());
        assert_eq!(err.operation_index(), None);
    }
}
