//! Error types for the translation crate.

use qbridge_hal::HalError;
use qbridge_ir::IrError;
use thiserror::Error;

use crate::dictionary::ParamDomain;

/// Errors produced while translating or executing circuits.
///
/// Translation is all-or-nothing: any of these aborts the whole pass.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BridgeError {
    /// Native gate has no named mapping and no unitary route.
    #[error("Unsupported gate '{name}' at index {index}")]
    UnsupportedGate {
        /// Native gate name.
        name: String,
        /// Position in the native circuit.
        index: usize,
    },

    /// External operation has no native counterpart.
    #[error("Unsupported external operation '{name}' at index {index}")]
    UnsupportedExternalGate {
        /// External operation name.
        name: String,
        /// Position in the external circuit.
        index: usize,
    },

    /// Matrix size does not match the number of qubits.
    #[error("Matrix with {got} entries is invalid for {qubits} qubits (expected {expected})")]
    InvalidDimension {
        /// Number of target qubits.
        qubits: usize,
        /// Expected number of entries, `(2^qubits)^2`.
        expected: usize,
        /// Actual number of entries.
        got: usize,
    },

    /// An explicit unitary gate fails `U†U = I` within the configured tolerance.
    #[error("Gate {index} is not unitary within {tolerance:e}")]
    NonUnitary {
        /// Position in the native circuit.
        index: usize,
        /// Tolerance the check used.
        tolerance: f64,
    },

    /// A parameter violates its mapping's domain, or has the wrong count.
    #[error("Parameter {position} of '{gate}' is {value}, outside {domain}")]
    ParameterOutOfRange {
        /// Gate name on the side being read.
        gate: String,
        /// Parameter position.
        position: usize,
        /// Offending value (NaN when the parameter is missing).
        value: f64,
        /// Domain the value had to satisfy.
        domain: ParamDomain,
    },

    /// Gate has the wrong number of qubits for its mapping.
    #[error("Gate '{gate}' expects {expected} qubits, got {got}")]
    ArityMismatch {
        /// Gate name.
        gate: String,
        /// Expected qubit count.
        expected: usize,
        /// Actual qubit count.
        got: usize,
    },

    /// The external backend failed.
    #[error("Simulation failed{}: {source}", format_gate_index(.gate_index))]
    SimulationError {
        /// Index of the failing gate, when the backend reported one.
        gate_index: Option<usize>,
        /// Underlying backend error.
        #[source]
        source: HalError,
    },

    /// The gate dictionary is malformed.
    #[error("Invalid gate dictionary: {0}")]
    Dictionary(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Native IR error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] IrError),
}

#[allow(clippy::ref_option)]
fn format_gate_index(gate_index: &Option<usize>) -> String {
    match gate_index {
        Some(index) => format!(" at gate {index}"),
        None => String::new(),
    }
}

impl BridgeError {
    /// Attach the circuit position to an unsupported-gate error.
    #[must_use]
    pub fn at_index(self, position: usize) -> Self {
        match self {
            BridgeError::UnsupportedGate { name, .. } => BridgeError::UnsupportedGate {
                name,
                index: position,
            },
            BridgeError::UnsupportedExternalGate { name, .. } => {
                BridgeError::UnsupportedExternalGate {
                    name,
                    index: position,
                }
            }
            other => other,
        }
    }
}

impl From<HalError> for BridgeError {
    fn from(source: HalError) -> Self {
        BridgeError::SimulationError {
            gate_index: source.operation_index(),
            source,
        }
    }
}

/// Result type for translation operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hal_error_keeps_gate_index() {
        let err: BridgeError = HalError::GateFailed {
            index: 4,
            name: "frob".into(),
            message: "unknown gate".into(),
        }
        .into();
        assert!(matches!(
            err,
            BridgeError::SimulationError {
                gate_index: Some(4),
                ..
            }
        ));
        assert!(err.to_string().contains("at gate 4"));
    }

    #[test]
    fn test_hal_error_without_index() {
        let err: BridgeError = HalError::Backend("sim went away".into()).into();
        assert!(matches!(
            err,
            BridgeError::SimulationError {
                gate_index: None,
                ..
            }
        ));
    }

    #[test]
    fn test_at_index() {
        let err = BridgeError::UnsupportedGate {
            name: "frob".into(),
            index: 0,
        }
        .at_index(5);
        assert!(matches!(err, BridgeError::UnsupportedGate { index: 5, .. }));

        let other = BridgeError::Config("x".into()).at_index(5);
        assert!(matches!(other, BridgeError::Config(_)));
    }

    #[test]
    fn test_parameter_out_of_range_display() {
        let err = BridgeError::ParameterOutOfRange {
            gate: "rx".into(),
            position: 0,
            value: f64::INFINITY,
            domain: ParamDomain::Finite,
        };
        assert!(err.to_string().contains("rx"));
    }
}
