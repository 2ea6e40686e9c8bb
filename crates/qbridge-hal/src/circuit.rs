//! The external circuit boundary.
//!
//! An external circuit is anything that can be built by appending named
//! gates and generic unitaries, and read back as a list of [`ExternalOp`]s.
//! Qubits are contiguous zero-based indices.
//!
//! # Generic-unitary layout
//!
//! The matrix of [`ExternalOp::Unitary`] is row-major and little-endian over
//! its targets: `targets[0]` is the least significant bit of the row and
//! column index.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{HalError, HalResult};

/// One operation of an external circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExternalOp {
    /// A gate from the backend's named gate set.
    Named {
        /// Backend gate name.
        name: String,
        /// Positional qubit arguments.
        qubits: Vec<usize>,
        /// Positional parameters, in backend units.
        params: Vec<f64>,
    },
    /// A generic unitary.
    Unitary {
        /// Ordered target qubits.
        targets: Vec<usize>,
        /// Row-major `2^k × 2^k` matrix, little-endian over `targets`.
        matrix: Vec<Complex64>,
    },
    /// Any other instruction kind (measurement, noise channel, pragma, ...).
    Other {
        /// Instruction kind.
        kind: String,
        /// Qubits it acts on.
        qubits: Vec<usize>,
    },
}

impl ExternalOp {
    /// Get the name of the operation. Generic unitaries are called `"unitary"`.
    pub fn name(&self) -> &str {
        match self {
            ExternalOp::Named { name, .. } => name,
            ExternalOp::Unitary { .. } => "unitary",
            ExternalOp::Other { kind, .. } => kind,
        }
    }

    /// Qubits the operation acts on.
    pub fn qubits(&self) -> &[usize] {
        match self {
            ExternalOp::Named { qubits, .. } | ExternalOp::Other { qubits, .. } => qubits,
            ExternalOp::Unitary { targets, .. } => targets,
        }
    }

    /// Check if this is a generic unitary.
    pub fn is_unitary(&self) -> bool {
        matches!(self, ExternalOp::Unitary { .. })
    }
}

/// Builder and view of a backend circuit.
pub trait ExternalCircuit {
    /// Create an empty circuit over `num_qubits` qubits.
    fn with_qubits(num_qubits: usize) -> Self
    where
        Self: Sized;

    /// Number of qubits.
    fn num_qubits(&self) -> usize;

    /// Append a named gate with positional qubit and parameter arguments.
    fn append_named_gate(&mut self, name: &str, qubits: &[usize], params: &[f64]);

    /// Append a generic unitary over `targets`.
    fn append_unitary_gate(&mut self, targets: &[usize], matrix: &[Complex64]);

    /// Operations in application order.
    fn operations(&self) -> &[ExternalOp];

    /// Append an already-built operation.
    ///
    /// The default rejects [`ExternalOp::Other`]; circuits that carry such
    /// instructions override this method.
    fn append_op(&mut self, op: &ExternalOp) -> HalResult<()> {
        match op {
            ExternalOp::Named {
                name,
                qubits,
                params,
            } => self.append_named_gate(name, qubits, params),
            ExternalOp::Unitary { targets, matrix } => self.append_unitary_gate(targets, matrix),
            ExternalOp::Other { kind, .. } => {
                return Err(HalError::Unsupported(format!(
                    "circuit cannot carry '{kind}' instructions"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_accessors() {
        let op = ExternalOp::Named {
            name: "cnot".into(),
            qubits: vec![0, 1],
            params: vec![],
        };
        assert_eq!(op.name(), "cnot");
        assert_eq!(op.qubits(), &[0, 1]);
        assert!(!op.is_unitary());

        let u = ExternalOp::Unitary {
            targets: vec![2],
            matrix: vec![Complex64::new(1.0, 0.0); 4],
        };
        assert_eq!(u.name(), "unitary");
        assert!(u.is_unitary());
    }

    /// Minimal circuit relying on the default `append_op`.
    #[derive(Default)]
    struct GateList {
        ops: Vec<ExternalOp>,
    }

    impl ExternalCircuit for GateList {
        fn with_qubits(_num_qubits: usize) -> Self {
            Self::default()
        }

        fn num_qubits(&self) -> usize {
            self.ops
                .iter()
                .flat_map(|op| op.qubits().iter().map(|q| q + 1))
                .max()
                .unwrap_or(0)
        }

        fn append_named_gate(&mut self, name: &str, qubits: &[usize], params: &[f64]) {
            self.ops.push(ExternalOp::Named {
                name: name.into(),
                qubits: qubits.to_vec(),
                params: params.to_vec(),
            });
        }

        fn append_unitary_gate(&mut self, targets: &[usize], matrix: &[Complex64]) {
            self.ops.push(ExternalOp::Unitary {
                targets: targets.to_vec(),
                matrix: matrix.to_vec(),
            });
        }

        fn operations(&self) -> &[ExternalOp] {
            &self.ops
        }
    }

    #[test]
    fn test_default_append_op_rejects_other() {
        let mut circuit = GateList::with_qubits(2);
        let h = ExternalOp::Named {
            name: "h".into(),
            qubits: vec![1],
            params: vec![],
        };
        circuit.append_op(&h).unwrap();

        let measure = ExternalOp::Other {
            kind: "measure".into(),
            qubits: vec![0],
        };
        let err = circuit.append_op(&measure).unwrap_err();
        assert!(matches!(err, HalError::Unsupported(_)));
        assert!(err.to_string().contains("measure"));
        assert_eq!(circuit.operations(), &[h]);
        assert_eq!(circuit.num_qubits(), 2);
    }

    #[test]
    fn test_op_serde_tagging() {
        let op = ExternalOp::Other {
            kind: "measure".into(),
            qubits: vec![1],
        };
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["type"], "other");
        assert_eq!(json["kind"], "measure");
        let back: ExternalOp = serde_json::from_value(json).unwrap();
        assert_eq!(back, op);
    }
}
