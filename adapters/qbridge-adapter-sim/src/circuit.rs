//! The simulator's circuit representation.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use qbridge_hal::{ExternalCircuit, ExternalOp, HalResult};

/// An external circuit for [`SimulatorBackend`](crate::SimulatorBackend).
///
/// A flat list of operations over `num_qubits` contiguous qubits. Named
/// gates use the simulator's gate set (see the crate docs); generic unitaries
/// are little-endian over their targets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimCircuit {
    num_qubits: usize,
    operations: Vec<ExternalOp>,
}

impl SimCircuit {
    /// Create an empty circuit.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            operations: vec![],
        }
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether the circuit has no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> HalResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> HalResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn named(&mut self, name: &str, qubits: &[usize], params: &[f64]) -> &mut Self {
        self.append_named_gate(name, qubits, params);
        self
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: usize) -> &mut Self {
        self.named("h", &[qubit], &[])
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: usize) -> &mut Self {
        self.named("x", &[qubit], &[])
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: usize) -> &mut Self {
        self.named("rx", &[qubit], &[theta])
    }

    /// Apply CNOT gate.
    pub fn cnot(&mut self, control: usize, target: usize) -> &mut Self {
        self.named("cnot", &[control, target], &[])
    }

    /// Apply XX interaction, angle in radians.
    pub fn xx(&mut self, theta: f64, q1: usize, q2: usize) -> &mut Self {
        self.named("xx", &[q1, q2], &[theta])
    }

    /// Apply XY interaction, angle in radians.
    pub fn xy(&mut self, theta: f64, q1: usize, q2: usize) -> &mut Self {
        self.named("xy", &[q1, q2], &[theta])
    }

    /// Apply a generic unitary, little-endian over `targets`.
    pub fn unitary(&mut self, targets: &[usize], matrix: &[Complex64]) -> &mut Self {
        self.append_unitary_gate(targets, matrix);
        self
    }

    /// Add a measurement. The simulator returns amplitudes and rejects these.
    pub fn measure(&mut self, qubit: usize) -> &mut Self {
        self.num_qubits = self.num_qubits.max(qubit + 1);
        self.operations.push(ExternalOp::Other {
            kind: "measure".into(),
            qubits: vec![qubit],
        });
        self
    }
}

impl ExternalCircuit for SimCircuit {
    fn with_qubits(num_qubits: usize) -> Self {
        Self::new(num_qubits)
    }

    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn append_named_gate(&mut self, name: &str, qubits: &[usize], params: &[f64]) {
        if let Some(max) = qubits.iter().max() {
            self.num_qubits = self.num_qubits.max(max + 1);
        }
        self.operations.push(ExternalOp::Named {
            name: name.to_string(),
            qubits: qubits.to_vec(),
            params: params.to_vec(),
        });
    }

    fn append_unitary_gate(&mut self, targets: &[usize], matrix: &[Complex64]) {
        if let Some(max) = targets.iter().max() {
            self.num_qubits = self.num_qubits.max(max + 1);
        }
        self.operations.push(ExternalOp::Unitary {
            targets: targets.to_vec(),
            matrix: matrix.to_vec(),
        });
    }

    fn operations(&self) -> &[ExternalOp] {
        &self.operations
    }

    fn append_op(&mut self, op: &ExternalOp) -> HalResult<()> {
        match op {
            ExternalOp::Other { kind, qubits } => {
                if let Some(max) = qubits.iter().max() {
                    self.num_qubits = self.num_qubits.max(max + 1);
                }
                self.operations.push(ExternalOp::Other {
                    kind: kind.clone(),
                    qubits: qubits.clone(),
                });
            }
            ExternalOp::Named {
                name,
                qubits,
                params,
            } => self.append_named_gate(name, qubits, params),
            ExternalOp::Unitary { targets, matrix } => self.append_unitary_gate(targets, matrix),
        }
        Ok(())
    }
}
