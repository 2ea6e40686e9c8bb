//! Circuits and the fluent circuit builder.

use ndarray::Array2;
use num_complex::Complex64;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::IrResult;
use crate::gate::{Gate, NO_PARAMS, NamedGate, StandardGate, UnitaryGate};
use crate::qubit::QubitId;

/// An ordered sequence of gates.
///
/// Gate order is operator-composition order: the first gate acts first.
/// A circuit is immutable once constructed; use [`CircuitBuilder`] or
/// [`Circuit::from_gates`] to create one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// The gates, in application order.
    gates: Vec<Gate>,
}

impl Circuit {
    /// Create a circuit from gates, validating each one.
    pub fn from_gates(
        name: impl Into<String>,
        gates: impl IntoIterator<Item = Gate>,
    ) -> IrResult<Self> {
        let gates: Vec<Gate> = gates.into_iter().collect();
        for gate in &gates {
            gate.validate()?;
        }
        Ok(Self {
            name: name.into(),
            gates,
        })
    }

    /// Create an empty circuit.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gates: vec![],
        }
    }

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the gates in application order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Number of gates.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Whether the circuit has no gates.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Number of qubits: one plus the largest referenced label.
    pub fn num_qubits(&self) -> usize {
        self.gates
            .iter()
            .flat_map(Gate::qubits)
            .map(|q| q.index() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Labels referenced by at least one gate, in order of first appearance.
    pub fn referenced_qubits(&self) -> Vec<QubitId> {
        let mut seen = FxHashSet::default();
        self.gates
            .iter()
            .flat_map(Gate::qubits)
            .copied()
            .filter(|q| seen.insert(*q))
            .collect()
    }

    /// Get an iterator over the gates.
    pub fn iter(&self) -> std::slice::Iter<'_, Gate> {
        self.gates.iter()
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a Bell state circuit.
    pub fn bell() -> IrResult<Self> {
        let mut builder = CircuitBuilder::new("bell");
        builder.h(QubitId(0))?.cnot(QubitId(0), QubitId(1))?;
        Ok(builder.build())
    }

    /// Create a GHZ state circuit.
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut builder = CircuitBuilder::new("ghz");
        if n == 0 {
            return Ok(builder.build());
        }

        builder.h(QubitId(0))?;
        for i in 0..n - 1 {
            builder.cnot(QubitId(i), QubitId(i + 1))?;
        }

        Ok(builder.build())
    }
}

impl<'a> IntoIterator for &'a Circuit {
    type Item = &'a Gate;
    type IntoIter = std::slice::Iter<'a, Gate>;

    fn into_iter(self) -> Self::IntoIter {
        self.gates.iter()
    }
}

/// Fluent builder for [`Circuit`].
///
/// Every method validates the gate it appends, so a built circuit is always
/// well-formed.
#[derive(Debug, Clone)]
pub struct CircuitBuilder {
    name: String,
    gates: Vec<Gate>,
}

impl CircuitBuilder {
    /// Start a new circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gates: vec![],
        }
    }

    /// Finish building.
    pub fn build(self) -> Circuit {
        Circuit {
            name: self.name,
            gates: self.gates,
        }
    }

    /// Append any gate.
    pub fn gate(&mut self, gate: impl Into<Gate>) -> IrResult<&mut Self> {
        let gate = gate.into();
        gate.validate()?;
        self.gates.push(gate);
        Ok(self)
    }

    /// Append a library gate.
    pub fn standard(
        &mut self,
        gate: StandardGate,
        params: impl Into<Vec<f64>>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.gate(NamedGate::standard(gate, params, qubits))
    }

    /// Append an explicit unitary, big-endian over `qubits`.
    pub fn unitary(
        &mut self,
        matrix: Array2<Complex64>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        let gate = UnitaryGate::new(matrix, qubits)?;
        self.gate(gate)
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::H, NO_PARAMS, [qubit])
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::X, NO_PARAMS, [qubit])
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::Y, NO_PARAMS, [qubit])
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::Z, NO_PARAMS, [qubit])
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::S, NO_PARAMS, [qubit])
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::T, NO_PARAMS, [qubit])
    }

    /// Apply V (sqrt(X)) gate.
    pub fn v(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::V, NO_PARAMS, [qubit])
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::Rx, [theta], [qubit])
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::Ry, [theta], [qubit])
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::Rz, [theta], [qubit])
    }

    /// Apply phase shift gate.
    pub fn phase(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::Phase, [theta], [qubit])
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT gate.
    pub fn cnot(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::CNot, NO_PARAMS, [control, target])
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::CZ, NO_PARAMS, [control, target])
    }

    /// Apply controlled-V gate.
    pub fn cv(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::CV, NO_PARAMS, [control, target])
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::Swap, NO_PARAMS, [q1, q2])
    }

    /// Apply controlled phase gate.
    pub fn cphase(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::CPhase, [theta], [control, target])
    }

    /// Apply XX interaction (half-turns).
    pub fn xx(&mut self, t: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::XX, [t], [q1, q2])
    }

    /// Apply YY interaction (half-turns).
    pub fn yy(&mut self, t: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::YY, [t], [q1, q2])
    }

    /// Apply ZZ interaction (half-turns).
    pub fn zz(&mut self, t: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::ZZ, [t], [q1, q2])
    }

    /// Apply XY interaction (half-turns).
    pub fn xy(&mut self, t: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::XY, [t], [q1, q2])
    }

    /// Apply canonical gate (half-turns).
    pub fn can(
        &mut self,
        tx: f64,
        ty: f64,
        tz: f64,
        q1: QubitId,
        q2: QubitId,
    ) -> IrResult<&mut Self> {
        self.standard(StandardGate::Can, [tx, ty, tz], [q1, q2])
    }

    // =========================================================================
    // Three-qubit gates
    // =========================================================================

    /// Apply Toffoli gate.
    pub fn ccnot(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::CCNot, NO_PARAMS, [c1, c2, target])
    }
}
