//! Native statevectors and the reference simulator.
//!
//! The native layout is big-endian: in a state over labels `[l0, l1, …]`
//! (ascending), `l0` is the most significant bit of the amplitude index.

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use tracing::{debug, instrument};

use crate::circuit::Circuit;
use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::qubit::QubitId;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// A pure state over an ordered set of qubit labels.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    labels: Vec<QubitId>,
    amplitudes: Array1<Complex64>,
}

impl StateVector {
    /// Create a state from labels and amplitudes in native layout.
    pub fn new(labels: Vec<QubitId>, amplitudes: Array1<Complex64>) -> IrResult<Self> {
        if amplitudes.len() != 1usize << labels.len() {
            return Err(IrError::StateDimension {
                len: amplitudes.len(),
                num_qubits: labels.len(),
            });
        }
        Ok(Self { labels, amplitudes })
    }

    /// `|0…0⟩` over labels `0..num_qubits`.
    pub fn zero(num_qubits: usize) -> Self {
        let mut amplitudes = Array1::from_elem(1usize << num_qubits, ZERO);
        amplitudes[0] = ONE;
        Self {
            labels: (0..num_qubits).map(QubitId::from).collect(),
            amplitudes,
        }
    }

    /// Computational basis state `index` over labels `0..num_qubits`.
    pub fn basis(num_qubits: usize, index: usize) -> Self {
        let mut state = Self::zero(num_qubits);
        state.amplitudes[0] = ZERO;
        state.amplitudes[index] = ONE;
        state
    }

    /// Qubit labels, most significant first.
    pub fn labels(&self) -> &[QubitId] {
        &self.labels
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.labels.len()
    }

    /// Amplitudes in native layout.
    pub fn amplitudes(&self) -> &Array1<Complex64> {
        &self.amplitudes
    }

    /// Consume the state, returning its amplitudes.
    pub fn into_amplitudes(self) -> Array1<Complex64> {
        self.amplitudes
    }

    /// Measurement probabilities in native layout.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// `|⟨self|other⟩|²`; zero when the states are over different labels.
    pub fn fidelity(&self, other: &StateVector) -> f64 {
        if self.labels != other.labels {
            return 0.0;
        }
        let overlap: Complex64 = self
            .amplitudes
            .iter()
            .zip(other.amplitudes.iter())
            .map(|(a, b)| a.conj() * b)
            .sum();
        overlap.norm_sqr()
    }

    /// Apply a gate in place.
    pub fn apply(&mut self, gate: &Gate) -> IrResult<()> {
        let matrix = gate.matrix()?;
        let n = self.num_qubits();
        let shifts = gate
            .qubits()
            .iter()
            .map(|q| {
                self.labels
                    .iter()
                    .position(|l| l == q)
                    .map(|pos| n - 1 - pos)
                    .ok_or_else(|| IrError::QubitNotFound {
                        qubit: *q,
                        gate_name: Some(gate.name().to_string()),
                    })
            })
            .collect::<IrResult<Vec<_>>>()?;
        apply_matrix(&mut self.amplitudes, &matrix, &shifts);
        Ok(())
    }
}

/// Apply a `2^k × 2^k` matrix to the amplitudes.
///
/// `shifts[i]` is the bit position of the matrix's `i`-th qubit in the
/// amplitude index; matrix index bits are big-endian over `shifts`.
fn apply_matrix(amps: &mut Array1<Complex64>, matrix: &Array2<Complex64>, shifts: &[usize]) {
    let k = shifts.len();
    let sub = 1usize << k;
    let mask = shifts.iter().fold(0usize, |m, s| m | (1 << s));

    let offsets: Vec<usize> = (0..sub)
        .map(|s| {
            shifts
                .iter()
                .enumerate()
                .filter(|(i, _)| (s >> (k - 1 - i)) & 1 == 1)
                .fold(0usize, |off, (_, shift)| off | (1 << shift))
        })
        .collect();

    let mut buf = vec![ZERO; sub];
    for base in 0..amps.len() {
        if base & mask != 0 {
            continue;
        }
        for (t, off) in offsets.iter().enumerate() {
            buf[t] = amps[base | off];
        }
        for (s, off) in offsets.iter().enumerate() {
            amps[base | off] = buf
                .iter()
                .enumerate()
                .map(|(t, b)| matrix[[s, t]] * b)
                .sum();
        }
    }
}

/// Simulate a circuit from `|0…0⟩` with the native engine.
///
/// The result is over labels `0..circuit.num_qubits()`.
#[instrument(skip(circuit), fields(name = circuit.name()))]
pub fn simulate(circuit: &Circuit) -> IrResult<StateVector> {
    let mut state = StateVector::zero(circuit.num_qubits());
    for gate in circuit {
        state.apply(gate)?;
    }
    debug!(
        "Simulated {} gates on {} qubits",
        circuit.len(),
        state.num_qubits()
    );
    Ok(state)
}

/// Full unitary of a circuit, big-endian over labels `0..num_qubits`.
pub fn circuit_unitary(circuit: &Circuit) -> IrResult<Array2<Complex64>> {
    let n = circuit.num_qubits();
    let dim = 1usize << n;
    let mut unitary = Array2::zeros((dim, dim));
    for col in 0..dim {
        let mut state = StateVector::basis(n, col);
        for gate in circuit {
            state.apply(gate)?;
        }
        unitary.column_mut(col).assign(state.amplitudes());
    }
    Ok(unitary)
}

/// Elementwise comparison of two matrices up to a global phase.
pub fn unitaries_close(a: &Array2<Complex64>, b: &Array2<Complex64>, tolerance: f64) -> bool {
    if a.dim() != b.dim() {
        return false;
    }
    let Some((idx, pivot)) = a
        .indexed_iter()
        .max_by(|(_, x), (_, y)| x.norm().total_cmp(&y.norm()))
    else {
        return true;
    };
    if b[idx].norm() <= tolerance || pivot.norm() <= tolerance {
        return a.iter().zip(b.iter()).all(|(x, y)| (x - y).norm() <= tolerance);
    }
    let ratio = b[idx] / pivot;
    let phase = ratio / ratio.norm();
    a.iter()
        .zip(b.iter())
        .all(|(x, y)| (x * phase - y).norm() <= tolerance)
}

/// Compare the unitaries of two circuits up to a global phase.
pub fn circuits_close(a: &Circuit, b: &Circuit, tolerance: f64) -> IrResult<bool> {
    if a.num_qubits() != b.num_qubits() {
        return Ok(false);
    }
    Ok(unitaries_close(
        &circuit_unitary(a)?,
        &circuit_unitary(b)?,
        tolerance,
    ))
}

/// Compare two states up to a global phase: `1 - fidelity <= tolerance`.
pub fn states_close(a: &StateVector, b: &StateVector, tolerance: f64) -> bool {
    1.0 - a.fidelity(b) <= tolerance
}
