//! Quantum gate types.
//!
//! A native gate is either *named* (a gate library name with ordered
//! parameters) or an explicit *unitary* given by its matrix. Both carry the
//! ordered qubit labels they act on.

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::library::standard_matrix;
use crate::qubit::QubitId;

/// Empty parameter list for gates that take none.
pub const NO_PARAMS: [f64; 0] = [];

/// Side length `2^num_qubits` of a dense matrix over `num_qubits` qubits.
///
/// `None` when the `dim × dim` entries would not be addressable.
pub fn matrix_dim(num_qubits: usize) -> Option<usize> {
    let dim = 1usize.checked_shl(u32::try_from(num_qubits).ok()?)?;
    dim.checked_mul(dim).map(|_| dim)
}

/// Gates of the native library with known closed-form matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// V gate (sqrt(X)).
    V,
    /// V-dagger gate.
    Vdg,
    /// Rotation around X, angle in radians.
    Rx,
    /// Rotation around Y, angle in radians.
    Ry,
    /// Rotation around Z, angle in radians.
    Rz,
    /// Phase shift `diag(1, e^{iθ})`.
    Phase,

    // Two-qubit gates
    /// Controlled-NOT.
    CNot,
    /// Controlled-Y.
    CY,
    /// Controlled-Z.
    CZ,
    /// Controlled-V (controlled sqrt(X)).
    CV,
    /// SWAP gate.
    Swap,
    /// iSWAP gate.
    ISwap,
    /// Parametric swap: SWAP with phase `e^{iθ}` on the swapped states.
    PSwap,
    /// Controlled phase on `|11⟩`.
    CPhase,
    /// Controlled phase on `|00⟩`.
    CPhase00,
    /// Controlled phase on `|01⟩`.
    CPhase01,
    /// Controlled phase on `|10⟩`.
    CPhase10,
    /// Ising XX interaction, exponent in half-turns.
    XX,
    /// Ising YY interaction, exponent in half-turns.
    YY,
    /// Ising ZZ interaction, exponent in half-turns.
    ZZ,
    /// XY interaction, exponent in half-turns.
    XY,
    /// Canonical gate `exp(-iπ/2 (tx XX + ty YY + tz ZZ))`.
    Can,

    // Three-qubit gates
    /// Toffoli gate.
    CCNot,
    /// Fredkin gate.
    CSwap,
}

impl StandardGate {
    /// Every gate of the library.
    pub const ALL: &'static [StandardGate] = &[
        StandardGate::I,
        StandardGate::X,
        StandardGate::Y,
        StandardGate::Z,
        StandardGate::H,
        StandardGate::S,
        StandardGate::Sdg,
        StandardGate::T,
        StandardGate::Tdg,
        StandardGate::V,
        StandardGate::Vdg,
        StandardGate::Rx,
        StandardGate::Ry,
        StandardGate::Rz,
        StandardGate::Phase,
        StandardGate::CNot,
        StandardGate::CY,
        StandardGate::CZ,
        StandardGate::CV,
        StandardGate::Swap,
        StandardGate::ISwap,
        StandardGate::PSwap,
        StandardGate::CPhase,
        StandardGate::CPhase00,
        StandardGate::CPhase01,
        StandardGate::CPhase10,
        StandardGate::XX,
        StandardGate::YY,
        StandardGate::ZZ,
        StandardGate::XY,
        StandardGate::Can,
        StandardGate::CCNot,
        StandardGate::CSwap,
    ];

    /// Get the name of this gate.
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            StandardGate::I => "i",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::V => "v",
            StandardGate::Vdg => "vdg",
            StandardGate::Rx => "rx",
            StandardGate::Ry => "ry",
            StandardGate::Rz => "rz",
            StandardGate::Phase => "phase",
            StandardGate::CNot => "cnot",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::CV => "cv",
            StandardGate::Swap => "swap",
            StandardGate::ISwap => "iswap",
            StandardGate::PSwap => "pswap",
            StandardGate::CPhase => "cphase",
            StandardGate::CPhase00 => "cphase00",
            StandardGate::CPhase01 => "cphase01",
            StandardGate::CPhase10 => "cphase10",
            StandardGate::XX => "xx",
            StandardGate::YY => "yy",
            StandardGate::ZZ => "zz",
            StandardGate::XY => "xy",
            StandardGate::Can => "can",
            StandardGate::CCNot => "ccnot",
            StandardGate::CSwap => "cswap",
        }
    }

    /// Look up a library gate by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|g| g.name() == name)
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(self) -> usize {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::V
            | StandardGate::Vdg
            | StandardGate::Rx
            | StandardGate::Ry
            | StandardGate::Rz
            | StandardGate::Phase => 1,

            StandardGate::CCNot | StandardGate::CSwap => 3,

            _ => 2,
        }
    }

    /// Get the number of parameters this gate takes.
    #[inline]
    pub fn num_params(self) -> usize {
        match self {
            StandardGate::Rx
            | StandardGate::Ry
            | StandardGate::Rz
            | StandardGate::Phase
            | StandardGate::PSwap
            | StandardGate::CPhase
            | StandardGate::CPhase00
            | StandardGate::CPhase01
            | StandardGate::CPhase10
            | StandardGate::XX
            | StandardGate::YY
            | StandardGate::ZZ
            | StandardGate::XY => 1,

            StandardGate::Can => 3,

            _ => 0,
        }
    }

    /// Closed-form matrix of this gate for the given parameters.
    pub fn matrix(self, params: &[f64]) -> IrResult<Array2<Complex64>> {
        if params.len() != self.num_params() {
            return Err(IrError::ParameterCountMismatch {
                gate_name: self.name().to_string(),
                expected: self.num_params(),
                got: params.len(),
            });
        }
        Ok(standard_matrix(self, params))
    }
}

/// A gate identified by name.
///
/// The name need not belong to the standard library; such gates can be
/// built and carried around but have no closed-form matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedGate {
    /// The name of the gate.
    pub name: String,
    /// Ordered parameters.
    pub params: Vec<f64>,
    /// Ordered qubit labels.
    pub qubits: Vec<QubitId>,
}

impl NamedGate {
    /// Create a named gate.
    pub fn new(
        name: impl Into<String>,
        params: impl Into<Vec<f64>>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> Self {
        Self {
            name: name.into(),
            params: params.into(),
            qubits: qubits.into_iter().collect(),
        }
    }

    /// Create a library gate.
    pub fn standard(
        gate: StandardGate,
        params: impl Into<Vec<f64>>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> Self {
        Self::new(gate.name(), params, qubits)
    }

    /// The library gate this name refers to, if any.
    pub fn kind(&self) -> Option<StandardGate> {
        StandardGate::from_name(&self.name)
    }

    /// Closed-form matrix, if the gate is part of the library.
    pub fn matrix(&self) -> IrResult<Array2<Complex64>> {
        let kind = self
            .kind()
            .ok_or_else(|| IrError::UnknownGate(self.name.clone()))?;
        kind.matrix(&self.params)
    }
}

/// A gate given by an explicit unitary matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitaryGate {
    /// Dense `2^k × 2^k` matrix, big-endian over `qubits`.
    pub matrix: Array2<Complex64>,
    /// Ordered qubit labels.
    pub qubits: Vec<QubitId>,
}

impl UnitaryGate {
    /// Create a unitary gate, checking the matrix dimension against the qubits.
    ///
    /// Unitarity itself is not checked.
    pub fn new(
        matrix: Array2<Complex64>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<Self> {
        let qubits: Vec<_> = qubits.into_iter().collect();
        let fits = matrix_dim(qubits.len())
            .is_some_and(|dim| matrix.nrows() == dim && matrix.ncols() == dim);
        if !fits {
            return Err(IrError::MatrixShape {
                rows: matrix.nrows(),
                cols: matrix.ncols(),
                num_qubits: qubits.len(),
            });
        }
        Ok(Self { matrix, qubits })
    }
}

/// A native gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// A gate identified by name.
    Named(NamedGate),
    /// A gate identified by its matrix.
    Unitary(UnitaryGate),
}

impl Gate {
    /// Get the name of this gate. Unitary gates are called `"unitary"`.
    pub fn name(&self) -> &str {
        match self {
            Gate::Named(g) => &g.name,
            Gate::Unitary(_) => "unitary",
        }
    }

    /// Qubits this gate acts on.
    pub fn qubits(&self) -> &[QubitId] {
        match self {
            Gate::Named(g) => &g.qubits,
            Gate::Unitary(g) => &g.qubits,
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits().len()
    }

    /// The gate's matrix, big-endian over [`Gate::qubits`].
    pub fn matrix(&self) -> IrResult<Array2<Complex64>> {
        match self {
            Gate::Named(g) => g.matrix(),
            Gate::Unitary(g) => Ok(g.matrix.clone()),
        }
    }

    /// Check qubit arity, parameter count and duplicate qubits.
    ///
    /// Names outside the library only get the duplicate-qubit check.
    pub fn validate(&self) -> IrResult<()> {
        let qubits = self.qubits();
        for (i, q) in qubits.iter().enumerate() {
            if qubits[..i].contains(q) {
                return Err(IrError::DuplicateQubit {
                    qubit: *q,
                    gate_name: Some(self.name().to_string()),
                });
            }
        }

        if let Gate::Named(g) = self {
            if let Some(kind) = g.kind() {
                if kind.num_qubits() != g.qubits.len() {
                    return Err(IrError::QubitCountMismatch {
                        gate_name: g.name.clone(),
                        expected: kind.num_qubits(),
                        got: g.qubits.len(),
                    });
                }
                if kind.num_params() != g.params.len() {
                    return Err(IrError::ParameterCountMismatch {
                        gate_name: g.name.clone(),
                        expected: kind.num_params(),
                        got: g.params.len(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl From<NamedGate> for Gate {
    fn from(gate: NamedGate) -> Self {
        Gate::Named(gate)
    }
}

impl From<UnitaryGate> for Gate {
    fn from(gate: UnitaryGate) -> Self {
        Gate::Unitary(gate)
    }
}
