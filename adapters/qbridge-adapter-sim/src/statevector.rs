//! Statevector simulation engine.
//!
//! Amplitudes are little-endian: qubit `q` is bit `q` of the amplitude
//! index. Named two-qubit gates are defined positionally, with their first
//! qubit argument as the most significant bit of the gate matrix (the control
//! for controlled gates).

use num_complex::Complex64;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

use qbridge_hal::{ExternalOp, HalError, HalResult};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// Named gates understood by the simulator: `(name, qubits, params)`.
pub const GATE_SET: &[(&str, usize, usize)] = &[
    ("i", 1, 0),
    ("x", 1, 0),
    ("y", 1, 0),
    ("z", 1, 0),
    ("h", 1, 0),
    ("s", 1, 0),
    ("si", 1, 0),
    ("t", 1, 0),
    ("ti", 1, 0),
    ("v", 1, 0),
    ("vi", 1, 0),
    ("rx", 1, 1),
    ("ry", 1, 1),
    ("rz", 1, 1),
    ("phaseshift", 1, 1),
    ("cnot", 2, 0),
    ("cy", 2, 0),
    ("cz", 2, 0),
    ("swap", 2, 0),
    ("iswap", 2, 0),
    ("pswap", 2, 1),
    ("cphaseshift", 2, 1),
    ("cphaseshift00", 2, 1),
    ("cphaseshift01", 2, 1),
    ("cphaseshift10", 2, 1),
    ("xx", 2, 1),
    ("yy", 2, 1),
    ("zz", 2, 1),
    ("xy", 2, 1),
    ("ccnot", 3, 0),
    ("cswap", 3, 0),
];

/// Look up `(qubits, params)` of a named gate.
pub fn gate_signature(name: &str) -> Option<(usize, usize)> {
    GATE_SET
        .iter()
        .find(|(n, _, _)| *n == name)
        .map(|&(_, q, p)| (q, p))
}

/// A statevector representing a quantum state.
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![ZERO; size];
        amplitudes[0] = ONE;
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Consume the state, returning its amplitudes.
    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    /// Apply the operation at position `index` of a circuit.
    pub fn apply(&mut self, index: usize, op: &ExternalOp) -> HalResult<()> {
        let fail = |message: String| HalError::GateFailed {
            index,
            name: op.name().to_string(),
            message,
        };

        let qubits = op.qubits();
        for (i, &q) in qubits.iter().enumerate() {
            if q >= self.num_qubits {
                return Err(fail(format!(
                    "qubit {q} out of range for {} qubits",
                    self.num_qubits
                )));
            }
            if qubits[..i].contains(&q) {
                return Err(fail(format!("qubit {q} used twice")));
            }
        }

        match op {
            ExternalOp::Named { name, params, .. } => {
                let (arity, num_params) =
                    gate_signature(name).ok_or_else(|| fail("unknown gate".into()))?;
                if arity != qubits.len() || num_params != params.len() {
                    return Err(fail(format!(
                        "expected {arity} qubits and {num_params} parameters, got {} and {}",
                        qubits.len(),
                        params.len()
                    )));
                }
                self.apply_named(name, qubits, params);
                Ok(())
            }
            ExternalOp::Unitary { targets, matrix } => {
                let entries = u32::try_from(targets.len())
                    .ok()
                    .and_then(|k| 1usize.checked_shl(k))
                    .and_then(|dim| dim.checked_mul(dim));
                if entries != Some(matrix.len()) {
                    return Err(fail(format!(
                        "matrix has {} entries, which does not fit {} targets",
                        matrix.len(),
                        targets.len()
                    )));
                }
                self.apply_unitary(targets, matrix);
                Ok(())
            }
            ExternalOp::Other { .. } => Err(fail("unsupported instruction".into())),
        }
    }

    /// Apply a gate from [`GATE_SET`]; arity and parameters are already checked.
    fn apply_named(&mut self, name: &str, q: &[usize], p: &[f64]) {
        match name {
            // Single-qubit gates
            "i" => {}
            "x" => self.apply_x(q[0]),
            "y" => self.apply_y(q[0]),
            "z" => self.apply_phase(q[0], PI),
            "h" => self.apply_h(q[0]),
            "s" => self.apply_phase(q[0], PI / 2.0),
            "si" => self.apply_phase(q[0], -PI / 2.0),
            "t" => self.apply_phase(q[0], PI / 4.0),
            "ti" => self.apply_phase(q[0], -PI / 4.0),
            "v" => self.apply_single(q[0], sqrt_x(false)),
            "vi" => self.apply_single(q[0], sqrt_x(true)),
            "rx" => self.apply_rx(q[0], p[0]),
            "ry" => self.apply_ry(q[0], p[0]),
            "rz" => self.apply_rz(q[0], p[0]),
            "phaseshift" => self.apply_phase(q[0], p[0]),

            // Two-qubit gates
            "cnot" => self.apply_cx(q[0], q[1]),
            "cy" => self.apply_cy(q[0], q[1]),
            "cz" => self.apply_cphase(q[0], q[1], 0b11, PI),
            "swap" => self.apply_swap(q[0], q[1]),
            "iswap" => self.apply_two(q[0], q[1], swap_like(I)),
            "pswap" => self.apply_two(q[0], q[1], swap_like(Complex64::from_polar(1.0, p[0]))),
            "cphaseshift" => self.apply_cphase(q[0], q[1], 0b11, p[0]),
            "cphaseshift00" => self.apply_cphase(q[0], q[1], 0b00, p[0]),
            "cphaseshift01" => self.apply_cphase(q[0], q[1], 0b01, p[0]),
            "cphaseshift10" => self.apply_cphase(q[0], q[1], 0b10, p[0]),
            "xx" => self.apply_two(q[0], q[1], ising_xx(p[0])),
            "yy" => self.apply_two(q[0], q[1], ising_yy(p[0])),
            "zz" => self.apply_zz(q[0], q[1], p[0]),
            "xy" => self.apply_two(q[0], q[1], ising_xy(p[0])),

            // Three-qubit gates
            "ccnot" => self.apply_ccx(q[0], q[1], q[2]),
            "cswap" => self.apply_cswap(q[0], q[1], q[2]),

            _ => unreachable!("gate '{name}' passed the signature check"),
        }
    }

    // =========================================================================
    // Single-qubit gate implementations
    // =========================================================================

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_y(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -I * self.amplitudes[j];
                self.amplitudes[j] = I * tmp;
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = FRAC_1_SQRT_2 * (a + b);
                self.amplitudes[j] = FRAC_1_SQRT_2 * (a - b);
            }
        }
    }

    fn apply_phase(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase = Complex64::from_polar(1.0, theta);
        for i in 0..(1 << self.num_qubits) {
            if i & mask != 0 {
                self.amplitudes[i] *= phase;
            }
        }
    }

    fn apply_rx(&mut self, qubit: usize, theta: f64) {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        let neg_i_s = Complex64::new(0.0, -s);
        self.apply_single(qubit, [[c.into(), neg_i_s], [neg_i_s, c.into()]]);
    }

    fn apply_ry(&mut self, qubit: usize, theta: f64) {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        self.apply_single(qubit, [[c.into(), (-s).into()], [s.into(), c.into()]]);
    }

    fn apply_rz(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                self.amplitudes[i] *= phase_0;
            } else {
                self.amplitudes[i] *= phase_1;
            }
        }
    }

    fn apply_single(&mut self, qubit: usize, m: [[Complex64; 2]; 2]) {
        let mask = 1 << qubit;
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = m[0][0] * a + m[0][1] * b;
                self.amplitudes[j] = m[1][0] * a + m[1][1] * b;
            }
        }
    }

    // =========================================================================
    // Two-qubit gate implementations
    // =========================================================================

    fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..(1 << self.num_qubits) {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_cy(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..(1 << self.num_qubits) {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -I * self.amplitudes[j];
                self.amplitudes[j] = I * tmp;
            }
        }
    }

    /// Multiply by `e^{iθ}` where `(bit q0, bit q1)` equals `pattern` (q0 high).
    fn apply_cphase(&mut self, q0: usize, q1: usize, pattern: usize, theta: f64) {
        let mask0 = 1 << q0;
        let mask1 = 1 << q1;
        let want0 = pattern & 0b10 != 0;
        let want1 = pattern & 0b01 != 0;
        let phase = Complex64::from_polar(1.0, theta);
        for i in 0..(1 << self.num_qubits) {
            if ((i & mask0 != 0) == want0) && ((i & mask1 != 0) == want1) {
                self.amplitudes[i] *= phase;
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        for i in 0..(1 << self.num_qubits) {
            let b1 = (i & mask1) != 0;
            let b2 = (i & mask2) != 0;
            if b1 && !b2 {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_zz(&mut self, q1: usize, q2: usize, theta: f64) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        let same = Complex64::from_polar(1.0, -theta / 2.0);
        let differ = Complex64::from_polar(1.0, theta / 2.0);
        for i in 0..(1 << self.num_qubits) {
            if (i & mask1 != 0) ^ (i & mask2 != 0) {
                self.amplitudes[i] *= differ;
            } else {
                self.amplitudes[i] *= same;
            }
        }
    }

    /// Apply a 4×4 matrix whose index is `(bit q0) << 1 | (bit q1)`.
    fn apply_two(&mut self, q0: usize, q1: usize, m: [[Complex64; 4]; 4]) {
        let flat: Vec<Complex64> = m.iter().flatten().copied().collect();
        // Little-endian over targets: q1 is the low bit.
        self.apply_unitary(&[q1, q0], &flat);
    }

    // =========================================================================
    // Three-qubit gate implementations
    // =========================================================================

    fn apply_ccx(&mut self, c1: usize, c2: usize, target: usize) {
        let c1_mask = 1 << c1;
        let c2_mask = 1 << c2;
        let tgt_mask = 1 << target;
        for i in 0..(1 << self.num_qubits) {
            if (i & c1_mask != 0) && (i & c2_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_cswap(&mut self, control: usize, t1: usize, t2: usize) {
        let ctrl_mask = 1 << control;
        let t1_mask = 1 << t1;
        let t2_mask = 1 << t2;
        for i in 0..(1 << self.num_qubits) {
            if i & ctrl_mask != 0 {
                let b1 = (i & t1_mask) != 0;
                let b2 = (i & t2_mask) != 0;
                if b1 && !b2 {
                    let j = (i & !t1_mask) | t2_mask;
                    self.amplitudes.swap(i, j);
                }
            }
        }
    }

    // =========================================================================
    // Generic unitaries
    // =========================================================================

    /// Apply a row-major `2^k × 2^k` matrix, little-endian over `targets`.
    fn apply_unitary(&mut self, targets: &[usize], matrix: &[Complex64]) {
        let sub = 1usize << targets.len();
        let mask = targets.iter().fold(0usize, |m, t| m | (1 << t));

        // offsets[s]: amplitude-index bits set by sub-index s
        let offsets: Vec<usize> = (0..sub)
            .map(|s| {
                targets
                    .iter()
                    .enumerate()
                    .filter(|(bit, _)| (s >> bit) & 1 == 1)
                    .fold(0usize, |off, (_, t)| off | (1 << t))
            })
            .collect();

        let mut buf = vec![ZERO; sub];
        for base in 0..self.amplitudes.len() {
            if base & mask != 0 {
                continue;
            }
            for (col, off) in offsets.iter().enumerate() {
                buf[col] = self.amplitudes[base | off];
            }
            for (row, off) in offsets.iter().enumerate() {
                self.amplitudes[base | off] = matrix[row * sub..(row + 1) * sub]
                    .iter()
                    .zip(&buf)
                    .map(|(m, b)| m * b)
                    .sum();
            }
        }
    }
}

fn sqrt_x(adjoint: bool) -> [[Complex64; 2]; 2] {
    let (p, m) = (Complex64::new(0.5, 0.5), Complex64::new(0.5, -0.5));
    if adjoint {
        [[m, p], [p, m]]
    } else {
        [[p, m], [m, p]]
    }
}

/// Identity on `|00⟩`, `|11⟩`; swaps `|01⟩`, `|10⟩` with factor `f`.
fn swap_like(f: Complex64) -> [[Complex64; 4]; 4] {
    [
        [ONE, ZERO, ZERO, ZERO],
        [ZERO, ZERO, f, ZERO],
        [ZERO, f, ZERO, ZERO],
        [ZERO, ZERO, ZERO, ONE],
    ]
}

/// `exp(-iθ/2 X⊗X)`
fn ising_xx(theta: f64) -> [[Complex64; 4]; 4] {
    let c = Complex64::new((theta / 2.0).cos(), 0.0);
    let s = Complex64::new(0.0, -(theta / 2.0).sin());
    [
        [c, ZERO, ZERO, s],
        [ZERO, c, s, ZERO],
        [ZERO, s, c, ZERO],
        [s, ZERO, ZERO, c],
    ]
}

/// `exp(-iθ/2 Y⊗Y)`
fn ising_yy(theta: f64) -> [[Complex64; 4]; 4] {
    let c = Complex64::new((theta / 2.0).cos(), 0.0);
    let s = Complex64::new(0.0, (theta / 2.0).sin());
    [
        [c, ZERO, ZERO, s],
        [ZERO, c, -s, ZERO],
        [ZERO, -s, c, ZERO],
        [s, ZERO, ZERO, c],
    ]
}

/// `exp(iθ/4 (X⊗X + Y⊗Y))`
fn ising_xy(theta: f64) -> [[Complex64; 4]; 4] {
    let c = Complex64::new((theta / 2.0).cos(), 0.0);
    let s = Complex64::new(0.0, (theta / 2.0).sin());
    [
        [ONE, ZERO, ZERO, ZERO],
        [ZERO, c, s, ZERO],
        [ZERO, s, c, ZERO],
        [ZERO, ZERO, ZERO, ONE],
    ]
}
