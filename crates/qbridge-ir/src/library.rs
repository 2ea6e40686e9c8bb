//! Closed-form matrices for the standard gate library.
//!
//! All matrices are big-endian: the first qubit a gate is applied to is the
//! most significant bit of the matrix index. Rotation and phase angles are in
//! radians. The two-qubit interaction gates (`xx`, `yy`, `zz`, `xy`, `can`)
//! take their exponents in half-turns, so `xx(t) = exp(-i·t·π/2·X⊗X)`, while
//! `xy(t) = exp(-i·t·π/2·(X⊗X + Y⊗Y))` rotates the `|01>`/`|10>` block by `πt`.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use ndarray::{Array2, array};
use num_complex::Complex64;
use rand::Rng;

use crate::gate::StandardGate;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

#[inline]
fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

#[inline]
fn phase(theta: f64) -> Complex64 {
    Complex64::from_polar(1.0, theta)
}

/// Build the matrix of a standard gate.
///
/// `params` must already have the length reported by
/// [`StandardGate::num_params`]; the caller validates it.
pub(crate) fn standard_matrix(gate: StandardGate, params: &[f64]) -> Array2<Complex64> {
    let h = FRAC_1_SQRT_2;
    match gate {
        StandardGate::I => Array2::eye(2),
        StandardGate::X => array![[ZERO, ONE], [ONE, ZERO]],
        StandardGate::Y => array![[ZERO, -I], [I, ZERO]],
        StandardGate::Z => diagonal(&[ONE, -ONE]),
        StandardGate::H => array![[c(h, 0.0), c(h, 0.0)], [c(h, 0.0), c(-h, 0.0)]],
        StandardGate::S => diagonal(&[ONE, I]),
        StandardGate::Sdg => diagonal(&[ONE, -I]),
        StandardGate::T => diagonal(&[ONE, phase(PI / 4.0)]),
        StandardGate::Tdg => diagonal(&[ONE, phase(-PI / 4.0)]),
        StandardGate::V => sqrt_x(),
        StandardGate::Vdg => adjoint(&sqrt_x()),
        StandardGate::Rx => {
            let (cos, sin) = half_angle(params[0]);
            array![[c(cos, 0.0), c(0.0, -sin)], [c(0.0, -sin), c(cos, 0.0)]]
        }
        StandardGate::Ry => {
            let (cos, sin) = half_angle(params[0]);
            array![[c(cos, 0.0), c(-sin, 0.0)], [c(sin, 0.0), c(cos, 0.0)]]
        }
        StandardGate::Rz => diagonal(&[phase(-params[0] / 2.0), phase(params[0] / 2.0)]),
        StandardGate::Phase => diagonal(&[ONE, phase(params[0])]),

        StandardGate::CNot => controlled(&standard_matrix(StandardGate::X, &[])),
        StandardGate::CY => controlled(&standard_matrix(StandardGate::Y, &[])),
        StandardGate::CZ => diagonal(&[ONE, ONE, ONE, -ONE]),
        StandardGate::CV => controlled(&sqrt_x()),
        StandardGate::Swap => permutation(&[0, 2, 1, 3]),
        StandardGate::ISwap => array![
            [ONE, ZERO, ZERO, ZERO],
            [ZERO, ZERO, I, ZERO],
            [ZERO, I, ZERO, ZERO],
            [ZERO, ZERO, ZERO, ONE],
        ],
        StandardGate::PSwap => {
            let p = phase(params[0]);
            array![
                [ONE, ZERO, ZERO, ZERO],
                [ZERO, ZERO, p, ZERO],
                [ZERO, p, ZERO, ZERO],
                [ZERO, ZERO, ZERO, ONE],
            ]
        }
        StandardGate::CPhase => diagonal(&[ONE, ONE, ONE, phase(params[0])]),
        StandardGate::CPhase00 => diagonal(&[phase(params[0]), ONE, ONE, ONE]),
        StandardGate::CPhase01 => diagonal(&[ONE, phase(params[0]), ONE, ONE]),
        StandardGate::CPhase10 => diagonal(&[ONE, ONE, phase(params[0]), ONE]),
        StandardGate::XX => xx(params[0]),
        StandardGate::YY => yy(params[0]),
        StandardGate::ZZ => zz(params[0]),
        // xy(-1/2) is iSWAP.
        StandardGate::XY => {
            let (cos, sin) = half_angle(2.0 * PI * params[0]);
            array![
                [ONE, ZERO, ZERO, ZERO],
                [ZERO, c(cos, 0.0), c(0.0, -sin), ZERO],
                [ZERO, c(0.0, -sin), c(cos, 0.0), ZERO],
                [ZERO, ZERO, ZERO, ONE],
            ]
        }
        // XX, YY and ZZ commute, so the canonical gate is their product.
        StandardGate::Can => xx(params[0]).dot(&yy(params[1])).dot(&zz(params[2])),

        StandardGate::CCNot => permutation(&[0, 1, 2, 3, 4, 5, 7, 6]),
        StandardGate::CSwap => permutation(&[0, 1, 2, 3, 4, 6, 5, 7]),
    }
}

/// `(cos θ/2, sin θ/2)`
fn half_angle(theta: f64) -> (f64, f64) {
    ((theta / 2.0).cos(), (theta / 2.0).sin())
}

/// `(cos πt/2, sin πt/2)` for an exponent in half-turns.
fn half_turn(t: f64) -> (f64, f64) {
    half_angle(PI * t)
}

fn xx(t: f64) -> Array2<Complex64> {
    let (cos, sin) = half_turn(t);
    let (d, o) = (c(cos, 0.0), c(0.0, -sin));
    array![
        [d, ZERO, ZERO, o],
        [ZERO, d, o, ZERO],
        [ZERO, o, d, ZERO],
        [o, ZERO, ZERO, d],
    ]
}

fn yy(t: f64) -> Array2<Complex64> {
    let (cos, sin) = half_turn(t);
    let d = c(cos, 0.0);
    array![
        [d, ZERO, ZERO, c(0.0, sin)],
        [ZERO, d, c(0.0, -sin), ZERO],
        [ZERO, c(0.0, -sin), d, ZERO],
        [c(0.0, sin), ZERO, ZERO, d],
    ]
}

fn zz(t: f64) -> Array2<Complex64> {
    let lo = phase(-PI * t / 2.0);
    let hi = phase(PI * t / 2.0);
    diagonal(&[lo, hi, hi, lo])
}

fn sqrt_x() -> Array2<Complex64> {
    array![[c(0.5, 0.5), c(0.5, -0.5)], [c(0.5, -0.5), c(0.5, 0.5)]]
}

/// Diagonal matrix from its entries.
pub fn diagonal(entries: &[Complex64]) -> Array2<Complex64> {
    let mut m = Array2::zeros((entries.len(), entries.len()));
    for (i, e) in entries.iter().enumerate() {
        m[[i, i]] = *e;
    }
    m
}

/// Permutation matrix mapping basis state `j` to `perm[j]`.
pub fn permutation(perm: &[usize]) -> Array2<Complex64> {
    let mut m = Array2::zeros((perm.len(), perm.len()));
    for (col, &row) in perm.iter().enumerate() {
        m[[row, col]] = ONE;
    }
    m
}

/// Single-control version of `u`; the control is the first (most significant) qubit.
pub fn controlled(u: &Array2<Complex64>) -> Array2<Complex64> {
    let d = u.nrows();
    let mut m = Array2::eye(2 * d);
    m.slice_mut(ndarray::s![d.., d..]).assign(u);
    m
}

/// Conjugate transpose.
pub fn adjoint(m: &Array2<Complex64>) -> Array2<Complex64> {
    m.t().mapv(|z| z.conj())
}

/// Check `U†U = I` within `tolerance` (max elementwise deviation).
pub fn is_unitary(m: &Array2<Complex64>, tolerance: f64) -> bool {
    if m.nrows() != m.ncols() {
        return false;
    }
    let product = adjoint(m).dot(m);
    product
        .indexed_iter()
        .all(|((r, col), z)| {
            let expected = if r == col { ONE } else { ZERO };
            (z - expected).norm() <= tolerance
        })
}

/// Draw a Haar-random unitary on `num_qubits` qubits.
///
/// Gram-Schmidt orthonormalisation of a complex Ginibre matrix; equivalent to
/// a QR decomposition with a positive-real diagonal in `R`.
pub fn random_unitary<R: Rng + ?Sized>(num_qubits: usize, rng: &mut R) -> Array2<Complex64> {
    let dim = 1usize << num_qubits;
    let mut m: Array2<Complex64> =
        Array2::from_shape_fn((dim, dim), |_| c(gaussian(rng), gaussian(rng)));

    for j in 0..dim {
        for k in 0..j {
            let proj: Complex64 = (0..dim).map(|r| m[[r, k]].conj() * m[[r, j]]).sum();
            for r in 0..dim {
                let sub = proj * m[[r, k]];
                m[[r, j]] -= sub;
            }
        }
        let norm = (0..dim).map(|r| m[[r, j]].norm_sqr()).sum::<f64>().sqrt();
        for r in 0..dim {
            m[[r, j]] /= norm;
        }
    }
    m
}

/// Standard normal sample (Box-Muller).
fn gaussian<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = rng.gen_range(f64::MIN_POSITIVE..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}
