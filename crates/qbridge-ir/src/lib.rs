//! qbridge Native Circuit Representation
//!
//! This crate provides the native side of the qbridge translation stack: the
//! gate and circuit types, a standard gate library with closed-form matrices,
//! and a small reference simulator used to check translations.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitId`] labels, not required to be contiguous
//! - **Gates**: [`Gate`] is a tagged union of [`NamedGate`] (library name,
//!   parameters, qubits) and [`UnitaryGate`] (explicit matrix, qubits)
//! - **Library**: [`StandardGate`] names every gate with a closed-form matrix
//! - **Circuit**: [`Circuit`] is an immutable gate sequence, built with
//!   [`CircuitBuilder`]
//! - **Reference simulator**: [`simulate`], [`circuit_unitary`] and the
//!   closeness checks [`circuits_close`], [`states_close`]
//!
//! # Conventions
//!
//! Matrices and states are big-endian. The first qubit a gate acts on is the
//! most significant bit of its matrix index, and in a [`StateVector`] the
//! lowest label is the most significant bit of the amplitude index.
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qbridge_ir::{CircuitBuilder, QubitId, simulate};
//!
//! let mut builder = CircuitBuilder::new("bell_state");
//! builder.h(QubitId(0)).unwrap();
//! builder.cnot(QubitId(0), QubitId(1)).unwrap();
//! let circuit = builder.build();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//!
//! let state = simulate(&circuit).unwrap();
//! assert!((state.probabilities()[0b11] - 0.5).abs() < 1e-12);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Parameters |
//! |------|--------|------------|
//! | `i`, `x`, `y`, `z`, `h`, `s`, `sdg`, `t`, `tdg`, `v`, `vdg` | 1 | – |
//! | `rx`, `ry`, `rz`, `phase` | 1 | angle (radians) |
//! | `cnot`, `cy`, `cz`, `cv`, `swap`, `iswap` | 2 | – |
//! | `pswap`, `cphase`, `cphase00`, `cphase01`, `cphase10` | 2 | angle (radians) |
//! | `xx`, `yy`, `zz`, `xy` | 2 | exponent (half-turns) |
//! | `can` | 2 | three exponents (half-turns) |
//! | `ccnot`, `cswap` | 3 | – |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod library;
pub mod qubit;
pub mod statevector;

pub use circuit::{Circuit, CircuitBuilder};
pub use error::{IrError, IrResult};
pub use gate::{Gate, NO_PARAMS, NamedGate, StandardGate, UnitaryGate, matrix_dim};
pub use library::{is_unitary, random_unitary};
pub use qubit::QubitId;
pub use statevector::{
    StateVector, circuit_unitary, circuits_close, simulate, states_close, unitaries_close,
};
