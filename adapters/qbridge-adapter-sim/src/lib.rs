//! qbridge Local Statevector Backend
//!
//! This crate provides a concrete external circuit ([`SimCircuit`]) and an
//! exact statevector executor ([`SimulatorBackend`]) for the qbridge HAL.
//! It is the in-tree counterpart of a remote interoperating backend: it has
//! its own gate names, radian parameters and little-endian conventions.
//!
//! # Gate Set
//!
//! | Gate | Qubits | Parameters |
//! |------|--------|------------|
//! | `i`, `x`, `y`, `z`, `h`, `s`, `si`, `t`, `ti`, `v`, `vi` | 1 | – |
//! | `rx`, `ry`, `rz`, `phaseshift` | 1 | angle |
//! | `cnot`, `cy`, `cz`, `swap`, `iswap` | 2 | – |
//! | `pswap`, `cphaseshift`, `cphaseshift00/01/10`, `xx`, `yy`, `zz`, `xy` | 2 | angle |
//! | `ccnot`, `cswap` | 3 | – |
//!
//! All angles are in radians; `xx(θ) = exp(-iθ/2 X⊗X)` and similarly for
//! `yy`, `zz`; `xy(θ)` has middle block `[[cos θ/2, i sin θ/2], [i sin θ/2, cos θ/2]]`.
//!
//! # Conventions
//!
//! - Result amplitudes: qubit 0 is the least significant bit.
//! - Generic unitaries: `targets[0]` is the least significant bit of the
//!   matrix index.
//! - Named gates: the first qubit argument is the most significant bit of the
//!   gate's matrix (the control for controlled gates).
//!
//! # Example
//!
//! ```ignore
//! use qbridge_adapter_sim::{SimCircuit, SimulatorBackend};
//! use qbridge_hal::Executor;
//!
//! #[tokio::main]
//! async fn main() -> qbridge_hal::HalResult<()> {
//!     let backend = SimulatorBackend::new();
//!
//!     let mut circuit = SimCircuit::new(2);
//!     circuit.h(0).cnot(0, 1);
//!
//!     let output = backend.run(&circuit).await?;
//!     // Expect amplitude 1/√2 on |00⟩ and |11⟩
//!     println!("{:?}", output.amplitudes);
//!     Ok(())
//! }
//! ```

mod circuit;
mod simulator;
mod statevector;

pub use circuit::SimCircuit;
pub use simulator::SimulatorBackend;
pub use statevector::{GATE_SET, gate_signature};
