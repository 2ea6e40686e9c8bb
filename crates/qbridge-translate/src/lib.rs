//! qbridge Circuit Translation
//!
//! Bidirectional translation between the native circuit IR (`qbridge-ir`)
//! and the external representation of an interoperating backend
//! (`qbridge-hal`), with exact unitary semantics.
//!
//! # Components
//!
//! - [`GateDictionary`]: data table of native ↔ external gate names, parameter
//!   scaling and qubit permutations
//! - [`UnitaryCodec`]: dense matrix encode/decode across bit-order conventions
//! - [`CircuitTranslator`]: whole-circuit translation, falling back to a
//!   generic unitary for gates the dictionary does not name
//! - [`SimulatorAdapter`]: runs a native circuit on an [`Executor`] and
//!   returns a native [`StateVector`]
//! - [`ordering`]: the qubit-ordering conventions and [`QubitMap`]
//!
//! # Example
//!
//! ```rust
//! use qbridge_adapter_sim::SimCircuit;
//! use qbridge_ir::{Circuit, circuits_close};
//! use qbridge_translate::CircuitTranslator;
//!
//! let translator = CircuitTranslator::standard();
//! let circuit = Circuit::bell().unwrap();
//!
//! let external: SimCircuit = translator.translate_out(&circuit).unwrap();
//! let back = translator.translate_in(&external).unwrap();
//!
//! assert!(circuits_close(&circuit, &back, 1e-10).unwrap());
//! ```
//!
//! [`Executor`]: qbridge_hal::Executor
//! [`StateVector`]: qbridge_ir::StateVector

pub mod adapter;
pub mod codec;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod ordering;
pub mod translator;

pub use adapter::SimulatorAdapter;
pub use codec::{DEFAULT_UNITARY_TOLERANCE, UnitaryCodec};
pub use config::BridgeConfig;
pub use dictionary::{GateDictionary, GateMappingEntry, ParamDomain, ParamRule, QubitTransform};
pub use error::{BridgeError, BridgeResult};
pub use ordering::QubitMap;
pub use translator::CircuitTranslator;
