//! qbridge Hardware Abstraction Layer
//!
//! This crate describes the external side of a translation: the circuit
//! representation of an interoperating backend and the backend that runs it.
//!
//! # Overview
//!
//! - [`ExternalCircuit`]: a builder with two append operations (named gate,
//!   generic unitary) and a read-back view as [`ExternalOp`]s
//! - [`Executor`]: runs an external circuit and returns its final amplitudes
//!   in the backend's [`BitOrder`]
//! - [`BackendConfig`] / [`BackendFactory`]: configuration-driven construction
//!
//! Concrete backends live in the `adapters/` crates; tests substitute
//! recording mocks for either trait.
//!
//! # Implementing a Custom Backend
//!
//! ```ignore
//! use qbridge_hal::{BitOrder, ExecutionOutput, Executor, HalResult};
//! use async_trait::async_trait;
//!
//! struct MyBackend;
//!
//! #[async_trait]
//! impl Executor for MyBackend {
//!     type Circuit = MyCircuit;
//!
//!     fn name(&self) -> &str { "my_backend" }
//!
//!     fn bit_order(&self) -> BitOrder { BitOrder::BigEndian }
//!
//!     async fn run(&self, circuit: &MyCircuit) -> HalResult<ExecutionOutput> {
//!         // Execute and return 2^N amplitudes
//!         # todo!()
//!     }
//! }
//! ```

pub mod backend;
pub mod circuit;
pub mod error;

pub use backend::{BackendConfig, BackendFactory, BitOrder, ExecutionOutput, Executor};
pub use circuit::{ExternalCircuit, ExternalOp};
pub use error::{HalError, HalResult};
