//! Execution backend trait and configuration.
//!
//! An [`Executor`] takes a circuit in its own external representation and
//! returns the final amplitude vector in its own bit order:
//!
//! ```text
//!   name() / bit_order() ──→ run(&circuit) ──→ ExecutionOutput
//!        (sync)                  (async)
//! ```
//!
//! `run` may block on a slow or remote backend. Executors perform no retries;
//! callers that need timeouts wrap the future (e.g. `tokio::time::timeout`).

use async_trait::async_trait;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::circuit::ExternalCircuit;
use crate::error::{HalError, HalResult};

/// How a backend maps qubit indices onto amplitude-index bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BitOrder {
    /// Qubit 0 is the least significant bit.
    LittleEndian,
    /// Qubit 0 is the most significant bit.
    BigEndian,
}

impl BitOrder {
    /// Bit position of `qubit` in an amplitude index over `num_qubits` qubits.
    #[inline]
    pub fn bit_position(self, qubit: usize, num_qubits: usize) -> usize {
        match self {
            BitOrder::LittleEndian => qubit,
            BitOrder::BigEndian => num_qubits - 1 - qubit,
        }
    }
}

/// Result of executing a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionOutput {
    /// Final amplitudes, `2^N` entries in the backend's bit order.
    pub amplitudes: Vec<Complex64>,
    /// Bit order of `amplitudes`.
    pub bit_order: BitOrder,
    /// Wall-clock execution time in milliseconds, if measured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl ExecutionOutput {
    /// Create an output.
    pub fn new(amplitudes: Vec<Complex64>, bit_order: BitOrder) -> Self {
        Self {
            amplitudes,
            bit_order,
            execution_time_ms: None,
        }
    }

    /// Attach the execution time.
    #[must_use]
    pub fn with_execution_time(mut self, ms: u64) -> Self {
        self.execution_time_ms = Some(ms);
        self
    }

    /// Number of qubits described by the amplitudes, if the length is a power of two.
    pub fn num_qubits(&self) -> Option<usize> {
        let len = self.amplitudes.len();
        len.is_power_of_two().then(|| len.trailing_zeros() as usize)
    }
}

/// Configuration for a backend instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Name of the backend.
    pub name: String,
    /// Additional configuration.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BackendConfig {
    /// Create a new backend configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Add extra configuration.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Read an unsigned integer from the extra configuration.
    pub fn extra_u64(&self, key: &str) -> HalResult<Option<u64>> {
        match self.extra.get(key) {
            None => Ok(None),
            Some(value) => value.as_u64().map(Some).ok_or_else(|| {
                HalError::Configuration(format!("'{key}' must be an unsigned integer, got {value}"))
            }),
        }
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> HalResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// An execution backend for its own circuit representation.
///
/// `Send + Sync` so a single executor can serve concurrent `run` calls from
/// separate tasks.
#[async_trait]
pub trait Executor: Send + Sync {
    /// The backend's circuit type.
    type Circuit: ExternalCircuit + Send + Sync;

    /// Get the backend name.
    fn name(&self) -> &str;

    /// Bit order of the amplitudes returned by [`Executor::run`].
    fn bit_order(&self) -> BitOrder;

    /// Execute `circuit` from `|0…0⟩` and return the final amplitudes.
    async fn run(&self, circuit: &Self::Circuit) -> HalResult<ExecutionOutput>;
}

/// Construct a backend from configuration.
pub trait BackendFactory: Sized {
    /// Create a backend from `config`.
    fn from_config(config: BackendConfig) -> HalResult<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_position() {
        assert_eq!(BitOrder::LittleEndian.bit_position(0, 3), 0);
        assert_eq!(BitOrder::BigEndian.bit_position(0, 3), 2);
        assert_eq!(BitOrder::BigEndian.bit_position(2, 3), 0);
    }

    #[test]
    fn test_output_num_qubits() {
        let out = ExecutionOutput::new(vec![Complex64::new(0.0, 0.0); 8], BitOrder::LittleEndian);
        assert_eq!(out.num_qubits(), Some(3));
        let bad = ExecutionOutput::new(vec![Complex64::new(0.0, 0.0); 6], BitOrder::LittleEndian);
        assert_eq!(bad.num_qubits(), None);
    }

    #[test]
    fn test_config_extra() {
        let config = BackendConfig::from_json(r#"{"name": "sim", "max_qubits": 12}"#).unwrap();
        assert_eq!(config.name, "sim");
        assert_eq!(config.extra_u64("max_qubits").unwrap(), Some(12));
        assert_eq!(config.extra_u64("missing").unwrap(), None);

        let bad = BackendConfig::new("sim").with_extra("max_qubits", serde_json::json!("many"));
        assert!(matches!(
            bad.extra_u64("max_qubits"),
            Err(HalError::Configuration(_))
        ));
    }

    #[test]
    fn test_config_serializes_name_and_extra_only() {
        let config = BackendConfig::new("sim").with_extra("max_qubits", serde_json::json!(4));
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json, serde_json::json!({"name": "sim", "max_qubits": 4}));
    }
}
