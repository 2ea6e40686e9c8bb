//! Simulator backend implementation.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, instrument};

use qbridge_hal::{
    BackendConfig, BackendFactory, BitOrder, ExecutionOutput, Executor, ExternalCircuit, HalError,
    HalResult,
};

use crate::circuit::SimCircuit;
use crate::statevector::Statevector;

/// Default qubit limit.
const DEFAULT_MAX_QUBITS: u32 = 20;

/// Local simulator backend.
///
/// Executes a [`SimCircuit`] from `|0…0⟩` and returns the exact final
/// amplitudes, little-endian (qubit 0 is the least significant bit).
/// It supports circuits up to ~20 qubits (limited by memory).
pub struct SimulatorBackend {
    /// Backend configuration.
    config: BackendConfig,
    /// Maximum number of qubits supported.
    max_qubits: u32,
    /// Completed runs.
    runs: AtomicU64,
}

impl SimulatorBackend {
    /// Create a new simulator backend with default settings.
    pub fn new() -> Self {
        Self::with_max_qubits(DEFAULT_MAX_QUBITS)
    }

    /// Create a simulator with custom max qubits.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self {
            config: BackendConfig::new("simulator"),
            max_qubits,
            runs: AtomicU64::new(0),
        }
    }

    /// Maximum number of qubits.
    pub fn max_qubits(&self) -> u32 {
        self.max_qubits
    }

    /// Number of successfully completed runs.
    pub fn completed_runs(&self) -> u64 {
        self.runs.load(Ordering::Relaxed)
    }

    /// Run simulation synchronously.
    #[instrument(skip(self, circuit))]
    fn run_simulation(&self, circuit: &SimCircuit) -> HalResult<ExecutionOutput> {
        let start = Instant::now();

        let num_qubits = circuit.num_qubits();
        debug!(
            "Starting simulation: {} qubits, {} operations",
            num_qubits,
            circuit.len()
        );

        let mut sv = Statevector::new(num_qubits);
        for (index, op) in circuit.operations().iter().enumerate() {
            sv.apply(index, op)?;
        }

        let elapsed = start.elapsed();
        debug!(
            "Simulation of {} qubits completed in {:?}",
            sv.num_qubits(),
            elapsed
        );

        Ok(ExecutionOutput::new(sv.into_amplitudes(), BitOrder::LittleEndian)
            .with_execution_time(elapsed.as_millis() as u64))
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Executor for SimulatorBackend {
    type Circuit = SimCircuit;

    fn name(&self) -> &str {
        &self.config.name
    }

    fn bit_order(&self) -> BitOrder {
        BitOrder::LittleEndian
    }

    #[instrument(skip(self, circuit))]
    async fn run(&self, circuit: &SimCircuit) -> HalResult<ExecutionOutput> {
        // Validate circuit size
        if circuit.num_qubits() > self.max_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                self.max_qubits
            )));
        }

        let output = self.run_simulation(circuit)?;
        self.runs.fetch_add(1, Ordering::Relaxed);
        Ok(output)
    }
}

impl BackendFactory for SimulatorBackend {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let max_qubits = match config.extra_u64("max_qubits")? {
            None => DEFAULT_MAX_QUBITS,
            Some(v) => u32::try_from(v).map_err(|_| {
                HalError::Configuration(format!("max_qubits {v} does not fit in u32"))
            })?,
        };

        Ok(Self {
            config,
            max_qubits,
            runs: AtomicU64::new(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    fn probabilities(output: &ExecutionOutput) -> Vec<f64> {
        output.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    #[tokio::test]
    async fn test_simulator_bell_state() {
        let backend = SimulatorBackend::new();

        let mut circuit = SimCircuit::new(2);
        circuit.h(0).cnot(0, 1);
        let output = backend.run(&circuit).await.unwrap();

        assert_eq!(output.bit_order, BitOrder::LittleEndian);
        assert_eq!(output.amplitudes.len(), 4);
        let probs = probabilities(&output);
        assert!((probs[0b00] - 0.5).abs() < 1e-10);
        assert!((probs[0b11] - 0.5).abs() < 1e-10);
        assert_eq!(backend.completed_runs(), 1);
    }

    #[tokio::test]
    async fn test_simulator_ghz_state() {
        let backend = SimulatorBackend::new();

        let mut circuit = SimCircuit::new(3);
        circuit.h(0).cnot(0, 1).cnot(1, 2);
        let output = backend.run(&circuit).await.unwrap();

        let probs = probabilities(&output);
        assert!((probs[0b000] + probs[0b111] - 1.0).abs() < 1e-10);
    }

    #[tokio::test]
    async fn test_simulator_too_many_qubits() {
        let backend = SimulatorBackend::with_max_qubits(5);

        let circuit = SimCircuit::new(10);
        let result = backend.run(&circuit).await;

        assert!(matches!(result, Err(HalError::CircuitTooLarge(_))));
        assert_eq!(backend.completed_runs(), 0);
    }

    #[tokio::test]
    async fn test_simulator_reports_failing_operation() {
        let backend = SimulatorBackend::new();

        let mut circuit = SimCircuit::new(1);
        circuit.h(0).measure(0);
        let err = backend.run(&circuit).await.unwrap_err();

        assert_eq!(err.operation_index(), Some(1));
    }

    #[test]
    fn test_from_config() {
        let config = BackendConfig::new("local").with_extra("max_qubits", serde_json::json!(8));
        let backend = SimulatorBackend::from_config(config).unwrap();
        assert_eq!(backend.name(), "local");
        assert_eq!(backend.max_qubits(), 8);

        let default = SimulatorBackend::from_config(BackendConfig::new("sim")).unwrap();
        assert_eq!(default.max_qubits(), DEFAULT_MAX_QUBITS);
    }
}
