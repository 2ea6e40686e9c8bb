//! Execute native circuits on an external backend.
//!
//! ```text
//!   Circuit ──translate_out_with_map──→ (B::Circuit, QubitMap)
//!           ──backend.run──→ amplitudes in the backend's BitOrder
//!           ──reorder_amplitudes──→ StateVector (native big-endian, ascending labels)
//! ```

use tracing::{debug, instrument};

use qbridge_hal::{Executor, HalError};
use qbridge_ir::{Circuit, StateVector};

use crate::error::{BridgeError, BridgeResult};
use crate::ordering::{QubitMap, reorder_amplitudes};
use crate::translator::CircuitTranslator;

/// Runs native circuits on a backend and returns native statevectors.
///
/// Performs no retries and no internal concurrency. Independent `run` calls
/// may proceed concurrently on separate tasks; wrap a call in
/// `tokio::time::timeout` to bound it.
pub struct SimulatorAdapter<B: Executor> {
    translator: CircuitTranslator,
    backend: B,
}

impl<B: Executor> SimulatorAdapter<B> {
    /// Create an adapter.
    pub fn new(translator: CircuitTranslator, backend: B) -> Self {
        Self {
            translator,
            backend,
        }
    }

    /// Get the translator.
    pub fn translator(&self) -> &CircuitTranslator {
        &self.translator
    }

    /// Get the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Simulate `circuit` from `|0…0⟩` on the backend.
    ///
    /// The result is over the labels `0..circuit.num_qubits()` in native
    /// layout, directly comparable with [`qbridge_ir::simulate`]. Explicit
    /// unitaries are checked against the translator's tolerance first.
    #[instrument(skip_all, fields(backend = self.backend.name(), circuit = circuit.name()))]
    pub async fn run(&self, circuit: &Circuit) -> BridgeResult<StateVector> {
        let num_qubits = circuit.num_qubits();
        let too_large = |limit: String| BridgeError::SimulationError {
            gate_index: None,
            source: HalError::CircuitTooLarge(format!(
                "Circuit has {num_qubits} qubits but {limit}"
            )),
        };
        if let Some(max) = self.translator.config().max_qubits {
            if num_qubits > max {
                return Err(too_large(format!("the configured limit is {max}")));
            }
        }
        let expected = u32::try_from(num_qubits)
            .ok()
            .and_then(|n| 1usize.checked_shl(n))
            .ok_or_else(|| too_large("its amplitudes are not addressable".into()))?;

        self.translator.check_unitaries(circuit)?;
        let (external, map): (B::Circuit, QubitMap) =
            self.translator.translate_out_with_map(circuit)?;
        let output = self.backend.run(&external).await?;

        if output.amplitudes.len() != expected {
            return Err(BridgeError::SimulationError {
                gate_index: None,
                source: HalError::Backend(format!(
                    "Backend returned {} amplitudes, expected {expected}",
                    output.amplitudes.len()
                )),
            });
        }

        let (labels, positions) = map.sorted();
        let amplitudes = reorder_amplitudes(&output.amplitudes, output.bit_order, &positions);
        debug!(
            "Recovered {} amplitudes from {:?} backend output",
            amplitudes.len(),
            output.bit_order
        );
        Ok(StateVector::new(labels, amplitudes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use num_complex::Complex64;
    use qbridge_adapter_sim::{SimCircuit, SimulatorBackend};
    use qbridge_hal::{BitOrder, ExecutionOutput, HalResult};
    use qbridge_ir::{CircuitBuilder, QubitId, simulate, states_close};

    use crate::config::BridgeConfig;

    struct FixedBackend {
        amplitudes: Vec<Complex64>,
        bit_order: BitOrder,
    }

    #[async_trait]
    impl Executor for FixedBackend {
        type Circuit = SimCircuit;

        fn name(&self) -> &str {
            "fixed"
        }

        fn bit_order(&self) -> BitOrder {
            self.bit_order
        }

        async fn run(&self, _circuit: &SimCircuit) -> HalResult<ExecutionOutput> {
            Ok(ExecutionOutput::new(self.amplitudes.clone(), self.bit_order))
        }
    }

    #[tokio::test]
    async fn test_non_unitary_rejected_before_backend() {
        let skew = ndarray::array![
            [Complex64::new(1.0, 0.0), Complex64::new(1e-3, 0.0)],
            [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)],
        ];
        let mut builder = CircuitBuilder::new("skew");
        builder.h(QubitId(0)).unwrap().unitary(skew, [QubitId(0)]).unwrap();
        let circuit = builder.build();

        let adapter = SimulatorAdapter::new(CircuitTranslator::standard(), SimulatorBackend::new());
        assert!(matches!(
            adapter.run(&circuit).await,
            Err(BridgeError::NonUnitary { index: 1, .. })
        ));
        assert_eq!(adapter.backend().completed_runs(), 0);

        // A loose enough tolerance lets it through
        let loose = CircuitTranslator::standard()
            .with_config(BridgeConfig::default().with_unitary_tolerance(1e-2));
        let adapter = SimulatorAdapter::new(loose, SimulatorBackend::new());
        assert!(adapter.run(&circuit).await.is_ok());
    }

    #[tokio::test]
    async fn test_bell_state_matches_native() {
        let adapter = SimulatorAdapter::new(CircuitTranslator::standard(), SimulatorBackend::new());
        let circuit = Circuit::bell().unwrap();

        let state = adapter.run(&circuit).await.unwrap();
        let native = simulate(&circuit).unwrap();
        assert!(states_close(&state, &native, 1e-10));
    }

    #[tokio::test]
    async fn test_asymmetric_state_is_reordered() {
        // X on label 0 only: native big-endian index 0b10
        let mut builder = CircuitBuilder::new("x0");
        builder.x(QubitId(0)).unwrap().h(QubitId(1)).unwrap().h(QubitId(1)).unwrap();
        let circuit = builder.build();

        let adapter = SimulatorAdapter::new(CircuitTranslator::standard(), SimulatorBackend::new());
        let state = adapter.run(&circuit).await.unwrap();
        assert!((state.probabilities()[0b10] - 1.0).abs() < 1e-10);
        assert_eq!(state.labels(), &[QubitId(0), QubitId(1)]);
    }

    #[tokio::test]
    async fn test_big_endian_backend() {
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 4];
        amplitudes[0b01] = Complex64::new(1.0, 0.0);
        let backend = FixedBackend {
            amplitudes,
            bit_order: BitOrder::BigEndian,
        };
        let mut builder = CircuitBuilder::new("pair");
        builder.cnot(QubitId(0), QubitId(1)).unwrap();

        let adapter = SimulatorAdapter::new(CircuitTranslator::standard(), backend);
        let state = adapter.run(&builder.build()).await.unwrap();
        assert!((state.probabilities()[0b01] - 1.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_wrong_amplitude_count() {
        let backend = FixedBackend {
            amplitudes: vec![Complex64::new(1.0, 0.0); 2],
            bit_order: BitOrder::LittleEndian,
        };
        let adapter = SimulatorAdapter::new(CircuitTranslator::standard(), backend);
        let err = adapter.run(&Circuit::bell().unwrap()).await.unwrap_err();
        assert!(matches!(err, BridgeError::SimulationError { gate_index: None, .. }));
    }

    #[tokio::test]
    async fn test_max_qubits_enforced() {
        let translator =
            CircuitTranslator::standard().with_config(BridgeConfig::default().with_max_qubits(2));
        let adapter = SimulatorAdapter::new(translator, SimulatorBackend::new());

        let err = adapter.run(&Circuit::ghz(3).unwrap()).await.unwrap_err();
        assert!(matches!(
            err,
            BridgeError::SimulationError {
                source: HalError::CircuitTooLarge(_),
                ..
            }
        ));
        assert_eq!(adapter.backend().completed_runs(), 0);
    }

    #[tokio::test]
    async fn test_backend_limit_surfaces_as_simulation_error() {
        let adapter =
            SimulatorAdapter::new(CircuitTranslator::standard(), SimulatorBackend::with_max_qubits(2));
        let err = adapter.run(&Circuit::ghz(4).unwrap()).await.unwrap_err();
        assert!(matches!(err, BridgeError::SimulationError { .. }));
    }

    #[tokio::test]
    async fn test_empty_circuit() {
        let adapter = SimulatorAdapter::new(CircuitTranslator::standard(), SimulatorBackend::new());
        let state = adapter.run(&Circuit::empty("empty")).await.unwrap();
        assert_eq!(state.num_qubits(), 0);
        assert_eq!(state.amplitudes().len(), 1);
    }
}
