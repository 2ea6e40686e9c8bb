//! Integration tests for executing native circuits through the simulator backend.

use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use qbridge_adapter_sim::SimulatorBackend;
use qbridge_hal::{BackendConfig, BackendFactory, HalError};
use qbridge_ir::{
    Circuit, CircuitBuilder, NO_PARAMS, NamedGate, QubitId, StandardGate, random_unitary,
    simulate, states_close,
};
use qbridge_translate::{BridgeConfig, BridgeError, CircuitTranslator, SimulatorAdapter};

fn q(i: u32) -> QubitId {
    QubitId(i)
}

fn adapter() -> SimulatorAdapter<SimulatorBackend> {
    SimulatorAdapter::new(CircuitTranslator::standard(), SimulatorBackend::new())
}

/// Depth-six circuit over three qubits mixing dictionary gates, half-turn
/// gates, fallback gates and explicit unitaries.
fn mixed_circuit(seed: u64) -> Circuit {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut builder = CircuitBuilder::new("mixed");
    builder
        // Layer 1
        .h(q(0))
        .unwrap()
        .ry(0.3, q(1))
        .unwrap()
        .v(q(2))
        .unwrap()
        // Layer 2
        .can(0.2, -0.15, 0.4, q(0), q(1))
        .unwrap()
        .rz(-1.1, q(2))
        .unwrap()
        // Layer 3
        .cv(q(2), q(1))
        .unwrap()
        .phase(0.9, q(0))
        .unwrap()
        // Layer 4
        .standard(StandardGate::CPhase01, [0.6], [q(0), q(2)])
        .unwrap()
        .xx(0.35, q(1), q(2))
        .unwrap()
        // Layer 5
        .unitary(random_unitary(2, &mut rng), [q(2), q(0)])
        .unwrap()
        .yy(-0.2, q(1), q(0))
        .unwrap()
        // Layer 6
        .standard(StandardGate::CPhase10, [1.3], [q(1), q(2)])
        .unwrap()
        .xy(0.45, q(0), q(1))
        .unwrap()
        .zz(0.7, q(2), q(0))
        .unwrap()
        .standard(StandardGate::CSwap, NO_PARAMS, [q(1), q(0), q(2)])
        .unwrap();
    builder.build()
}

#[tokio::test]
async fn mixed_circuit_matches_native_simulation() {
    let adapter = adapter();
    for seed in 0..5 {
        let circuit = mixed_circuit(seed);
        let state = adapter.run(&circuit).await.unwrap();
        let expected = simulate(&circuit).unwrap();
        assert!(
            state.fidelity(&expected) >= 1.0 - 1e-6,
            "seed {seed}: fidelity {}",
            state.fidelity(&expected)
        );
    }
    assert_eq!(adapter.backend().completed_runs(), 5);
}

#[tokio::test]
async fn sparse_labels_come_back_in_native_order() {
    // Label 3 is used first, labels 0 and 2 never
    let mut builder = CircuitBuilder::new("sparse");
    builder
        .x(q(3))
        .unwrap()
        .h(q(1))
        .unwrap()
        .cnot(q(1), q(3))
        .unwrap()
        .ry(0.8, q(3))
        .unwrap();
    let circuit = builder.build();

    let state = adapter().run(&circuit).await.unwrap();
    assert_eq!(state.labels(), &[q(0), q(1), q(2), q(3)]);
    assert!(states_close(&state, &simulate(&circuit).unwrap(), 1e-10));
}

#[tokio::test]
async fn unsupported_gate_never_reaches_backend() {
    let circuit = Circuit::from_gates(
        "bad",
        [
            NamedGate::standard(StandardGate::H, NO_PARAMS, [q(0)]).into(),
            NamedGate::new("oracle", NO_PARAMS, [q(0)]).into(),
        ],
    )
    .unwrap();

    let adapter = adapter();
    let err = adapter.run(&circuit).await.unwrap_err();
    assert!(matches!(err, BridgeError::UnsupportedGate { index: 1, .. }));
    assert_eq!(adapter.backend().completed_runs(), 0);
}

#[tokio::test]
async fn configured_width_limit() {
    let translator =
        CircuitTranslator::standard().with_config(BridgeConfig::new().with_max_qubits(3));
    let adapter = SimulatorAdapter::new(translator, SimulatorBackend::new());

    assert!(adapter.run(&Circuit::ghz(3).unwrap()).await.is_ok());
    let err = adapter.run(&Circuit::ghz(4).unwrap()).await.unwrap_err();
    assert!(matches!(
        err,
        BridgeError::SimulationError {
            gate_index: None,
            source: HalError::CircuitTooLarge(_),
        }
    ));
}

#[tokio::test]
async fn backend_from_config() {
    let config = BackendConfig::from_json(r#"{"name": "sim", "max_qubits": 2}"#).unwrap();
    let backend = SimulatorBackend::from_config(config).unwrap();
    let adapter = SimulatorAdapter::new(CircuitTranslator::standard(), backend);

    assert!(adapter.run(&Circuit::bell().unwrap()).await.is_ok());
    assert!(matches!(
        adapter.run(&Circuit::ghz(3).unwrap()).await,
        Err(BridgeError::SimulationError { .. })
    ));
}

#[tokio::test]
async fn run_can_be_bounded_by_timeout() {
    let adapter = adapter();
    let state = tokio::time::timeout(Duration::from_secs(10), adapter.run(&Circuit::ghz(5).unwrap()))
        .await
        .expect("simulation timed out")
        .unwrap();
    assert!((state.probabilities()[0] - 0.5).abs() < 1e-10);
    assert!((state.probabilities()[0b11111] - 0.5).abs() < 1e-10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_runs_share_one_adapter() {
    let adapter = Arc::new(adapter());

    let handles: Vec<_> = (0..8u64)
        .map(|seed| {
            let adapter = Arc::clone(&adapter);
            tokio::spawn(async move {
                let circuit = mixed_circuit(seed);
                let state = adapter.run(&circuit).await.unwrap();
                states_close(&state, &simulate(&circuit).unwrap(), 1e-6)
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap());
    }
    assert_eq!(adapter.backend().completed_runs(), 8);
}
