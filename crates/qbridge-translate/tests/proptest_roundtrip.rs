//! Property-based round-trip tests for circuit translation.
//!
//! Random native circuits (library gates plus Haar-random unitaries over one
//! to three qubits) are translated out and back, and the resulting circuit
//! must implement the same unitary up to a global phase. Random external
//! circuits are checked against the native simulation of their translation.

use std::f64::consts::PI;
use std::sync::Arc;

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use qbridge_adapter_sim::{GATE_SET, SimCircuit, SimulatorBackend};
use qbridge_hal::{BitOrder, ExternalCircuit, Executor};
use qbridge_ir::{
    Circuit, CircuitBuilder, QubitId, StandardGate, StateVector, circuits_close, random_unitary,
    simulate, states_close,
};
use qbridge_translate::{CircuitTranslator, GateDictionary};
use qbridge_translate::ordering::reorder_amplitudes;

/// Simplified gate representation for proptest generation.
#[derive(Debug, Clone)]
enum GateOp {
    Standard {
        gate: StandardGate,
        params: Vec<f64>,
        qubits: Vec<u32>,
    },
    Unitary {
        seed: u64,
        qubits: Vec<u32>,
    },
}

impl GateOp {
    fn apply(&self, builder: &mut CircuitBuilder) {
        match self {
            GateOp::Standard {
                gate,
                params,
                qubits,
            } => {
                builder
                    .standard(*gate, params.clone(), qubits.iter().map(|&q| QubitId(q)))
                    .unwrap();
            }
            GateOp::Unitary { seed, qubits } => {
                let mut rng = StdRng::seed_from_u64(*seed);
                let matrix = random_unitary(qubits.len(), &mut rng);
                builder
                    .unitary(matrix, qubits.iter().map(|&q| QubitId(q)))
                    .unwrap();
            }
        }
    }
}

/// Distinct qubits from `0..num_qubits`, in random order.
fn arb_qubits(num_qubits: u32, count: usize) -> impl Strategy<Value = Vec<u32>> {
    Just((0..num_qubits).collect::<Vec<_>>())
        .prop_shuffle()
        .prop_map(move |qubits| qubits[..count].to_vec())
}

/// Any library gate that fits on `num_qubits` qubits.
fn arb_standard_op(num_qubits: u32) -> BoxedStrategy<GateOp> {
    let gates: Vec<StandardGate> = StandardGate::ALL
        .iter()
        .copied()
        .filter(|g| g.num_qubits() <= num_qubits as usize)
        .collect();

    proptest::sample::select(gates)
        .prop_flat_map(move |gate| {
            (
                Just(gate),
                proptest::collection::vec(-PI..PI, gate.num_params()),
                arb_qubits(num_qubits, gate.num_qubits()),
            )
        })
        .prop_map(|(gate, params, qubits)| GateOp::Standard {
            gate,
            params,
            qubits,
        })
        .boxed()
}

/// Haar-random unitary over one to `num_qubits` qubits.
fn arb_unitary_op(num_qubits: u32) -> BoxedStrategy<GateOp> {
    (1..=num_qubits as usize)
        .prop_flat_map(move |k| (any::<u64>(), arb_qubits(num_qubits, k)))
        .prop_map(|(seed, qubits)| GateOp::Unitary { seed, qubits })
        .boxed()
}

fn arb_gate_op(num_qubits: u32) -> BoxedStrategy<GateOp> {
    prop_oneof![
        4 => arb_standard_op(num_qubits),
        1 => arb_unitary_op(num_qubits),
    ]
    .boxed()
}

/// Random circuit on 1-3 qubits with 1-12 gates.
fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (1_u32..=3)
        .prop_flat_map(|num_qubits| proptest::collection::vec(arb_gate_op(num_qubits), 1..=12))
        .prop_map(|ops| {
            let mut builder = CircuitBuilder::new("random");
            for op in &ops {
                op.apply(&mut builder);
            }
            builder.build()
        })
}

/// Random external circuit over gates the standard dictionary reads back.
fn arb_external_circuit() -> impl Strategy<Value = SimCircuit> {
    let translator = CircuitTranslator::standard();
    let names: Vec<(&'static str, usize, usize)> = GATE_SET
        .iter()
        .copied()
        .filter(|(name, _, _)| translator.dictionary().lookup_external(name).is_ok())
        .collect();

    (1_u32..=3).prop_flat_map(move |num_qubits| {
        let ops: Vec<(&'static str, usize, usize)> = names
            .iter()
            .copied()
            .filter(|(_, q, _)| *q <= num_qubits as usize)
            .collect();
        let op = proptest::sample::select(ops).prop_flat_map(move |(name, q, p)| {
            (
                Just(name),
                arb_qubits(num_qubits, q),
                proptest::collection::vec(-PI..PI, p),
            )
        });
        proptest::collection::vec(op, 1..=10).prop_map(move |ops| {
            let top = num_qubits as usize - 1;
            let mut external = SimCircuit::new(num_qubits as usize);
            // Pin the width so native and external agree.
            external.append_named_gate("i", &[top], &[]);
            for (name, qubits, params) in ops {
                let qubits: Vec<usize> = qubits.iter().map(|&q| q as usize).collect();
                external.append_named_gate(name, &qubits, &params);
            }
            external
        })
    })
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Test that native → external → native preserves the circuit unitary.
    #[test]
    fn test_round_trip_preserves_unitary(circuit in arb_circuit()) {
        let translator = CircuitTranslator::standard();

        let (external, map): (SimCircuit, _) = translator
            .translate_out_with_map(&circuit)
            .expect("Failed to translate circuit out");
        let back = translator
            .translate_in_with_map(&external, &map)
            .expect("Failed to translate circuit back in");

        prop_assert_eq!(back.len(), circuit.len(), "Gate count changed in round trip");
        prop_assert_eq!(back.num_qubits(), circuit.num_qubits());
        prop_assert!(
            circuits_close(&circuit, &back, 1e-7).unwrap(),
            "Round trip changed the circuit unitary"
        );
    }

    /// Test that disabling named translation entirely still round-trips.
    #[test]
    fn test_unitary_only_round_trip(circuit in arb_circuit()) {
        let empty = GateDictionary::from_entries(vec![]).unwrap();
        let translator = CircuitTranslator::new(Arc::new(empty));

        let (external, map): (SimCircuit, _) = translator.translate_out_with_map(&circuit).unwrap();
        prop_assert!(external.operations().iter().all(|op| op.is_unitary()));

        let back = translator.translate_in_with_map(&external, &map).unwrap();
        prop_assert!(circuits_close(&circuit, &back, 1e-7).unwrap());
    }

    /// Test that translation is deterministic.
    #[test]
    fn test_translation_is_deterministic(circuit in arb_circuit()) {
        let translator = CircuitTranslator::standard();
        let first: SimCircuit = translator.translate_out(&circuit).unwrap();
        let second: SimCircuit = translator.translate_out(&circuit).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Test that an external circuit and its native translation prepare the same state.
    #[test]
    fn test_inbound_matches_backend(external in arb_external_circuit()) {
        let translator = CircuitTranslator::standard();
        let native = translator.translate_in(&external).unwrap();
        prop_assert_eq!(native.num_qubits(), external.num_qubits());

        let backend = SimulatorBackend::new();
        let output = block_on(backend.run(&external)).unwrap();
        prop_assert_eq!(output.bit_order, BitOrder::LittleEndian);

        let n = external.num_qubits();
        let positions: Vec<usize> = (0..n).collect();
        let amplitudes = reorder_amplitudes(&output.amplitudes, output.bit_order, &positions);
        let labels: Vec<QubitId> = (0..n).map(QubitId::from).collect();
        let from_backend = StateVector::new(labels, amplitudes).unwrap();

        let expected = simulate(&native).unwrap();
        prop_assert!(
            states_close(&from_backend, &expected, 1e-9),
            "fidelity {}",
            from_backend.fidelity(&expected)
        );
    }
}
