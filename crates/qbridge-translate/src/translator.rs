//! Bidirectional circuit translation.
//!
//! Each gate maps to exactly one operation, in order:
//!
//! ```text
//!   Named ──lookup_native──→ hit ──→ append_named_gate(external, qubits', params')
//!                          └ miss ──→ closed-form matrix ──→ UnitaryCodec::encode
//!   Unitary ─────────────────────────────────────────────→ UnitaryCodec::encode
//! ```
//!
//! The inbound direction is the mirror image. Translation is single-pass and
//! all-or-nothing: operations are staged and handed to the target only when
//! every gate has translated.

use std::sync::Arc;

use tracing::{debug, instrument, trace};

use qbridge_hal::{ExternalCircuit, ExternalOp};
use qbridge_ir::{Circuit, Gate, IrError, NamedGate, QubitId, UnitaryGate};

use crate::codec::UnitaryCodec;
use crate::config::BridgeConfig;
use crate::dictionary::GateDictionary;
use crate::error::{BridgeError, BridgeResult};
use crate::ordering::QubitMap;

/// Name given to circuits produced by [`CircuitTranslator::translate_in`].
pub const INBOUND_CIRCUIT_NAME: &str = "translated";

/// Translates circuits between the native IR and an [`ExternalCircuit`].
///
/// Stateless apart from its shared dictionary and configuration; one
/// translator can serve many threads.
#[derive(Debug, Clone)]
pub struct CircuitTranslator {
    dictionary: Arc<GateDictionary>,
    config: BridgeConfig,
}

impl CircuitTranslator {
    /// Create a translator over `dictionary` with the default configuration.
    pub fn new(dictionary: Arc<GateDictionary>) -> Self {
        Self {
            dictionary,
            config: BridgeConfig::default(),
        }
    }

    /// Create a translator over the standard dictionary.
    pub fn standard() -> Self {
        Self::new(GateDictionary::standard())
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the dictionary.
    pub fn dictionary(&self) -> &GateDictionary {
        &self.dictionary
    }

    /// Get the configuration.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Check every explicit unitary of `circuit` against the configured
    /// [`BridgeConfig::unitary_tolerance`].
    ///
    /// Translation itself never checks unitarity.
    pub fn check_unitaries(&self, circuit: &Circuit) -> BridgeResult<()> {
        let tolerance = self.config.unitary_tolerance;
        for (index, gate) in circuit.iter().enumerate() {
            if let Gate::Unitary(unitary) = gate {
                if !UnitaryCodec::check_unitary(&unitary.matrix, tolerance) {
                    return Err(BridgeError::NonUnitary { index, tolerance });
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // Native → external
    // =========================================================================

    /// Translate a native circuit into a new external circuit.
    pub fn translate_out<E: ExternalCircuit>(&self, circuit: &Circuit) -> BridgeResult<E> {
        self.translate_out_with_map(circuit).map(|(external, _)| external)
    }

    /// Translate a native circuit, also returning the qubit renumbering used.
    pub fn translate_out_with_map<E: ExternalCircuit>(
        &self,
        circuit: &Circuit,
    ) -> BridgeResult<(E, QubitMap)> {
        let map = QubitMap::for_circuit(circuit);
        let ops = self.stage_out(circuit, &map)?;
        let mut external = E::with_qubits(map.len());
        commit(&mut external, &ops)?;
        Ok((external, map))
    }

    /// Translate a native circuit, appending to an existing external circuit.
    ///
    /// Nothing is appended unless the whole circuit translates.
    pub fn translate_out_into<E: ExternalCircuit + ?Sized>(
        &self,
        circuit: &Circuit,
        target: &mut E,
    ) -> BridgeResult<QubitMap> {
        let map = QubitMap::for_circuit(circuit);
        let ops = self.stage_out(circuit, &map)?;
        commit(target, &ops)?;
        Ok(map)
    }

    #[instrument(skip_all, fields(circuit = circuit.name(), gates = circuit.len()))]
    fn stage_out(&self, circuit: &Circuit, map: &QubitMap) -> BridgeResult<Vec<ExternalOp>> {
        let ops = circuit
            .iter()
            .enumerate()
            .map(|(index, gate)| self.gate_out(index, gate, map))
            .collect::<BridgeResult<Vec<_>>>()?;

        debug!(
            "Translated {} gates onto {} external qubits ({} as unitaries)",
            ops.len(),
            map.len(),
            ops.iter().filter(|op| op.is_unitary()).count()
        );
        Ok(ops)
    }

    fn gate_out(&self, index: usize, gate: &Gate, map: &QubitMap) -> BridgeResult<ExternalOp> {
        let qubits = gate
            .qubits()
            .iter()
            .map(|q| {
                map.external(*q).ok_or_else(|| {
                    BridgeError::Ir(IrError::QubitNotFound {
                        qubit: *q,
                        gate_name: Some(gate.name().to_string()),
                    })
                })
            })
            .collect::<BridgeResult<Vec<usize>>>()?;

        match gate {
            Gate::Named(named) => match self.dictionary.lookup_native(&named.name) {
                Ok(entry) => Ok(ExternalOp::Named {
                    name: entry.external.clone(),
                    qubits: entry.map_qubits_out(&qubits)?,
                    params: entry.map_params_out(&named.params)?,
                }),
                Err(_) if self.config.unitary_fallback => self.fallback_out(index, named, &qubits),
                Err(err) => Err(err.at_index(index)),
            },
            Gate::Unitary(unitary) => UnitaryCodec::encode(&unitary.matrix, &qubits),
        }
    }

    /// Encode a library gate through its closed-form matrix.
    fn fallback_out(
        &self,
        index: usize,
        gate: &NamedGate,
        qubits: &[usize],
    ) -> BridgeResult<ExternalOp> {
        let kind = gate.kind().ok_or_else(|| BridgeError::UnsupportedGate {
            name: gate.name.clone(),
            index,
        })?;
        if kind.num_qubits() != qubits.len() {
            return Err(BridgeError::ArityMismatch {
                gate: gate.name.clone(),
                expected: kind.num_qubits(),
                got: qubits.len(),
            });
        }
        let matrix = kind.matrix(&gate.params)?;
        trace!("Gate {} ('{}') routed through its unitary", index, gate.name);
        UnitaryCodec::encode(&matrix, qubits)
    }

    // =========================================================================
    // External → native
    // =========================================================================

    /// Translate an external circuit into a native one.
    ///
    /// External qubit `i` becomes native label `i`.
    pub fn translate_in<E: ExternalCircuit + ?Sized>(&self, external: &E) -> BridgeResult<Circuit> {
        self.translate_in_with_map(external, &QubitMap::identity(external.num_qubits()))
    }

    /// Translate an external circuit, restoring native labels through `map`.
    #[instrument(skip_all, fields(ops = external.operations().len()))]
    pub fn translate_in_with_map<E: ExternalCircuit + ?Sized>(
        &self,
        external: &E,
        map: &QubitMap,
    ) -> BridgeResult<Circuit> {
        let gates = external
            .operations()
            .iter()
            .enumerate()
            .map(|(index, op)| self.gate_in(index, op, map))
            .collect::<BridgeResult<Vec<_>>>()?;

        debug!("Translated {} external operations", gates.len());
        Ok(Circuit::from_gates(INBOUND_CIRCUIT_NAME, gates)?)
    }

    fn gate_in(&self, index: usize, op: &ExternalOp, map: &QubitMap) -> BridgeResult<Gate> {
        let labels = |qubits: &[usize]| -> BridgeResult<Vec<QubitId>> {
            qubits
                .iter()
                .map(|&q| {
                    map.native(q).ok_or_else(|| {
                        BridgeError::Ir(IrError::QubitNotFound {
                            qubit: QubitId::from(q),
                            gate_name: Some(op.name().to_string()),
                        })
                    })
                })
                .collect()
        };

        match op {
            ExternalOp::Named {
                name,
                qubits,
                params,
            } => {
                let entry = self
                    .dictionary
                    .lookup_external(name)
                    .map_err(|e| e.at_index(index))?;
                let params = entry.map_params_in(params)?;
                let qubits = entry.map_qubits_in(qubits)?;
                Ok(NamedGate::new(entry.native.clone(), params, labels(&qubits)?).into())
            }
            ExternalOp::Unitary { .. } => {
                let (matrix, targets) = UnitaryCodec::decode(op)?;
                Ok(UnitaryGate::new(matrix, labels(&targets)?)?.into())
            }
            ExternalOp::Other { kind, .. } => Err(BridgeError::UnsupportedExternalGate {
                name: kind.clone(),
                index,
            }),
        }
    }
}

/// Hand staged operations to the target, in order.
fn commit<E: ExternalCircuit + ?Sized>(target: &mut E, ops: &[ExternalOp]) -> BridgeResult<()> {
    for (index, op) in ops.iter().enumerate() {
        target
            .append_op(op)
            .map_err(|_| BridgeError::UnsupportedExternalGate {
                name: op.name().to_string(),
                index,
            })?;
    }
    Ok(())
}

impl Default for CircuitTranslator {
    fn default() -> Self {
        Self::standard()
    }
}
