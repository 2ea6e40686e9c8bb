//! Dense unitary encode/decode between native and external layouts.
//!
//! Native matrices are big-endian over their qubits; the external generic
//! unitary is a row-major flat list, little-endian over its targets. The
//! target list itself keeps the native order, so only the matrix entries are
//! permuted. No arithmetic is performed on the entries.

use ndarray::Array2;
use num_complex::Complex64;

use qbridge_hal::ExternalOp;
use qbridge_ir::matrix_dim;

use crate::error::{BridgeError, BridgeResult};
use crate::ordering::{matrix_to_external, matrix_to_native};

/// Default tolerance for [`UnitaryCodec::check_unitary`].
pub const DEFAULT_UNITARY_TOLERANCE: f64 = 1e-7;

/// Converts dense matrices to and from the external generic-unitary format.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitaryCodec;

impl UnitaryCodec {
    /// Encode a native big-endian matrix over `targets`.
    ///
    /// Unitarity is not checked.
    pub fn encode(matrix: &Array2<Complex64>, targets: &[usize]) -> BridgeResult<ExternalOp> {
        let dim = matrix_dim(targets.len());
        if dim.is_none_or(|dim| matrix.nrows() != dim || matrix.ncols() != dim) {
            return Err(BridgeError::InvalidDimension {
                qubits: targets.len(),
                expected: expected_entries(dim),
                got: matrix.len(),
            });
        }

        let external = matrix_to_external(matrix);
        Ok(ExternalOp::Unitary {
            targets: targets.to_vec(),
            matrix: external.iter().copied().collect(),
        })
    }

    /// Decode an external generic unitary into a native matrix and its targets.
    pub fn decode(op: &ExternalOp) -> BridgeResult<(Array2<Complex64>, Vec<usize>)> {
        let ExternalOp::Unitary { targets, matrix } = op else {
            return Err(BridgeError::UnsupportedExternalGate {
                name: op.name().to_string(),
                index: 0,
            });
        };

        let invalid = || BridgeError::InvalidDimension {
            qubits: targets.len(),
            expected: expected_entries(matrix_dim(targets.len())),
            got: matrix.len(),
        };
        let dim = matrix_dim(targets.len()).ok_or_else(invalid)?;
        if matrix.len() != dim * dim {
            return Err(invalid());
        }

        let external = Array2::from_shape_vec((dim, dim), matrix.clone()).map_err(|_| invalid())?;
        Ok((matrix_to_native(&external), targets.clone()))
    }

    /// Check `U†U = I` within `tolerance`.
    pub fn check_unitary(matrix: &Array2<Complex64>, tolerance: f64) -> bool {
        qbridge_ir::is_unitary(matrix, tolerance)
    }
}

/// Entry count for a side length, saturating when it is not addressable.
fn expected_entries(dim: Option<usize>) -> usize {
    dim.map_or(usize::MAX, |dim| dim * dim)
}
