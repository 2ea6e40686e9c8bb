//! Qubit-ordering conventions and the pure functions converting between them.
//!
//! # Conventions
//!
//! | Side | Gate matrices | State amplitudes |
//! |------|---------------|------------------|
//! | native | big-endian: first qubit is the MSB | ascending labels, first label is the MSB |
//! | external | little-endian: `targets[0]` is the LSB | per the backend's [`BitOrder`] |
//!
//! External qubits are contiguous indices `0..N`; the [`QubitMap`] relates
//! them to native labels.

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use rustc_hash::FxHashMap;

use qbridge_hal::BitOrder;
use qbridge_ir::{Circuit, QubitId};

/// Reverse the lowest `num_bits` bits of `index`.
#[inline]
pub fn reverse_bits(index: usize, num_bits: usize) -> usize {
    if num_bits == 0 {
        return 0;
    }
    index.reverse_bits() >> (usize::BITS as usize - num_bits)
}

/// Relabel the qubits of a big-endian matrix.
///
/// Qubit `i` of the result is qubit `perm[i]` of `matrix`, so
/// `result[r, c] = matrix[σ(r), σ(c)]` where `σ` moves bit `i` of `r`
/// to the position of qubit `perm[i]`. Entries are moved, never combined.
pub fn permute_matrix_qubits(matrix: &Array2<Complex64>, perm: &[usize]) -> Array2<Complex64> {
    let k = perm.len();
    let dim = 1usize << k;
    let source: Vec<usize> = (0..dim)
        .map(|r| {
            perm.iter().enumerate().fold(0usize, |acc, (i, &p)| {
                let bit = (r >> (k - 1 - i)) & 1;
                acc | (bit << (k - 1 - p))
            })
        })
        .collect();
    Array2::from_shape_fn((dim, dim), |(r, c)| matrix[[source[r], source[c]]])
}

/// Native big-endian matrix to external little-endian over the same targets.
pub fn matrix_to_external(matrix: &Array2<Complex64>) -> Array2<Complex64> {
    let k = matrix.nrows().trailing_zeros() as usize;
    Array2::from_shape_fn(matrix.dim(), |(r, c)| {
        matrix[[reverse_bits(r, k), reverse_bits(c, k)]]
    })
}

/// External little-endian matrix to native big-endian over the same targets.
pub fn matrix_to_native(matrix: &Array2<Complex64>) -> Array2<Complex64> {
    // Bit reversal is an involution.
    matrix_to_external(matrix)
}

/// Reorder backend amplitudes into native big-endian layout.
///
/// `positions[j]` is the external qubit holding native position `j`
/// (position 0 is the most significant bit of the result). `amplitudes`
/// must have `2^positions.len()` entries laid out per `bit_order`.
pub fn reorder_amplitudes(
    amplitudes: &[Complex64],
    bit_order: BitOrder,
    positions: &[usize],
) -> Array1<Complex64> {
    let n = positions.len();
    let shifts: Vec<usize> = positions
        .iter()
        .map(|&q| bit_order.bit_position(q, n))
        .collect();
    Array1::from_shape_fn(1usize << n, |r| {
        let source = shifts.iter().enumerate().fold(0usize, |acc, (j, &s)| {
            acc | (((r >> (n - 1 - j)) & 1) << s)
        });
        amplitudes[source]
    })
}

/// Mapping between native qubit labels and external qubit indices.
///
/// Built by first-appearance renumbering: labels referenced by the circuit
/// get `0..k` in the order they are first used (walking gates in order and
/// each gate's qubits left to right); labels below the maximum that no gate
/// references get `k..N` in ascending order. `N` equals
/// [`Circuit::num_qubits`].
///
/// Only the `k` referenced labels are stored. Unreferenced labels are
/// resolved on demand, so building a map costs `O(k log k)` however sparse
/// the labels are; [`QubitMap::native`] on an unreferenced index is `O(k)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QubitMap {
    /// Referenced labels in external-index order.
    referenced: Vec<QubitId>,
    /// Referenced labels, ascending.
    ascending: Vec<QubitId>,
    /// Referenced label → external index.
    index: FxHashMap<QubitId, usize>,
    width: usize,
}

impl QubitMap {
    /// Build the map for a native circuit.
    pub fn for_circuit(circuit: &Circuit) -> Self {
        Self::new(circuit.referenced_qubits(), circuit.num_qubits())
    }

    /// Identity mapping over `0..num_qubits`.
    pub fn identity(num_qubits: usize) -> Self {
        Self::new(Vec::new(), num_qubits)
    }

    /// `referenced` must be distinct and below `width`.
    fn new(referenced: Vec<QubitId>, width: usize) -> Self {
        let index = referenced
            .iter()
            .enumerate()
            .map(|(i, q)| (*q, i))
            .collect();
        let mut ascending = referenced.clone();
        ascending.sort_unstable();
        Self {
            referenced,
            ascending,
            index,
            width,
        }
    }

    /// Number of mapped qubits.
    pub fn len(&self) -> usize {
        self.width
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.width == 0
    }

    /// External index of a native label.
    pub fn external(&self, label: QubitId) -> Option<usize> {
        if let Some(&i) = self.index.get(&label) {
            return Some(i);
        }
        if label.index() >= self.width {
            return None;
        }
        let referenced_below = self.ascending.partition_point(|q| *q < label);
        Some(self.referenced.len() + label.index() - referenced_below)
    }

    /// Native label of an external index.
    pub fn native(&self, index: usize) -> Option<QubitId> {
        if let Some(q) = self.referenced.get(index) {
            return Some(*q);
        }
        if index >= self.width {
            return None;
        }
        // Skip past every referenced label at or below the candidate.
        let mut label = index - self.referenced.len();
        for q in &self.ascending {
            if q.index() > label {
                break;
            }
            label += 1;
        }
        Some(QubitId::from(label))
    }

    /// Native labels in external-index order.
    pub fn labels(&self) -> impl Iterator<Item = QubitId> + '_ {
        (0..self.width).filter_map(|i| self.native(i))
    }

    /// Native labels in ascending order, with the external index of each.
    ///
    /// Materialises all `N` labels.
    pub fn sorted(&self) -> (Vec<QubitId>, Vec<usize>) {
        (0..self.width)
            .map(QubitId::from)
            .filter_map(|q| self.external(q).map(|i| (q, i)))
            .unzip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use qbridge_ir::CircuitBuilder;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn test_reverse_bits() {
        assert_eq!(reverse_bits(0b001, 3), 0b100);
        assert_eq!(reverse_bits(0b110, 3), 0b011);
        assert_eq!(reverse_bits(0b1, 1), 0b1);
        assert_eq!(reverse_bits(0, 0), 0);
    }

    #[test]
    fn test_matrix_to_external_swaps_cnot_roles() {
        // CNOT(control=first, target=second), big-endian
        let cnot = array![
            [c(1.0), c(0.0), c(0.0), c(0.0)],
            [c(0.0), c(1.0), c(0.0), c(0.0)],
            [c(0.0), c(0.0), c(0.0), c(1.0)],
            [c(0.0), c(0.0), c(1.0), c(0.0)],
        ];
        let external = matrix_to_external(&cnot);
        // Little-endian: the control (first target) is now bit 0
        assert_eq!(external[[1, 3]], c(1.0));
        assert_eq!(external[[3, 1]], c(1.0));
        assert_eq!(external[[2, 2]], c(1.0));
        assert_eq!(matrix_to_native(&external), cnot);
    }

    #[test]
    fn test_permute_matrix_qubits_reverse_is_bit_reversal() {
        let m = Array2::from_shape_fn((8, 8), |(r, col)| c((r * 8 + col) as f64));
        assert_eq!(permute_matrix_qubits(&m, &[2, 1, 0]), matrix_to_external(&m));
        assert_eq!(permute_matrix_qubits(&m, &[0, 1, 2]), m);
    }

    #[test]
    fn test_permute_matrix_qubits_rotation() {
        let m = Array2::from_shape_fn((8, 8), |(r, col)| c((r * 8 + col) as f64));
        let p = permute_matrix_qubits(&m, &[1, 2, 0]);
        // result qubits (a, b, c) = source qubits (1, 2, 0): r=0b100 sets
        // source qubit 1, i.e. source index 0b010
        assert_eq!(p[[0b100, 0]], m[[0b010, 0]]);
        assert_eq!(p[[0b001, 0]], m[[0b100, 0]]);
    }

    #[test]
    fn test_reorder_amplitudes_little_endian() {
        // Backend state |q0=1, q1=0⟩ is index 0b01 little-endian
        let mut amps = vec![c(0.0); 4];
        amps[0b01] = c(1.0);
        let native = reorder_amplitudes(&amps, BitOrder::LittleEndian, &[0, 1]);
        // Native: position 0 (q0) is the MSB
        assert_eq!(native[0b10], c(1.0));
    }

    #[test]
    fn test_reorder_amplitudes_with_permutation() {
        // native position 0 lives on external qubit 1
        let mut amps = vec![c(0.0); 4];
        amps[0b10] = c(1.0); // external qubit 1 set, little-endian
        let native = reorder_amplitudes(&amps, BitOrder::LittleEndian, &[1, 0]);
        assert_eq!(native[0b10], c(1.0));

        let same = reorder_amplitudes(&amps, BitOrder::BigEndian, &[0, 1]);
        assert_eq!(same[0b10], c(1.0));
    }

    #[test]
    fn test_qubit_map_first_appearance() {
        let mut builder = CircuitBuilder::new("sparse");
        builder.h(QubitId(3)).unwrap();
        builder.cnot(QubitId(3), QubitId(1)).unwrap();
        let circuit = builder.build();

        let map = QubitMap::for_circuit(&circuit);
        assert_eq!(map.len(), 4);
        assert_eq!(
            map.labels().collect::<Vec<_>>(),
            vec![QubitId(3), QubitId(1), QubitId(0), QubitId(2)]
        );
        assert_eq!(map.external(QubitId(3)), Some(0));
        assert_eq!(map.external(QubitId(2)), Some(3));
        assert_eq!(map.native(1), Some(QubitId(1)));
        assert_eq!(map.external(QubitId(9)), None);

        let (labels, positions) = map.sorted();
        assert_eq!(labels, vec![QubitId(0), QubitId(1), QubitId(2), QubitId(3)]);
        assert_eq!(positions, vec![2, 1, 3, 0]);
    }

    #[test]
    fn test_qubit_map_identity() {
        let map = QubitMap::identity(3);
        assert_eq!(map.external(QubitId(2)), Some(2));
        assert_eq!(map.native(1), Some(QubitId(1)));
        assert_eq!(map.native(3), None);
        assert!(QubitMap::identity(0).is_empty());
    }

    #[test]
    fn test_qubit_map_resolves_unreferenced_labels() {
        let mut builder = CircuitBuilder::new("gappy");
        builder.cnot(QubitId(10), QubitId(2)).unwrap();
        builder.h(QubitId(5)).unwrap();
        let map = QubitMap::for_circuit(&builder.build());

        // 10, 2, 5 first; then 0, 1, 3, 4, 6, 7, 8, 9
        assert_eq!(map.len(), 11);
        let labels: Vec<u32> = map.labels().map(|q| q.0).collect();
        assert_eq!(labels, vec![10, 2, 5, 0, 1, 3, 4, 6, 7, 8, 9]);
        for (i, label) in map.labels().enumerate() {
            assert_eq!(map.external(label), Some(i));
        }
        assert_eq!(map.native(11), None);
        assert_eq!(map.external(QubitId(11)), None);
    }

    #[test]
    fn test_qubit_map_cost_independent_of_label_value() {
        let mut builder = CircuitBuilder::new("far");
        builder.h(QubitId(u32::MAX)).unwrap();
        builder.cnot(QubitId(7), QubitId(u32::MAX)).unwrap();
        let map = QubitMap::for_circuit(&builder.build());

        assert_eq!(map.len(), u32::MAX as usize + 1);
        assert_eq!(map.external(QubitId(u32::MAX)), Some(0));
        assert_eq!(map.external(QubitId(7)), Some(1));
        assert_eq!(map.external(QubitId(0)), Some(2));
        assert_eq!(map.external(QubitId(8)), Some(9));
        assert_eq!(map.native(9), Some(QubitId(8)));
        assert_eq!(map.native(u32::MAX as usize), Some(QubitId(u32::MAX - 1)));
    }
}
