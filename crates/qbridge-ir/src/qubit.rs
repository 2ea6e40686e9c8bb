//! Qubit labels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label of a qubit within a native circuit.
///
/// Labels are non-negative and need not be contiguous; a circuit's width is
/// one plus the largest label it references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl QubitId {
    /// The label as a `usize` index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

impl From<usize> for QubitId {
    fn from(id: usize) -> Self {
        QubitId(u32::try_from(id).expect("QubitId overflow: exceeds u32::MAX"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_display() {
        assert_eq!(format!("{}", QubitId(0)), "q0");
        assert_eq!(format!("{}", QubitId(17)), "q17");
    }

    #[test]
    fn test_qubit_ordering() {
        let mut labels = vec![QubitId(5), QubitId(2), QubitId(9)];
        labels.sort();
        assert_eq!(labels, vec![QubitId(2), QubitId(5), QubitId(9)]);
        assert_eq!(QubitId::from(3usize).index(), 3);
    }
}
