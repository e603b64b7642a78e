//! Host-side input generation and CPU reference for result verification.

use serde::{Deserialize, Serialize};

/// Vector length used by the benchmark (`1024 * 1024`).
pub const LIST_SIZE: usize = 1024 * 1024;

/// The two input vectors of the benchmark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorPair {
    pub a: Vec<i32>,
    pub b: Vec<i32>,
}

impl VectorPair {
    /// Deterministic inputs `A[i] = i`, `B[i] = len - i`.
    ///
    /// Every element of `A + B` equals `len`. Values wrap if `len` exceeds
    /// `i32::MAX`, matching the 32-bit `int` the kernel operates on.
    pub fn sequential(len: usize) -> Self {
        let a = (0..len).map(|i| i as i32).collect();
        let b = (0..len).map(|i| (len - i) as i32).collect();
        Self { a, b }
    }

    pub fn len(&self) -> usize {
        self.a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }
}

/// Element-wise `a + b` with the wrapping semantics of OpenCL `int`.
///
/// # Panics
///
/// Panics if the slices differ in length.
pub fn cpu_vector_add(a: &[i32], b: &[i32]) -> Vec<i32> {
    assert_eq!(a.len(), b.len(), "input vectors must have equal length");
    a.iter().zip(b).map(|(&x, &y)| x.wrapping_add(y)).collect()
}

/// First element where the device result disagrees with the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    pub index: usize,
    pub expected: i32,
    pub actual: i32,
}

/// Outcome of comparing a device result against [`cpu_vector_add`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    pub checked: usize,
    pub mismatches: usize,
    pub first_mismatch: Option<Mismatch>,
}

impl Verification {
    pub fn passed(&self) -> bool {
        self.mismatches == 0
    }
}

/// Check `c[i] == a[i] + b[i]` for every index.
///
/// A length mismatch between `c` and the inputs counts every missing or
/// surplus element as a mismatch.
pub fn verify(a: &[i32], b: &[i32], c: &[i32]) -> Verification {
    let n = a.len().min(b.len());
    let mut mismatches = 0;
    let mut first_mismatch = None;

    for (index, ((&x, &y), &actual)) in a.iter().zip(b).zip(c).enumerate() {
        let expected = x.wrapping_add(y);
        if actual != expected {
            mismatches += 1;
            first_mismatch.get_or_insert(Mismatch { index, expected, actual });
        }
    }
    mismatches += n.abs_diff(c.len());

    Verification { checked: n.min(c.len()), mismatches, first_mismatch }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_inputs_follow_formula() {
        let v = VectorPair::sequential(8);
        assert_eq!(v.a, vec![0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(v.b, vec![8, 7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(v.len(), 8);
    }

    #[test]
    fn sequential_sum_is_constant_at_reference_length() {
        let v = VectorPair::sequential(LIST_SIZE);
        let c = cpu_vector_add(&v.a, &v.b);
        assert!(c.iter().all(|&x| x == LIST_SIZE as i32));
    }

    #[test]
    fn empty_pair() {
        let v = VectorPair::sequential(0);
        assert!(v.is_empty());
        assert!(cpu_vector_add(&v.a, &v.b).is_empty());
    }

    #[test]
    fn add_wraps_like_opencl_int() {
        assert_eq!(cpu_vector_add(&[i32::MAX], &[1]), vec![i32::MIN]);
    }

    #[test]
    #[should_panic(expected = "equal length")]
    fn add_rejects_unequal_lengths() {
        let _ = cpu_vector_add(&[1, 2], &[1]);
    }

    #[test]
    fn verify_passes_on_correct_result() {
        let v = VectorPair::sequential(16);
        let c = vec![16; 16];
        let report = verify(&v.a, &v.b, &c);
        assert!(report.passed());
        assert_eq!(report.checked, 16);
        assert_eq!(report.first_mismatch, None);
    }

    #[test]
    fn verify_reports_first_mismatch() {
        let v = VectorPair::sequential(4);
        let c = vec![4, 0, 4, 9];
        let report = verify(&v.a, &v.b, &c);
        assert_eq!(report.mismatches, 2);
        assert_eq!(report.first_mismatch, Some(Mismatch { index: 1, expected: 4, actual: 0 }));
    }

    #[test]
    fn verify_counts_short_output() {
        let v = VectorPair::sequential(4);
        let report = verify(&v.a, &v.b, &[4, 4]);
        assert_eq!(report.checked, 2);
        assert_eq!(report.mismatches, 2);
        assert!(!report.passed());
    }
}
