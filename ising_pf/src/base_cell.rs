use ising_prec::Scalar;

use crate::skew::SkewMatrix;

/// Builds the canonical 4x4 Kasteleyn city for a single plaquette
/// (spec.md §4.2): every strict-upper-triangle entry is `1`, with row
/// order `(N, E, S, W)`.
///
/// # Note
///
/// ```text
///    0  1  1  1
///   -1  0  1  1
///   -1 -1  0  1
///   -1 -1 -1  0
/// ```
///
/// This orientation realizes a Kasteleyn orientation for a single
/// plaquette: every clockwise traversal of an even cycle in the 4-clique
/// crosses an odd number of reversed edges.
pub fn kasteleyn_base_cell() -> SkewMatrix {
    let mut m = SkewMatrix::new(4);
    for i in 0..4 {
        for j in (i + 1)..4 {
            m.set(i, j, Scalar::one());
        }
    }
    m
}
