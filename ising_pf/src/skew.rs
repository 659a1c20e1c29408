use ising_prec::Scalar;

use crate::StrError;

/// Storage for the strict upper triangle of an `L`x`L` skew-symmetric
/// matrix, with sign-aware accessors.
///
/// # Note
///
/// Row `i` (`0 <= i < L-1`) stores entries `M[i][i+1], M[i][i+2], ...,
/// M[i][L-1]` at local offsets `0, 1, ..., L-2-i`. The diagonal is
/// implicitly zero and `M[j][i] = -M[i][j]` for `i < j` is never
/// materialized (spec.md §3, "Skew-symmetric matrix M of side L").
///
/// Only [SkewMatrix::get], [SkewMatrix::set], and [SkewMatrix::drop_prefix]
/// are meant for use outside this crate; the elimination routines in
/// `crate::eliminate` additionally reach into the raw per-row storage,
/// since the Pfaffian algorithm is stated directly in terms of the
/// triangular offsets rather than logical `(row, col)` pairs.
#[derive(Clone, Debug)]
pub struct SkewMatrix {
    side: usize,
    rows: Vec<Vec<Scalar>>,
}

impl SkewMatrix {
    /// Allocates the strict upper triangle of an `L`x`L` matrix filled
    /// with zero scalars.
    pub fn new(side: usize) -> Self {
        let rows = (0..side.saturating_sub(1))
            .map(|i| vec![Scalar::zero(); side - 1 - i])
            .collect();
        SkewMatrix { side, rows }
    }

    /// Returns the current side `L` of the matrix.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Returns `M[i][j]`, honoring the implicit skew mirror below the
    /// diagonal. Panics if `i == j` is queried as if it held meaning
    /// beyond the implicit zero (callers should not need to).
    pub fn get(&self, i: usize, j: usize) -> Scalar {
        use std::cmp::Ordering::*;
        match i.cmp(&j) {
            Equal => Scalar::zero(),
            Less => self.rows[i][j - i - 1].clone(),
            Greater => -&self.rows[j][i - j - 1],
        }
    }

    /// Writes `M[i][j] = v` for `i < j`; the mirror entry `M[j][i]` is
    /// implicit.
    pub fn set(&mut self, i: usize, j: usize, v: Scalar) {
        assert!(i < j, "SkewMatrix::set requires i < j");
        self.rows[i][j - i - 1] = v;
    }

    /// Removes the first `count` rows and columns, yielding a matrix of
    /// side `L - count` that retains the entries among rows/columns
    /// `>= count` (spec.md §4.1, `drop_prefix(2k)`).
    ///
    /// # Note
    ///
    /// Used after the eliminator clears a prefix; `count` is normally
    /// even but nothing here requires it, matching the store's tolerance
    /// for odd transient states (spec.md §3).
    pub fn drop_prefix(&mut self, count: usize) {
        assert!(count <= self.side, "cannot drop more rows than the matrix has");
        self.rows.drain(0..count.min(self.rows.len()));
        self.side -= count;
    }

    /// Builds a [SkewMatrix] from an externally supplied dense matrix,
    /// validating skew-symmetry.
    ///
    /// # Errors
    ///
    /// Returns `Err` ("non-skew-symmetric matrix provided") if the
    /// diagonal is nonzero or `M[i][j] != -M[j][i]` for some `i < j`
    /// (spec.md §7, "Malformed skew input"; grounded on the
    /// `FINDmatrix(int, dataType**)` constructor in `FINDmatrix.cc`).
    pub fn from_dense(values: &[Vec<Scalar>]) -> Result<Self, StrError> {
        let side = values.len();
        for row in values {
            if row.len() != side {
                return Err("non-skew-symmetric matrix provided, aborting");
            }
        }
        let mut m = SkewMatrix::new(side);
        for i in 0..side {
            if !values[i][i].is_zero() {
                return Err("non-skew-symmetric matrix provided, aborting");
            }
            for j in (i + 1)..side {
                let mirror = &values[j][i];
                let expect = -&values[i][j];
                if *mirror != expect {
                    return Err("non-skew-symmetric matrix provided, aborting");
                }
                m.set(i, j, values[i][j].clone());
            }
        }
        Ok(m)
    }

    /// Raw triangular-store read: `row`'s entry at local `offset` (i.e.
    /// `M[row][row+1+offset]`), bypassing the logical `get`. Only used by
    /// [crate::eliminate], which is written directly in terms of these
    /// offsets (spec.md §4.4).
    pub(crate) fn raw_get(&self, row: usize, offset: usize) -> Scalar {
        self.rows[row][offset].clone()
    }

    pub(crate) fn raw_set(&mut self, row: usize, offset: usize, v: Scalar) {
        self.rows[row][offset] = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ising_prec::set_precision;

    fn dense_from(m: &SkewMatrix) -> Vec<Vec<Scalar>> {
        let l = m.side();
        (0..l)
            .map(|i| (0..l).map(|j| m.get(i, j)).collect())
            .collect()
    }

    #[test]
    fn round_trip_preserves_skew_symmetry() {
        set_precision(64);
        for side in [2usize, 4, 6, 8] {
            let mut m = SkewMatrix::new(side);
            let mut counter = 1i64;
            for i in 0..side {
                for j in (i + 1)..side {
                    m.set(i, j, Scalar::from_i64(counter));
                    counter += 1;
                }
            }
            for i in 0..side {
                for j in 0..side {
                    assert_eq!(m.get(i, j), -&m.get(j, i));
                }
            }
        }
    }

    #[test]
    fn drop_prefix_keeps_trailing_block() {
        set_precision(64);
        let side = 6;
        let mut m = SkewMatrix::new(side);
        let mut counter = 1i64;
        for i in 0..side {
            for j in (i + 1)..side {
                m.set(i, j, Scalar::from_i64(counter));
                counter += 1;
            }
        }
        let before = dense_from(&m);
        m.drop_prefix(2);
        assert_eq!(m.side(), 4);
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(m.get(i, j), before[i + 2][j + 2]);
            }
        }
    }

    #[test]
    fn from_dense_rejects_nonzero_diagonal() {
        set_precision(64);
        let bad = vec![
            vec![Scalar::one(), Scalar::zero()],
            vec![Scalar::zero(), Scalar::zero()],
        ];
        assert!(SkewMatrix::from_dense(&bad).is_err());
    }

    #[test]
    fn from_dense_rejects_asymmetric_pairs() {
        set_precision(64);
        let bad = vec![
            vec![Scalar::zero(), Scalar::from_i64(2)],
            vec![Scalar::from_i64(2), Scalar::zero()],
        ];
        assert!(SkewMatrix::from_dense(&bad).is_err());
    }

    #[test]
    fn from_dense_accepts_valid_matrix() {
        set_precision(64);
        let good = vec![
            vec![Scalar::zero(), Scalar::from_i64(3)],
            vec![Scalar::from_i64(-3), Scalar::zero()],
        ];
        let m = SkewMatrix::from_dense(&good).unwrap();
        assert_eq!(m.get(0, 1), Scalar::from_i64(3));
    }
}
