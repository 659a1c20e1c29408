use ising_prec::Scalar;

use crate::skew::SkewMatrix;
use crate::StrError;

/// Swaps rows (and, by symmetry, columns) `i+1` and `i+1+j` in the
/// triangular store, **assuming row `i` has already been used to zero its
/// partners** (spec.md §4.4a, `pivotrows`).
///
/// `i` is the even row currently being eliminated; `j` is the column
/// offset the semi-pivot search chose within row `i`. `j` is always `>=
/// 1` here: the caller only invokes this when the argmax search found a
/// nonzero offset.
///
/// # Note
///
/// This is distinct from [swap_rows_full], which the wrap operator uses
/// and which makes no such assumption (spec.md §9, Open Question: "the
/// source's pivot-swap helper is written assuming previously-cleared rows
/// ahead of the pivot... Implementations must not conflate them").
fn pivot_swap(mtx: &mut SkewMatrix, i: usize, j: usize) {
    // i) swap mat[i][0] and mat[i][j]
    let tmp = mtx.raw_get(i, 0);
    mtx.raw_set(i, 0, mtx.raw_get(i, j));
    mtx.raw_set(i, j, tmp);

    // ii) swap the start of row i+1 with the column running down from
    // [i+2][j-2], [i+3][j-3], ..., negating both sides
    for k in 0..(j - 1) {
        let a = -&mtx.raw_get(i + 1, k);
        let b = -&mtx.raw_get(i + 2 + k, j - k - 2);
        mtx.raw_set(i + 1, k, b);
        mtx.raw_set(i + 2 + k, j - k - 2, a);
    }

    // iii) negate the intersecting element
    let negated = -&mtx.raw_get(i + 1, j - 1);
    mtx.raw_set(i + 1, j - 1, negated);

    // iv) swap the tail of row i+1 with row i+1+j
    let side = mtx.side();
    let mut k = 0;
    while j + k < side - i - 2 {
        let a = mtx.raw_get(i + 1, j + k);
        let b = mtx.raw_get(i + j + 1, k);
        mtx.raw_set(i + 1, j + k, b);
        mtx.raw_set(i + j + 1, k, a);
        k += 1;
    }
}

/// General-purpose row swap used by the wrap operator, which does **not**
/// assume zeros in earlier rows (spec.md §4.4b, `swaprows`). `i` and `j`
/// are true row indices, not offsets.
pub(crate) fn swap_rows_full(mtx: &mut SkewMatrix, i: usize, j: usize) {
    let (i, j) = if j < i { (j, i) } else { (i, j) };
    let v = mtx.raw_get(i, j - i - 1);
    mtx.raw_set(i, j - i - 1, -&v);

    let side = mtx.side();
    for k in 0..side {
        if k == i || k == j {
            continue;
        }
        let (row_a, off_a, mut flag) = if k < i {
            (k, i - k - 1, 1i32)
        } else {
            (i, k - i - 1, -1i32)
        };
        let (row_b, off_b) = if k < j {
            (k, j - k - 1)
        } else {
            flag = -flag;
            (j, k - j - 1)
        };
        let a = mtx.raw_get(row_a, off_a);
        let b = mtx.raw_get(row_b, off_b);
        let (signed_a, signed_b) = if flag < 0 {
            (-&a, -&b)
        } else {
            (a, b)
        };
        mtx.raw_set(row_a, off_a, signed_b);
        mtx.raw_set(row_b, off_b, signed_a);
    }
}

/// The rank-1 skew-congruence update that zeros `mat[i][j]` using the
/// pivot `mat[i][0]` (spec.md §4.4c, `crossOp`). Presumes
/// `mat[i][0] != 0` and `mat[i][j] != 0`.
fn cross_op(mtx: &mut SkewMatrix, i: usize, j: usize) {
    let ratio = &mtx.raw_get(i, j) / &mtx.raw_get(i, 0);
    let scale = -ratio;
    mtx.raw_set(i, j, Scalar::zero());

    for k in 0..(j - 1) {
        let v = mtx.raw_get(i + 1, k);
        if !v.is_zero() {
            let cur = mtx.raw_get(i + 2 + k, j - k - 2);
            mtx.raw_set(i + 2 + k, j - k - 2, &cur - &(&scale * &v));
        }
    }

    let side = mtx.side();
    let mut k = 0;
    while j + k < side - i - 2 {
        let v = mtx.raw_get(i + 1, j + k);
        if !v.is_zero() {
            let cur = mtx.raw_get(i + j + 1, k);
            mtx.raw_set(i + j + 1, k, &cur + &(&scale * &v));
        }
        k += 1;
    }
}

/// Eliminates the first `2 * num_even_rows` rows/columns of `mtx` to
/// block-zero using a semi-pivoted skew-congruence sweep, returning the
/// signed product of the surviving super-diagonals (spec.md §4.4,
/// `Pf_eliminate`).
///
/// If the elimination does not consume the whole matrix, the eliminated
/// prefix is dropped from `mtx` before returning, so that
/// `Pfaffian(before) == result * Pfaffian(mtx after this call)`.
///
/// # Errors
///
/// Returns `Err` ("zero superdiagonal error") if, after semi-pivoting,
/// the pivot entry is exactly zero — a numerical singularity that cannot
/// occur for a well-formed Kasteleyn city with nonzero bond weights
/// (spec.md §7).
pub fn eliminate_prefix(mtx: &mut SkewMatrix, num_even_rows: usize) -> Result<Scalar, StrError> {
    let mut pivot_factor = Scalar::one();
    let mut i = 0usize;
    while i < num_even_rows * 2 {
        // Semi-pivot selection: the scan is restricted to the prefix of
        // rows still being eliminated (2*num_even_rows), not to the full
        // trailing width of row i — otherwise a pivot swap could disturb
        // the boundary rows meant to survive this call untouched. This is
        // the literal `numEvenRows*2-i-1` bound from the original source,
        // preserved per spec.md §9's Design Notes.
        let mut max_mag = Scalar::zero();
        let mut pivot_off = 0usize;
        let scan_len = num_even_rows * 2 - i - 1;
        for j in 0..scan_len {
            let v = mtx.raw_get(i, j);
            if v > max_mag {
                max_mag = v.clone();
                pivot_off = j;
            } else {
                let neg_v = -&v;
                if neg_v > max_mag {
                    max_mag = neg_v;
                    pivot_off = j;
                }
            }
        }

        if pivot_off != 0 {
            pivot_factor = -&pivot_factor;
            pivot_swap(mtx, i, pivot_off);
        }

        if mtx.raw_get(i, 0).is_zero() {
            return Err("zero superdiagonal error");
        }

        let side = mtx.side();
        for j in 1..(side - i - 1) {
            if !mtx.raw_get(i, j).is_zero() {
                cross_op(mtx, i, j);
            }
        }

        i += 2;
    }

    let mut super_diag_prod = Scalar::one();
    let mut i = 0usize;
    while i < num_even_rows * 2 {
        super_diag_prod = &super_diag_prod * &mtx.raw_get(i, 0);
        i += 2;
    }

    if 2 * num_even_rows < mtx.side() {
        mtx.drop_prefix(2 * num_even_rows);
    }

    Ok(&pivot_factor * &super_diag_prod)
}
