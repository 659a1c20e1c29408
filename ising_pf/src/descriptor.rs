use ising_prec::Scalar;

use crate::base_cell::kasteleyn_base_cell;
use crate::bond::{BondProvider, Dir};
use crate::eliminate::{eliminate_prefix, swap_rows_full};
use crate::skew::SkewMatrix;
use crate::StrError;

/// A rectangular sublattice descriptor (spec.md §3,
/// "Sublattice descriptor (FINDmatrix-equivalent)"): the tuple `(Lx, Ly,
/// offx, offy, mtx_L, mat, prefactor)`.
///
/// `mtx_L` is not stored separately; it is always `mat.side()`.
/// `prefactor` accumulates the products of super-diagonal scalars and
/// pivot signs collected during partial elimination, so that
/// `prefactor * Pfaffian(mat)` is invariant under elimination steps.
#[derive(Clone, Debug)]
pub struct Lattice {
    lx: usize,
    ly: usize,
    offx: usize,
    offy: usize,
    mat: SkewMatrix,
    prefactor: Scalar,
}

impl Lattice {
    /// Width of the region this descriptor represents.
    pub fn lx(&self) -> usize {
        self.lx
    }

    /// Height of the region this descriptor represents.
    pub fn ly(&self) -> usize {
        self.ly
    }

    /// Current side of the stored skew matrix.
    pub fn mtx_len(&self) -> usize {
        self.mat.side()
    }

    /// Recursively assembles the descriptor for an `lx`x`ly` rectangular
    /// region at `(offx, offy)` (spec.md §4.3).
    ///
    /// Splits along the longer axis; ties (`lx == ly`) break toward a
    /// horizontal split, matching the `else` branch of the original's
    /// `if (Lx > Ly)` test (spec.md §4.3, "Tie-break rule"; §8, property
    /// 5).
    pub fn assemble<B: BondProvider>(
        lx: usize,
        ly: usize,
        offx: usize,
        offy: usize,
        bonds: &B,
    ) -> Result<Self, StrError> {
        if lx == 1 && ly == 1 {
            return Ok(Lattice {
                lx,
                ly,
                offx,
                offy,
                mat: kasteleyn_base_cell(),
                prefactor: Scalar::one(),
            });
        }
        if lx > ly {
            let lx_a = lx / 2;
            let lx_b = lx - lx_a;
            let a = Lattice::assemble(lx_a, ly, offx, offy, bonds)?;
            let b = Lattice::assemble(lx_b, ly, offx + lx_a, offy, bonds)?;
            combine_vertical(lx, ly, offx, offy, a, b, bonds)
        } else {
            let ly_a = ly / 2;
            let ly_b = ly - ly_a;
            let a = Lattice::assemble(lx, ly_a, offx, offy, bonds)?;
            let b = Lattice::assemble(lx, ly_b, offx, offy + ly_a, bonds)?;
            combine_horizontal(lx, ly, offx, offy, a, b, bonds)
        }
    }

    /// Fully eliminates the remaining matrix and returns the Pfaffian of
    /// this descriptor times its accumulated prefactor (spec.md §4.3,
    /// `Z()`). Consumes the descriptor's matrix destructively; clone
    /// first if the descriptor is needed again.
    pub fn z(&mut self) -> Result<Scalar, StrError> {
        let half = self.mat.side() / 2;
        let elim = eliminate_prefix(&mut self.mat, half)?;
        Ok(&self.prefactor * &elim)
    }

    /// Closes the horizontal axis with sign `sigma` (+1 periodic, -1
    /// antiperiodic), reordering the boundary rows so the `Lx` pairs of
    /// wrap variables are consecutive at the start, then eliminating them
    /// (spec.md §4.5, `wrapHorz`).
    pub fn wrap_horz<B: BondProvider>(&mut self, sigma: i32, bonds: &B) -> Result<(), StrError> {
        for i in 0..self.lx {
            let col = 2 * self.lx + self.ly - i - 1;
            let bond_val = bonds.bond((self.offx + i) as i64, self.offy as i64, Dir::N);
            let signed = if sigma < 0 { -bond_val } else { bond_val };
            let cur = self.mat.get(i, col);
            self.mat.set(i, col, &cur + &signed);
        }

        // Reverse the right group, the top group, then the combined
        // right-through-top block: this maps boundary order (bottom,
        // right, top, left) into (bottom, reversed-right, reversed-top,
        // left) and rotates so glued half-edges become adjacent pairs at
        // the front (spec.md §4.5, step 2).
        let mut xchg = Scalar::one();
        for i in 0..(self.ly / 2) {
            swap_rows_full(&mut self.mat, self.lx + i, self.lx + self.ly - 1 - i);
            xchg = -xchg;
        }
        for i in 0..(self.lx / 2) {
            swap_rows_full(
                &mut self.mat,
                self.lx + self.ly + i,
                self.lx + self.ly + self.lx - 1 - i,
            );
            xchg = -xchg;
        }
        for i in 0..((self.lx + self.ly) / 2) {
            swap_rows_full(&mut self.mat, self.lx + i, self.lx + self.ly + self.lx - 1 - i);
            xchg = -xchg;
        }

        let elim = eliminate_prefix(&mut self.mat, self.lx)?;
        self.prefactor = &(&self.prefactor * &elim) * &xchg;
        Ok(())
    }

    /// Closes the vertical axis with sign `sigma`, presuming
    /// [Lattice::wrap_horz] has already run (spec.md §4.6, `Zvert`).
    pub fn z_vert<B: BondProvider>(&mut self, sigma: i32, bonds: &B) -> Result<Scalar, StrError> {
        for i in 0..self.ly {
            let col = 2 * self.ly - i - 1;
            let bond_val = bonds.bond(self.offx as i64, (self.offy + i) as i64, Dir::W);
            // mat[i][col] -= sigma * bond_val
            let signed = if sigma < 0 { bond_val } else { -bond_val };
            let cur = self.mat.get(i, col);
            self.mat.set(i, col, &cur + &signed);
        }
        let elim = eliminate_prefix(&mut self.mat, self.ly)?;
        Ok(&self.prefactor * &elim)
    }
}

fn fill_into(parent: &mut SkewMatrix, child: &SkewMatrix, ordering: &[usize]) {
    let n = child.side();
    for i in 0..n {
        let new_i = ordering[i];
        for j in (i + 1)..n {
            let new_j = ordering[j];
            let v = child.get(i, j);
            if new_i > new_j {
                parent.set(new_j, new_i, -&v);
            } else {
                parent.set(new_i, new_j, v);
            }
        }
    }
}

/// Interleaves two children split along the X axis (vertical separator:
/// `a` is the left sublattice, `b` the right) and eliminates the shared
/// `Ly` boundary pairs (spec.md §4.3, `combine_vertical`).
fn combine_vertical<B: BondProvider>(
    lx: usize,
    ly: usize,
    offx: usize,
    offy: usize,
    a: Lattice,
    b: Lattice,
    bonds: &B,
) -> Result<Lattice, StrError> {
    let mtx_len = a.mat.side() + b.mat.side();
    let mut mat = SkewMatrix::new(mtx_len);

    let mut a_order = vec![0usize; a.mat.side()];
    let mut b_order = vec![0usize; b.mat.side()];
    let mut counter = 0usize;

    for i in 0..ly {
        b_order[2 * b.lx + 2 * ly - 1 - i] = counter;
        counter += 1;
        a_order[a.lx + i] = counter;
        counter += 1;
        let w = bonds.bond(b.offx as i64, (offy + i) as i64, Dir::W);
        mat.set(counter - 2, counter - 1, -w);
    }
    for i in 0..a.lx {
        a_order[i] = counter;
        counter += 1;
    }
    for i in 0..(2 * b.lx + ly) {
        b_order[i] = counter;
        counter += 1;
    }
    for i in 0..(a.lx + ly) {
        a_order[a.lx + ly + i] = counter;
        counter += 1;
    }

    fill_into(&mut mat, &a.mat, &a_order);
    fill_into(&mut mat, &b.mat, &b_order);

    let combined_prefactor = &a.prefactor * &b.prefactor;
    let elim = eliminate_prefix(&mut mat, ly)?;
    let prefactor = &combined_prefactor * &elim;

    Ok(Lattice { lx, ly, offx, offy, mat, prefactor })
}

/// Interleaves two children split along the Y axis (horizontal
/// separator: `a` is the top sublattice, `b` the bottom) and eliminates
/// the shared `Lx` boundary pairs (spec.md §4.3, `combine_horizontal`).
fn combine_horizontal<B: BondProvider>(
    lx: usize,
    ly: usize,
    offx: usize,
    offy: usize,
    a: Lattice,
    b: Lattice,
    bonds: &B,
) -> Result<Lattice, StrError> {
    let mtx_len = a.mat.side() + b.mat.side();
    let mut mat = SkewMatrix::new(mtx_len);

    let mut a_order = vec![0usize; a.mat.side()];
    let mut b_order = vec![0usize; b.mat.side()];
    let mut counter = 0usize;

    for i in 0..lx {
        a_order[lx + a.ly + i] = counter;
        counter += 1;
        b_order[lx - 1 - i] = counter;
        counter += 1;
        let w = bonds.bond((offx + lx - 1 - i) as i64, b.offy as i64, Dir::N);
        mat.set(counter - 2, counter - 1, w);
    }
    for i in 0..(lx + a.ly) {
        a_order[i] = counter;
        counter += 1;
    }
    for i in 0..(lx + 2 * b.ly) {
        b_order[lx + i] = counter;
        counter += 1;
    }
    for i in 0..a.ly {
        a_order[2 * lx + a.ly + i] = counter;
        counter += 1;
    }

    fill_into(&mut mat, &a.mat, &a_order);
    fill_into(&mut mat, &b.mat, &b_order);

    let combined_prefactor = &a.prefactor * &b.prefactor;
    let elim = eliminate_prefix(&mut mat, lx)?;
    let prefactor = &combined_prefactor * &elim;

    Ok(Lattice { lx, ly, offx, offy, mat, prefactor })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ising_prec::set_precision;
    use std::cell::RefCell;

    /// A uniform Sample where every bond weight is `1`, matching the
    /// all-J=0 / T->infinity scenario (spec.md §8, S1).
    struct AllOnes {
        lx: usize,
        ly: usize,
    }

    impl BondProvider for AllOnes {
        fn bond(&self, _px: i64, _py: i64, _dir: Dir) -> Scalar {
            Scalar::one()
        }
        fn lx(&self) -> usize {
            self.lx
        }
        fn ly(&self) -> usize {
            self.ly
        }
        fn prefactor(&self) -> Scalar {
            Scalar::one()
        }
    }

    #[test]
    fn single_plaquette_assembles_to_base_cell() {
        set_precision(64);
        let s = AllOnes { lx: 1, ly: 1 };
        let mut d = Lattice::assemble(1, 1, 0, 0, &s).unwrap();
        assert_eq!(d.mtx_len(), 4);
        let z = d.z().unwrap();
        assert_eq!(z, Scalar::one());
    }

    /// A bond provider that records every `(px, py, dir)` query it
    /// receives, used to observe which split axis the assembler actually
    /// took rather than merely that assembly succeeded.
    struct RecordingProvider {
        lx: usize,
        ly: usize,
        calls: RefCell<Vec<(i64, i64, Dir)>>,
    }

    impl BondProvider for RecordingProvider {
        fn bond(&self, px: i64, py: i64, dir: Dir) -> Scalar {
            self.calls.borrow_mut().push((px, py, dir));
            Scalar::one()
        }
        fn lx(&self) -> usize {
            self.lx
        }
        fn ly(&self) -> usize {
            self.ly
        }
        fn prefactor(&self) -> Scalar {
            Scalar::one()
        }
    }

    #[test]
    fn split_tie_break_is_horizontal() {
        // lx == ly: the top-level split must take the Y-axis (horizontal
        // separator) branch, which merges its two children via
        // combine_horizontal — recognizable because combine_horizontal
        // alone queries Dir::N (combine_vertical queries Dir::W). Since
        // assemble() builds both children fully before running the
        // top-level combine, the top-level merge's queries are the last
        // ones recorded (spec.md §4.3, "Tie-break rule"; §8, property 5).
        set_precision(64);
        let s = RecordingProvider {
            lx: 2,
            ly: 2,
            calls: RefCell::new(Vec::new()),
        };
        let mut d = Lattice::assemble(2, 2, 0, 0, &s).unwrap();
        assert_eq!(d.mtx_len(), 2 * (2 + 2));
        assert!(d.z().is_ok());

        let calls = s.calls.borrow();
        let last = calls.last().expect("assembly must query at least one bond");
        assert_eq!(
            last.2,
            Dir::N,
            "lx == ly must merge via combine_horizontal (Dir::N), not combine_vertical (Dir::W)"
        );
    }

    #[test]
    fn boundary_matrix_has_expected_side() {
        set_precision(64);
        let s = AllOnes { lx: 3, ly: 2 };
        let d = Lattice::assemble(3, 2, 0, 0, &s).unwrap();
        assert_eq!(d.mtx_len(), 2 * (3 + 2));
    }
}
