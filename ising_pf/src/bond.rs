use ising_prec::Scalar;

/// One of the four oriented half-edges of a plaquette.
///
/// # Note
///
/// Spin layout (spec.md §6):
///
/// ```text
///        N
///    W       E
///        S
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    N,
    E,
    S,
    W,
}

/// The bond-weight provider contract ("Sample"), spec.md §6.
///
/// `ising_pf` is generic over this trait rather than over any concrete
/// implementation, so the core assembler/eliminator/driver never perform
/// file I/O (spec.md §1, "the core has no I/O").
pub trait BondProvider {
    /// Returns the signed bond weight for the half-edge `dir` of the
    /// plaquette at `(px, py)`, with periodic wraparound of `px+1`/`py+1`
    /// modulo `lx()`/`ly()` (spec.md §6).
    fn bond(&self, px: i64, py: i64, dir: Dir) -> Scalar;

    /// Width of the full lattice this provider describes.
    fn lx(&self) -> usize;

    /// Height of the full lattice this provider describes.
    fn ly(&self) -> usize;

    /// The overall prefactor `p` = product of `exp(J_ij/T)` over all
    /// bonds (spec.md §4.7).
    fn prefactor(&self) -> Scalar;
}
