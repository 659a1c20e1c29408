//! Russell - Rust Scientific Library (isingZ lineage)
//!
//! `ising_pf`: the Pfaffian assembly and elimination engine for the
//! 2D rectangular Ising partition function, independent of any file
//! format (spec.md §1, §3, §4). Callers supply a [BondProvider] and
//! receive back either a single Pfaffian ([descriptor::Lattice::z]) or
//! the full four-boundary-condition partition function
//! ([boundary::compute_boundary_z]).

pub type StrError = &'static str;

mod base_cell;
mod bond;
mod descriptor;
mod eliminate;
mod skew;

pub mod boundary;

pub use bond::{BondProvider, Dir};
pub use descriptor::Lattice;
pub use eliminate::eliminate_prefix;
pub use skew::SkewMatrix;
