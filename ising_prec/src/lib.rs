//! Russell - Rust Scientific Library (isingZ lineage)
//!
//! `ising_prec`: arbitrary-precision scalar used for every matrix entry,
//! bond weight, and partition function in this workspace.
//!
//! **Important:** this crate depends on an external library (GMP/MPFR via
//! `rug`). See the [rug] documentation for build requirements.
//!
//! All matrix entries and Pfaffian results are [Scalar] values: an opaque
//! wrapper around [rug::Float] with a precision configured once, at
//! startup, via [set_precision]. The algorithms in `ising_pf` never reach
//! into the wrapped float directly; they only use the operations
//! re-exported here.

use rug::Float;
use rug::ops::CompleteRound;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Defines a type alias for the error type as a static string.
pub type StrError = &'static str;

static PRECISION_BITS: AtomicU32 = AtomicU32::new(53);

/// Sets the working precision, in bits, for every [Scalar] subsequently
/// constructed.
///
/// # Note
///
/// Mirrors `mpf_set_default_prec` in the original isingZ program: called
/// once, at process startup, before any [Scalar] is built. Changing it
/// later does not retroactively alter existing values, only the fidelity
/// of new ones (spec.md §5, "Numerical precision").
pub fn set_precision(bits: u32) {
    PRECISION_BITS.store(bits.max(2), Ordering::SeqCst);
}

/// Returns the currently configured precision, in bits.
pub fn precision() -> u32 {
    PRECISION_BITS.load(Ordering::SeqCst)
}

/// An arbitrary-precision signed real scalar.
///
/// # Note
///
/// Exact skew arithmetic is only as exact as `+`, `-`, `*`, `/` allow;
/// division is the sole source of rounding, as in the original `mpf_class`
/// computation (spec.md §9, "Precision and scalar type").
#[derive(Clone, Debug)]
pub struct Scalar(Float);

impl Scalar {
    /// Returns the additive identity at the current precision.
    pub fn zero() -> Self {
        Scalar(Float::with_val(precision(), 0))
    }

    /// Returns the multiplicative identity at the current precision.
    pub fn one() -> Self {
        Scalar(Float::with_val(precision(), 1))
    }

    /// Builds a scalar from a signed integer.
    pub fn from_i64(v: i64) -> Self {
        Scalar(Float::with_val(precision(), v))
    }

    /// Builds a scalar from a machine float (used only for couplings read
    /// from a generator that does not itself carry arbitrary precision).
    pub fn from_f64(v: f64) -> Self {
        Scalar(Float::with_val(precision(), v))
    }

    /// Parses a scalar from a decimal string, as found in the `J` column
    /// of a coupling-lattice file (spec.md §6).
    pub fn parse(s: &str) -> Result<Self, StrError> {
        Float::parse(s.trim())
            .map(|incomplete| Scalar(Float::with_val(precision(), incomplete)))
            .map_err(|_| "could not parse scalar")
    }

    /// Returns true if this scalar is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns the absolute value.
    pub fn abs(&self) -> Self {
        Scalar(self.0.clone().abs())
    }

    /// Returns `e^self`.
    pub fn exp(&self) -> Self {
        Scalar(self.0.clone().exp())
    }

    /// Returns the natural logarithm of `self`.
    ///
    /// # Note
    ///
    /// Replaces the original program's hand-rolled `exp_log.h` (halve /
    /// exponentiate / resquare, AGM-based `find_log`); `rug::Float`
    /// already evaluates `exp`/`ln` to the working precision, so the
    /// custom machinery in the original is not ported (see DESIGN.md).
    pub fn ln(&self) -> Self {
        Scalar(self.0.clone().ln())
    }

    /// Formats the scalar in scientific notation with `digits` significant
    /// decimal digits, matching the original `std::scientific` output
    /// (spec.md §6, "Output").
    pub fn to_scientific(&self, digits: usize) -> String {
        let digits = digits.max(1);
        self.0.to_string_radix(10, Some(digits))
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Neg for &Scalar {
    type Output = Scalar;
    fn neg(self) -> Scalar {
        Scalar(Float::with_val(precision(), -&self.0))
    }
}

impl std::ops::Neg for Scalar {
    type Output = Scalar;
    fn neg(self) -> Scalar {
        Scalar(Float::with_val(precision(), -self.0))
    }
}

impl std::ops::Add for &Scalar {
    type Output = Scalar;
    fn add(self, rhs: &Scalar) -> Scalar {
        Scalar((&self.0 + &rhs.0).complete(precision()))
    }
}

impl std::ops::Sub for &Scalar {
    type Output = Scalar;
    fn sub(self, rhs: &Scalar) -> Scalar {
        Scalar((&self.0 - &rhs.0).complete(precision()))
    }
}

impl std::ops::Mul for &Scalar {
    type Output = Scalar;
    fn mul(self, rhs: &Scalar) -> Scalar {
        Scalar((&self.0 * &rhs.0).complete(precision()))
    }
}

impl std::ops::Div for &Scalar {
    type Output = Scalar;
    fn div(self, rhs: &Scalar) -> Scalar {
        Scalar((&self.0 / &rhs.0).complete(precision()))
    }
}

impl std::ops::AddAssign<&Scalar> for Scalar {
    fn add_assign(&mut self, rhs: &Scalar) {
        self.0 += &rhs.0;
    }
}

impl std::ops::SubAssign<&Scalar> for Scalar {
    fn sub_assign(&mut self, rhs: &Scalar) {
        self.0 -= &rhs.0;
    }
}

impl std::ops::MulAssign<&Scalar> for Scalar {
    fn mul_assign(&mut self, rhs: &Scalar) {
        self.0 *= &rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_one_are_distinct() {
        set_precision(64);
        assert!(Scalar::zero().is_zero());
        assert!(!Scalar::one().is_zero());
    }

    #[test]
    fn arithmetic_round_trips() {
        set_precision(64);
        let a = Scalar::from_i64(3);
        let b = Scalar::from_i64(4);
        let sum = &a + &b;
        assert_eq!(sum, Scalar::from_i64(7));
        let diff = &sum - &b;
        assert_eq!(diff, a);
    }

    #[test]
    fn neg_and_abs() {
        set_precision(64);
        let a = Scalar::from_i64(5);
        let neg = -&a;
        assert_eq!(neg, Scalar::from_i64(-5));
        assert_eq!(neg.abs(), a);
    }

    #[test]
    fn exp_ln_are_inverse() {
        set_precision(128);
        let a = Scalar::from_i64(2);
        let back = a.exp().ln();
        let diff = (&back - &a).abs();
        let tol = Scalar::from_f64(1e-30);
        assert!(diff < tol);
    }

    #[test]
    fn parse_rejects_garbage() {
        set_precision(64);
        assert!(Scalar::parse("not-a-number").is_err());
        assert!(Scalar::parse("-1.5").is_ok());
    }
}
