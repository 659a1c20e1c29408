//! Russell - Rust Scientific Library (isingZ lineage)
//!
//! `ising_chk`: assertion macros for comparing [ising_prec::Scalar] values
//! in tests, the way `russell_chk` compares `f64`/`f32` values.

/// Asserts that two scalars are approximately equal to each other.
///
/// # Input
///
/// `a`, `b` -- the two [ising_prec::Scalar] values being compared
/// `tol` -- anything convertible to a [ising_prec::Scalar] such that
/// `|a - b| < tol`
///
/// # Examples
///
/// ```
/// use ising_prec::{set_precision, Scalar};
/// # #[macro_use] extern crate ising_chk;
/// # fn main() {
/// set_precision(64);
/// let a = Scalar::from_f64(3.0000001);
/// let b = Scalar::from_f64(3.0);
/// assert_scalar_approx_eq!(a, b, 1e-6);
/// # }
/// ```
#[macro_export]
macro_rules! assert_scalar_approx_eq {
    ($a:expr, $b:expr, $tol:expr) => {{
        let (a, b) = (&$a, &$b);
        let tol = ising_prec::Scalar::from_f64($tol as f64);
        let diff = (a - b).abs();
        assert!(
            diff < tol,
            "assertion failed: `(left != right)` \
             (left: `{}`, right: `{}`, expect diff: `{}`, real diff: `{}`)",
            a,
            b,
            tol,
            diff
        );
    }};
}

/// Asserts that a slice of scalars is element-wise approximately equal to
/// another.
#[macro_export]
macro_rules! assert_scalar_vec_approx_eq {
    ($a:expr, $b:expr, $tol:expr) => {{
        let (a, b): (&[ising_prec::Scalar], &[ising_prec::Scalar]) = (&$a, &$b);
        assert_eq!(a.len(), b.len(), "vectors have different lengths");
        for i in 0..a.len() {
            $crate::assert_scalar_approx_eq!(a[i], b[i], $tol);
        }
    }};
}

#[cfg(test)]
mod tests {
    use ising_prec::{set_precision, Scalar};

    #[test]
    fn accepts_approx_equal_values() {
        set_precision(64);
        let a = Scalar::from_f64(2.0);
        let b = Scalar::from_f64(2.02);
        assert_scalar_approx_eq!(a, b, 0.03);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn panics_on_different_values() {
        set_precision(64);
        let a = Scalar::from_f64(2.0);
        let b = Scalar::from_f64(2.5);
        assert_scalar_approx_eq!(a, b, 1e-1);
    }

    #[test]
    fn vec_variant_checks_each_entry() {
        set_precision(64);
        let a = vec![Scalar::from_i64(1), Scalar::from_i64(2)];
        let b = vec![Scalar::from_i64(1), Scalar::from_i64(2)];
        assert_scalar_vec_approx_eq!(a, b, 1e-12);
    }
}
