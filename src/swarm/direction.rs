//! Optimization direction
//!
//! The swarm engine is written once and parameterized by a [`Direction`].
//! Improvement is always strict: a candidate equal to the incumbent never
//! replaces it, and NaN never improves on anything.

use std::cmp::Ordering;
use std::fmt::Debug;

/// Comparison direction of an optimization problem
pub trait Direction: Copy + Debug + Default + Send + Sync + 'static {
    /// Short name used in logs
    const NAME: &'static str;

    /// Whether `candidate` strictly improves on `incumbent`
    fn is_better(candidate: f64, incumbent: f64) -> bool;

    /// Sentinel fitness every real value improves on
    fn worst() -> f64;

    /// Map a fitness onto a scale where lower is better
    fn to_minimization(value: f64) -> f64;

    /// Inverse of [`to_minimization`](Self::to_minimization)
    fn from_minimization(value: f64) -> f64;

    /// Best-first ordering with NaN last
    fn compare(a: f64, b: f64) -> Ordering {
        let key = |v: f64| {
            if v.is_nan() {
                f64::INFINITY
            } else {
                Self::to_minimization(v)
            }
        };
        key(a).total_cmp(&key(b))
    }
}

/// Lower fitness is better
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Minimize;

impl Direction for Minimize {
    const NAME: &'static str = "minimize";

    fn is_better(candidate: f64, incumbent: f64) -> bool {
        candidate < incumbent
    }

    fn worst() -> f64 {
        f64::INFINITY
    }

    fn to_minimization(value: f64) -> f64 {
        value
    }

    fn from_minimization(value: f64) -> f64 {
        value
    }
}

/// Higher fitness is better
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Maximize;

impl Direction for Maximize {
    const NAME: &'static str = "maximize";

    fn is_better(candidate: f64, incumbent: f64) -> bool {
        candidate > incumbent
    }

    fn worst() -> f64 {
        f64::NEG_INFINITY
    }

    fn to_minimization(value: f64) -> f64 {
        -value
    }

    fn from_minimization(value: f64) -> f64 {
        -value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimize_strict() {
        assert!(Minimize::is_better(1.0, 2.0));
        assert!(!Minimize::is_better(2.0, 2.0));
        assert!(!Minimize::is_better(f64::NAN, 2.0));
        assert!(Minimize::is_better(1e300, Minimize::worst()));
    }

    #[test]
    fn test_maximize_strict() {
        assert!(Maximize::is_better(2.0, 1.0));
        assert!(!Maximize::is_better(2.0, 2.0));
        assert!(!Maximize::is_better(f64::NAN, 2.0));
        assert!(Maximize::is_better(-1e300, Maximize::worst()));
    }

    #[test]
    fn test_compare_best_first() {
        let mut values = vec![3.0, f64::NAN, 1.0, 2.0];
        values.sort_by(|a, b| Minimize::compare(*a, *b));
        assert_eq!(&values[..3], &[1.0, 2.0, 3.0]);
        assert!(values[3].is_nan());

        let mut values = vec![3.0, f64::NAN, 1.0, 2.0];
        values.sort_by(|a, b| Maximize::compare(*a, *b));
        assert_eq!(&values[..3], &[3.0, 2.0, 1.0]);
        assert!(values[3].is_nan());
    }

    #[test]
    fn test_to_minimization() {
        assert_eq!(Minimize::to_minimization(5.0), 5.0);
        assert_eq!(Maximize::to_minimization(5.0), -5.0);
        assert_eq!(Maximize::from_minimization(Maximize::to_minimization(5.0)), 5.0);
    }
}
