//! Objective function traits
//!
//! Every solver in this crate evaluates candidates through [`Objective`].
//! Objectives must be pure for runs to be reproducible, and `Send + Sync` so
//! particles and restarts can be evaluated on worker threads.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Scalar objective over a real vector
pub trait Objective: Send + Sync {
    /// Evaluate the objective at `x`
    fn evaluate(&self, x: &[f64]) -> f64;
}

impl<F> Objective for F
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn evaluate(&self, x: &[f64]) -> f64 {
        self(x)
    }
}

/// Wrapper negating an objective
///
/// Turns a maximization problem into a minimization problem and vice versa.
#[derive(Clone, Debug)]
pub struct Negated<O> {
    inner: O,
}

impl<O> Negated<O> {
    /// Wrap an objective
    pub fn new(inner: O) -> Self {
        Self { inner }
    }

    /// Get a reference to the wrapped objective
    pub fn inner(&self) -> &O {
        &self.inner
    }
}

impl<O: Objective> Objective for Negated<O> {
    fn evaluate(&self, x: &[f64]) -> f64 {
        -self.inner.evaluate(x)
    }
}

/// Wrapper counting how many times an objective is evaluated
#[derive(Debug)]
pub struct CountingObjective<O> {
    inner: O,
    calls: AtomicUsize,
}

impl<O> CountingObjective<O> {
    /// Wrap an objective with a zeroed counter
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of evaluations so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl<O: Objective> Objective for CountingObjective<O> {
    fn evaluate(&self, x: &[f64]) -> f64 {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.inner.evaluate(x)
    }
}
