//! Benchmark objective functions
//!
//! Standard test functions for exercising the solvers. All of them are
//! minimization problems; wrap them in [`Negated`](super::traits::Negated) to
//! drive a maximizing swarm.

use std::f64::consts::PI;

use crate::fitness::traits::Objective;
use crate::space::bounds::{Bounds, MultiBounds};

/// Trait for benchmark functions
pub trait BenchmarkFunction: Send + Sync {
    /// Name of the benchmark function
    fn name(&self) -> &'static str;

    /// Dimensionality of the problem
    fn dimension(&self) -> usize;

    /// Search space bounds (min, max), shared by every dimension
    fn bounds(&self) -> (f64, f64);

    /// Optimal (minimum) value
    fn optimal_fitness(&self) -> f64;

    /// Optimal solution (if known)
    fn optimal_solution(&self) -> Option<Vec<f64>>;

    /// Evaluate the function (value to be MINIMIZED)
    fn evaluate_raw(&self, x: &[f64]) -> f64;

    /// Search space as per-dimension bounds
    fn search_space(&self) -> MultiBounds {
        let (min, max) = self.bounds();
        MultiBounds::uniform(Bounds::new(min, max), self.dimension())
    }
}

/// Sphere function: f(x) = Σxᵢ²
///
/// Unimodal, convex, separable. Optimum at origin.
#[derive(Clone, Debug)]
pub struct Sphere {
    dimension: usize,
}

impl Sphere {
    /// Create a new Sphere function
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl BenchmarkFunction for Sphere {
    fn name(&self) -> &'static str {
        "Sphere"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn bounds(&self) -> (f64, f64) {
        (-5.12, 5.12)
    }

    fn optimal_fitness(&self) -> f64 {
        0.0
    }

    fn optimal_solution(&self) -> Option<Vec<f64>> {
        Some(vec![0.0; self.dimension])
    }

    fn evaluate_raw(&self, x: &[f64]) -> f64 {
        x.iter().map(|xi| xi * xi).sum()
    }
}

impl Objective for Sphere {
    fn evaluate(&self, x: &[f64]) -> f64 {
        self.evaluate_raw(x)
    }
}

/// Rastrigin function: f(x) = 10n + Σ(xᵢ² - 10cos(2πxᵢ))
///
/// Highly multimodal with many local minima. Optimum at origin.
#[derive(Clone, Debug)]
pub struct Rastrigin {
    dimension: usize,
}

impl Rastrigin {
    /// Create a new Rastrigin function
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl BenchmarkFunction for Rastrigin {
    fn name(&self) -> &'static str {
        "Rastrigin"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn bounds(&self) -> (f64, f64) {
        (-5.12, 5.12)
    }

    fn optimal_fitness(&self) -> f64 {
        0.0
    }

    fn optimal_solution(&self) -> Option<Vec<f64>> {
        Some(vec![0.0; self.dimension])
    }

    fn evaluate_raw(&self, x: &[f64]) -> f64 {
        let a = 10.0;
        let n = x.len() as f64;
        a * n
            + x.iter()
                .map(|xi| xi * xi - a * (2.0 * PI * xi).cos())
                .sum::<f64>()
    }
}

impl Objective for Rastrigin {
    fn evaluate(&self, x: &[f64]) -> f64 {
        self.evaluate_raw(x)
    }
}

/// Rosenbrock function: f(x) = Σ[100(xᵢ₊₁-xᵢ²)² + (1-xᵢ)²]
///
/// Curved valley, non-separable. Optimum at (1,1,...,1).
#[derive(Clone, Debug)]
pub struct Rosenbrock {
    dimension: usize,
}

impl Rosenbrock {
    /// Create a new Rosenbrock function
    pub fn new(dimension: usize) -> Self {
        assert!(dimension >= 2, "Rosenbrock requires at least 2 dimensions");
        Self { dimension }
    }
}

impl BenchmarkFunction for Rosenbrock {
    fn name(&self) -> &'static str {
        "Rosenbrock"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn bounds(&self) -> (f64, f64) {
        (-5.0, 10.0)
    }

    fn optimal_fitness(&self) -> f64 {
        0.0
    }

    fn optimal_solution(&self) -> Option<Vec<f64>> {
        Some(vec![1.0; self.dimension])
    }

    fn evaluate_raw(&self, x: &[f64]) -> f64 {
        x.windows(2)
            .map(|w| 100.0 * (w[1] - w[0] * w[0]).powi(2) + (1.0 - w[0]).powi(2))
            .sum()
    }
}

impl Objective for Rosenbrock {
    fn evaluate(&self, x: &[f64]) -> f64 {
        self.evaluate_raw(x)
    }
}

/// Shifted paraboloid: f(x) = offset + Σ(xᵢ - cᵢ)²
///
/// The default instance is the two-dimensional bowl `100 + (x-10)² + y²`,
/// whose minimizer sits exactly on the upper bound of the first dimension.
#[derive(Clone, Debug)]
pub struct ShiftedParaboloid {
    offset: f64,
    center: Vec<f64>,
}

impl ShiftedParaboloid {
    /// Create the `100 + (x-10)² + y²` bowl
    pub fn new() -> Self {
        Self::with_center(100.0, vec![10.0, 0.0])
    }

    /// Create a bowl with the given floor value and minimizer
    pub fn with_center(offset: f64, center: Vec<f64>) -> Self {
        Self { offset, center }
    }
}

impl Default for ShiftedParaboloid {
    fn default() -> Self {
        Self::new()
    }
}

impl BenchmarkFunction for ShiftedParaboloid {
    fn name(&self) -> &'static str {
        "ShiftedParaboloid"
    }

    fn dimension(&self) -> usize {
        self.center.len()
    }

    fn bounds(&self) -> (f64, f64) {
        (-20.0, 10.0)
    }

    fn optimal_fitness(&self) -> f64 {
        self.offset
    }

    fn optimal_solution(&self) -> Option<Vec<f64>> {
        Some(self.center.clone())
    }

    fn evaluate_raw(&self, x: &[f64]) -> f64 {
        self.offset
            + x.iter()
                .zip(&self.center)
                .map(|(xi, ci)| (xi - ci).powi(2))
                .sum::<f64>()
    }
}

impl Objective for ShiftedParaboloid {
    fn evaluate(&self, x: &[f64]) -> f64 {
        self.evaluate_raw(x)
    }
}
