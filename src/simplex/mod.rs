//! Nelder-Mead simplex minimization
//!
//! This module provides a single-start downhill simplex minimizer and a
//! multi-start driver that spreads its starting points with the Hammersley
//! sequence.
//!
//! Reference: Nelder, J. A., & Mead, R. (1965). A Simplex Method for Function
//! Minimization. The Computer Journal, 7(4).

pub mod multistart;
pub mod nelder_mead;

use serde::{Deserialize, Serialize};

use crate::error::{OptResult, OptimizationError};

pub use multistart::NelderMeadMinimizer;
pub use nelder_mead::NelderMead;

/// Tolerance and budget for one simplex run
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimplexConfig {
    /// Relative spread of vertex values below which a run has converged
    pub convergence_tolerance: f64,
    /// Maximum number of simplex steps
    pub max_iterations: usize,
}

impl SimplexConfig {
    /// Create a configuration
    pub fn new(convergence_tolerance: f64, max_iterations: usize) -> Self {
        Self {
            convergence_tolerance,
            max_iterations,
        }
    }

    /// Tight, short configuration used for refining swarm elites
    pub fn refinement() -> Self {
        Self::new(1e-10, 500)
    }

    /// Check the configuration
    pub fn validate(&self) -> OptResult<()> {
        if !(self.convergence_tolerance.is_finite() && self.convergence_tolerance > 0.0) {
            return Err(OptimizationError::Configuration(format!(
                "convergence tolerance must be positive and finite, got {}",
                self.convergence_tolerance
            )));
        }
        Ok(())
    }
}

impl Default for SimplexConfig {
    fn default() -> Self {
        Self::new(1e-6, 10_000)
    }
}

/// Why a simplex run stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExitReason {
    /// Vertex values agreed to within the tolerance
    Converged,
    /// The iteration budget ran out first
    ExceededIterations,
    /// The objective produced no usable value
    Failure,
}

/// Outcome of one simplex run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinimizationResult {
    point: Vec<f64>,
    value: f64,
    iterations: usize,
    evaluations: usize,
    exit_reason: ExitReason,
}

impl MinimizationResult {
    pub(crate) fn new(
        point: Vec<f64>,
        value: f64,
        iterations: usize,
        evaluations: usize,
        exit_reason: ExitReason,
    ) -> Self {
        Self {
            point,
            value,
            iterations,
            evaluations,
            exit_reason,
        }
    }

    /// Best vertex found
    pub fn point(&self) -> &[f64] {
        &self.point
    }

    /// Objective value at [`point`](Self::point)
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Simplex steps taken
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Objective evaluations spent
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn exit_reason(&self) -> ExitReason {
        self.exit_reason
    }

    pub fn is_converged(&self) -> bool {
        self.exit_reason == ExitReason::Converged
    }

    /// Consume the result, returning the point
    pub fn into_point(self) -> Vec<f64> {
        self.point
    }
}

pub mod prelude {
    pub use super::multistart::{NelderMeadMinimizer, DEFAULT_PERTURBATION_SCALE};
    pub use super::nelder_mead::NelderMead;
    pub use super::{ExitReason, MinimizationResult, SimplexConfig};
}
