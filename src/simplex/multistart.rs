//! Multi-start Nelder-Mead
//!
//! Runs independent simplex searches from many starting points and keeps
//! every usable outcome. Starting points come from the caller or from the
//! Hammersley sequence over the search box; the parallel entry point hands
//! each start to its own rayon task.

use std::sync::{Mutex, PoisonError};

use log::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{OptResult, OptimizationError};
use crate::fitness::traits::Objective;
use crate::simplex::nelder_mead::NelderMead;
use crate::simplex::{ExitReason, MinimizationResult, SimplexConfig};
use crate::space::bounds::MultiBounds;
use crate::space::hammersley::hammersley;

/// Default initial edge length as a fraction of each dimension's range
pub const DEFAULT_PERTURBATION_SCALE: f64 = 0.05;

/// Multi-start simplex minimizer over a bounded search space
///
/// Recorded solutions accumulate across calls until [`clear`](Self::clear).
pub struct NelderMeadMinimizer<O> {
    objective: O,
    bounds: MultiBounds,
    solver: NelderMead,
    perturbation: Vec<f64>,
    solutions: Mutex<Vec<MinimizationResult>>,
}

impl<O: Objective> NelderMeadMinimizer<O> {
    /// Create a minimizer with the default tolerance, budget and perturbation scale
    pub fn new(objective: O, bounds: MultiBounds) -> OptResult<Self> {
        Self::with_config(
            objective,
            bounds,
            SimplexConfig::default(),
            DEFAULT_PERTURBATION_SCALE,
        )
    }

    /// Create a minimizer with explicit settings
    ///
    /// Fails on empty or inverted bounds, an invalid simplex configuration,
    /// or a non-positive perturbation scale.
    pub fn with_config(
        objective: O,
        bounds: MultiBounds,
        config: SimplexConfig,
        perturbation_scale: f64,
    ) -> OptResult<Self> {
        bounds.validate()?;
        config.validate()?;
        if !(perturbation_scale.is_finite() && perturbation_scale > 0.0) {
            return Err(OptimizationError::Configuration(format!(
                "perturbation scale must be positive and finite, got {perturbation_scale}"
            )));
        }

        let perturbation = bounds.scaled_ranges(perturbation_scale);
        info!(
            "Nelder-Mead minimizer over {} dimensions (tolerance {}, budget {})",
            bounds.dimension(),
            config.convergence_tolerance,
            config.max_iterations
        );

        Ok(Self {
            objective,
            bounds,
            solver: NelderMead::new(config),
            perturbation,
            solutions: Mutex::new(Vec::new()),
        })
    }

    /// Get the search space
    pub fn bounds(&self) -> &MultiBounds {
        &self.bounds
    }

    /// Bound-proportional perturbation used by the Hammersley entry points
    pub fn perturbation(&self) -> &[f64] {
        &self.perturbation
    }

    /// Minimize from one guess with the default simplex shape
    pub fn minimize(&self, guess: &[f64]) -> OptResult<MinimizationResult> {
        self.bounds.check_dimension(guess)?;
        let result = self.solver.minimize(&self.objective, guess, None)?;
        self.record(vec![result.clone()]);
        Ok(result)
    }

    /// Minimize from one guess with an explicit initial perturbation
    pub fn minimize_perturbed(
        &self,
        guess: &[f64],
        perturbation: &[f64],
    ) -> OptResult<MinimizationResult> {
        self.bounds.check_dimension(guess)?;
        self.bounds.check_dimension(perturbation)?;
        let result = self
            .solver
            .minimize(&self.objective, guess, Some(perturbation))?;
        self.record(vec![result.clone()]);
        Ok(result)
    }

    /// Minimize sequentially from each guess and return the best recorded solution
    pub fn minimize_multiple<I>(&self, guesses: I) -> OptResult<MinimizationResult>
    where
        I: IntoIterator,
        I::Item: AsRef<[f64]>,
    {
        for guess in guesses {
            self.minimize(guess.as_ref())?;
        }
        self.best_solution()
    }

    /// Minimize sequentially from `num_starts` Hammersley points
    pub fn minimize_multiple_with_perturbations(
        &self,
        num_starts: usize,
    ) -> OptResult<MinimizationResult> {
        let guesses = hammersley(num_starts, &self.bounds)?;
        debug!("Sequential multi-start from {} Hammersley points", guesses.len());

        let mut batch = Vec::with_capacity(guesses.len());
        for guess in &guesses {
            batch.push(
                self.solver
                    .minimize(&self.objective, guess, Some(&self.perturbation))?,
            );
        }
        self.record(batch);
        self.best_solution()
    }

    /// Minimize from `num_starts` Hammersley points, one independent task per start
    ///
    /// Results are gathered in start order and recorded in one batch, so the
    /// best-of reduction matches the sequential variant exactly.
    pub fn minimize_multiple_with_perturbations_parallel(
        &self,
        num_starts: usize,
    ) -> OptResult<MinimizationResult> {
        let guesses = hammersley(num_starts, &self.bounds)?;
        debug!("Parallel multi-start from {} Hammersley points", guesses.len());

        #[cfg(feature = "parallel")]
        let outcomes: Vec<OptResult<MinimizationResult>> = guesses
            .par_iter()
            .map(|guess| {
                self.solver
                    .minimize(&self.objective, guess, Some(&self.perturbation))
            })
            .collect();

        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<OptResult<MinimizationResult>> = guesses
            .iter()
            .map(|guess| {
                self.solver
                    .minimize(&self.objective, guess, Some(&self.perturbation))
            })
            .collect();

        let batch = outcomes.into_iter().collect::<OptResult<Vec<_>>>()?;
        self.record(batch);
        self.best_solution()
    }

    /// Lowest-valued recorded solution
    ///
    /// Ties keep the earliest recorded solution.
    pub fn best_solution(&self) -> OptResult<MinimizationResult> {
        let solutions = self.lock();
        let best = solutions
            .iter()
            .fold(None, |best: Option<&MinimizationResult>, s| match best {
                Some(b) if s.value() < b.value() => Some(s),
                Some(b) => Some(b),
                None => Some(s),
            });

        match best {
            Some(best) => Ok(best.clone()),
            None => {
                warn!("Best solution requested before any run was recorded");
                Err(OptimizationError::NoSolution)
            }
        }
    }

    /// Snapshot of every recorded solution, in recording order
    pub fn solutions(&self) -> Vec<MinimizationResult> {
        self.lock().clone()
    }

    /// Forget every recorded solution
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn record(&self, batch: Vec<MinimizationResult>) {
        let mut solutions = self.lock();
        for result in batch {
            if result.exit_reason() == ExitReason::Failure {
                debug!("Discarding failed Nelder-Mead run");
                continue;
            }
            solutions.push(result);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<MinimizationResult>> {
        self.solutions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<O> std::fmt::Debug for NelderMeadMinimizer<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NelderMeadMinimizer")
            .field("bounds", &self.bounds)
            .field("solver", &self.solver)
            .field("perturbation", &self.perturbation)
            .finish_non_exhaustive()
    }
}
