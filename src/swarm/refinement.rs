//! Local refinement of elite particles
//!
//! A [`LocalRefinement`] runs once per refinement period, after the swarm has
//! evaluated and moved every particle. [`SimplexRefinement`] seeds one
//! Nelder-Mead search from each elite particle's personal best and injects
//! the best converged point back into the swarm.

use log::{debug, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::fitness::traits::Objective;
use crate::simplex::nelder_mead::NelderMead;
use crate::simplex::{ExitReason, MinimizationResult, SimplexConfig};
use crate::space::bounds::MultiBounds;
use crate::swarm::direction::Direction;
use crate::swarm::state::SwarmState;

/// What one refinement pass did
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RefinementOutcome {
    /// Local searches started
    pub runs: usize,
    /// Searches that did not converge, and refined points rejected as NaN
    pub discarded: usize,
    /// Objective evaluations spent
    pub evaluations: usize,
    /// Whether the injected point became the new global best
    pub improved_global: bool,
    /// Index of the particle that received the refined point
    pub replaced: Option<usize>,
}

/// Strategy invoked on the swarm state once per refinement period
pub trait LocalRefinement: Send + Sync {
    /// Refine the swarm in place
    fn refine<D: Direction>(
        &self,
        state: &mut SwarmState,
        objective: &dyn Objective,
        bounds: &MultiBounds,
    ) -> RefinementOutcome;

    /// Whether the strategy does anything at all
    fn is_active(&self) -> bool {
        true
    }
}

/// Plain swarm, no local search
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRefinement;

impl LocalRefinement for NoRefinement {
    fn refine<D: Direction>(
        &self,
        _state: &mut SwarmState,
        _objective: &dyn Objective,
        _bounds: &MultiBounds,
    ) -> RefinementOutcome {
        RefinementOutcome::default()
    }

    fn is_active(&self) -> bool {
        false
    }
}

/// Nelder-Mead refinement of the `D + 2` best particles
///
/// Particles are ranked by personal best. Each elite member seeds an
/// independent simplex search from its personal-best position; searches
/// that do not converge are logged and dropped. The best surviving point is
/// clamped into the bounds, written over the worst elite member unless that
/// member's personal best is strictly better, and offered to the global
/// best.
#[derive(Clone, Copy, Debug)]
pub struct SimplexRefinement {
    solver: NelderMead,
}

impl SimplexRefinement {
    pub fn new(config: SimplexConfig) -> Self {
        Self {
            solver: NelderMead::new(config),
        }
    }

    /// Simplex settings of each local search
    pub fn config(&self) -> &SimplexConfig {
        self.solver.config()
    }

    /// Number of elite particles refined for a swarm of this shape
    pub fn elite_count(dimension: usize, num_particles: usize) -> usize {
        (dimension + 2).min(num_particles)
    }

    fn search_all<D: Direction>(
        &self,
        seeds: &[Vec<f64>],
        objective: &dyn Objective,
    ) -> Vec<Option<MinimizationResult>> {
        let solver = self.solver;
        let lowered = |x: &[f64]| D::to_minimization(objective.evaluate(x));
        let search = |seed: &Vec<f64>| match solver.minimize(&lowered, seed, None) {
            Ok(result) => Some(result),
            Err(e) => {
                warn!("refinement search from {:?} failed: {}", seed, e);
                None
            }
        };

        #[cfg(feature = "parallel")]
        {
            seeds.par_iter().map(search).collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            seeds.iter().map(search).collect()
        }
    }
}

impl Default for SimplexRefinement {
    fn default() -> Self {
        Self::new(SimplexConfig::refinement())
    }
}

impl LocalRefinement for SimplexRefinement {
    fn refine<D: Direction>(
        &self,
        state: &mut SwarmState,
        objective: &dyn Objective,
        bounds: &MultiBounds,
    ) -> RefinementOutcome {
        let elite = Self::elite_count(state.dimension(), state.num_particles());
        if elite == 0 {
            return RefinementOutcome::default();
        }
        let ranked = state.ranked_indices();
        let seeds: Vec<Vec<f64>> = ranked[..elite]
            .iter()
            .map(|&i| state.particles()[i].best_position.clone())
            .collect();

        let mut outcome = RefinementOutcome {
            runs: seeds.len(),
            ..RefinementOutcome::default()
        };

        let mut best: Option<MinimizationResult> = None;
        for result in self.search_all::<D>(&seeds, objective) {
            let Some(result) = result else {
                outcome.discarded += 1;
                continue;
            };
            outcome.evaluations += result.evaluations();
            if result.exit_reason() != ExitReason::Converged {
                warn!(
                    "refinement search ignored after {} iterations ({:?})",
                    result.iterations(),
                    result.exit_reason()
                );
                outcome.discarded += 1;
                continue;
            }
            match &best {
                Some(incumbent) if incumbent.value() <= result.value() => {}
                _ => best = Some(result),
            }
        }

        if let Some(best) = best {
            let value = best.value();
            let mut point = best.into_point();
            let raw = point.clone();
            bounds.clamp_vec(&mut point);
            let fitness = if point == raw {
                D::from_minimization(value)
            } else {
                outcome.evaluations += 1;
                objective.evaluate(&point)
            };

            if fitness.is_nan() {
                warn!("refined point {:?} evaluates to NaN after clamping", point);
                outcome.discarded += 1;
            } else {
                let worst = ranked[elite - 1];
                let particle = &mut state.particles_mut()[worst];
                if !D::is_better(particle.best_fitness, fitness) {
                    particle.relocate(point.clone(), fitness);
                    outcome.replaced = Some(worst);
                }
                outcome.improved_global = state.offer_exclusive(&point, fitness);
            }
        }

        state.add_evaluations(outcome.evaluations);
        debug!(
            "refinement: {} runs, {} discarded, {} evaluations, global improved: {}",
            outcome.runs,
            outcome.discarded,
            outcome.evaluations,
            outcome.improved_global
        );
        outcome
    }
}
