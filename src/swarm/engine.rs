//! Particle swarm engine
//!
//! [`ParticleSwarm`] runs the epoch loop shared by every swarm variant. The
//! comparison direction and the local refinement strategy are type
//! parameters, so a plain minimizer, a maximizer and the hybrid
//! swarm-plus-simplex solver are the same engine.
//!
//! # Example
//!
//! ```rust,ignore
//! use simplex_swarm::prelude::*;
//!
//! let config = SwarmConfig::create_default(100, 500, &[-20.0, -20.0], &[10.0, 10.0], 1e-9)?;
//! let mut swarm = ParticleSwarm::minimizing(
//!     |x: &[f64]| 100.0 + (x[0] - 10.0).powi(2) + x[1].powi(2),
//!     config,
//! );
//! let result = swarm.solve()?;
//! println!("{}", result.summary());
//! ```

use std::sync::Mutex;
use std::time::Instant;

use log::{debug, info, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::diagnostics::{EpochSnapshot, SwarmResult, TerminationReason};
use crate::error::{OptResult, OptimizationError};
use crate::fitness::traits::Objective;
use crate::random::RandomEngine;
use crate::space::bounds::MultiBounds;
use crate::swarm::config::{Coefficients, SwarmConfig};
use crate::swarm::direction::{Direction, Maximize, Minimize};
use crate::swarm::particle::Particle;
use crate::swarm::refinement::{LocalRefinement, NoRefinement, SimplexRefinement};
use crate::swarm::state::{accept, lock_global, GlobalBest, Phase, SwarmState};
use crate::termination::{AllOf, StoppingCriterion};

/// User transformation applied to particle positions before clamping
pub type PositionHook = Box<dyn Fn(&mut [f64]) + Send + Sync>;

type HookRef<'a> = Option<&'a (dyn Fn(&mut [f64]) + Send + Sync)>;

/// Particle swarm optimizer
pub struct ParticleSwarm<D: Direction, R: LocalRefinement = NoRefinement> {
    direction: D,
    objective: Box<dyn Objective>,
    config: SwarmConfig,
    engine: Box<dyn RandomEngine>,
    criteria: AllOf,
    refinement: R,
    position_hook: Option<PositionHook>,
    last_result: Option<SwarmResult>,
    last_state: Option<SwarmState>,
}

impl<D: Direction> ParticleSwarm<D> {
    /// Create a plain swarm
    ///
    /// The random engine and the stopping criteria are taken from `config`.
    pub fn new(direction: D, objective: impl Objective + 'static, config: SwarmConfig) -> Self {
        let engine = config.engine().create(config.seed());
        let criteria = AllOf::new(
            config
                .stopping_rules()
                .iter()
                .map(|rule| rule.build(config.acceptance_error()))
                .collect(),
        )
        .with_enabled(config.stopping_enabled());

        Self {
            direction,
            objective: Box::new(objective),
            config,
            engine,
            criteria,
            refinement: NoRefinement,
            position_hook: None,
            last_result: None,
            last_state: None,
        }
    }
}

impl ParticleSwarm<Minimize> {
    /// Plain swarm that minimizes `objective`
    pub fn minimizing(objective: impl Objective + 'static, config: SwarmConfig) -> Self {
        Self::new(Minimize, objective, config)
    }
}

impl ParticleSwarm<Maximize> {
    /// Plain swarm that maximizes `objective`
    pub fn maximizing(objective: impl Objective + 'static, config: SwarmConfig) -> Self {
        Self::new(Maximize, objective, config)
    }
}

impl<D: Direction> ParticleSwarm<D, SimplexRefinement> {
    /// Swarm with Nelder-Mead refinement of its elite particles
    pub fn hybrid(direction: D, objective: impl Objective + 'static, config: SwarmConfig) -> Self {
        ParticleSwarm::<D, NoRefinement>::new(direction, objective, config)
            .with_refinement(SimplexRefinement::default())
    }
}

impl<D: Direction, R: LocalRefinement> ParticleSwarm<D, R> {
    /// Replace the random engine
    pub fn with_engine(mut self, engine: impl RandomEngine + 'static) -> Self {
        self.engine = Box::new(engine);
        self
    }

    /// Add a stopping criterion to the conjunction
    ///
    /// Early stopping still has to be enabled in the configuration.
    pub fn with_criterion(mut self, criterion: impl StoppingCriterion + 'static) -> Self {
        self.criteria.push(Box::new(criterion));
        self
    }

    /// Replace the local refinement strategy
    pub fn with_refinement<R2: LocalRefinement>(self, refinement: R2) -> ParticleSwarm<D, R2> {
        ParticleSwarm {
            direction: self.direction,
            objective: self.objective,
            config: self.config,
            engine: self.engine,
            criteria: self.criteria,
            refinement,
            position_hook: self.position_hook,
            last_result: self.last_result,
            last_state: self.last_state,
        }
    }

    /// Transform every particle position after initialization and each move
    ///
    /// The transformed position is clamped into the bounds again.
    pub fn with_position_hook(mut self, hook: impl Fn(&mut [f64]) + Send + Sync + 'static) -> Self {
        self.position_hook = Some(Box::new(hook));
        self
    }

    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    pub fn direction(&self) -> D {
        self.direction
    }

    /// Result of the most recent successful solve
    pub fn last_result(&self) -> OptResult<&SwarmResult> {
        self.last_result.as_ref().ok_or(OptimizationError::NoSolution)
    }

    /// Final state of the most recent solve
    pub fn last_state(&self) -> Option<&SwarmState> {
        self.last_state.as_ref()
    }

    /// Run the swarm to termination
    pub fn solve(&mut self) -> OptResult<SwarmResult> {
        self.solve_with_observer(|_| {})
    }

    /// Run the swarm, calling `observer` after every epoch that does not stop it
    ///
    /// Fails with [`OptimizationError::NoSolution`] when no candidate was
    /// ever accepted as global best, for example with a zero epoch budget.
    pub fn solve_with_observer<F>(&mut self, mut observer: F) -> OptResult<SwarmResult>
    where
        F: FnMut(&EpochSnapshot),
    {
        let start_time = Instant::now();
        let Self {
            objective,
            config,
            engine,
            criteria,
            refinement,
            position_hook,
            last_result,
            last_state,
            ..
        } = self;
        let objective: &dyn Objective = &**objective;
        let hook = position_hook.as_deref();
        let bounds = config.bounds();
        let coefficients = *config.coefficients();

        info!(
            "starting {} swarm: {} particles, {} dimensions, {} epochs",
            D::NAME,
            config.num_particles(),
            config.dimension(),
            config.max_epochs()
        );

        let mut state = SwarmState::new::<D>(config.dimension());
        let particles = (0..config.num_particles())
            .map(|_| {
                let mut particle = Particle::random::<D, _>(bounds, &mut **engine);
                apply_hook(hook, bounds, &mut particle.position);
                particle.best_position.clone_from(&particle.position);
                particle
            })
            .collect();
        state.install(particles);

        let mut termination = TerminationReason::EpochBudgetExhausted;
        while state.epoch() < config.max_epochs() {
            state.begin_epoch();
            if config.parallel() {
                evaluate_parallel::<D>(&mut state, objective);
                state.set_phase(Phase::Moving);
                move_all(&mut state, &coefficients, bounds, &mut **engine, hook);
            } else {
                step_sequential::<D>(
                    &mut state,
                    objective,
                    &coefficients,
                    bounds,
                    &mut **engine,
                    hook,
                );
                state.set_phase(Phase::Moving);
            }

            if refinement.is_active() && state.epoch() % config.refine_every() == 0 {
                refinement.refine::<D>(&mut state, objective, bounds);
            }

            state.record_snapshot();
            debug!(
                "epoch {}: best fitness {:.6e}, {} evaluations",
                state.epoch(),
                state.best_fitness(),
                state.evaluations()
            );

            if criteria.can_stop(&state) {
                termination = TerminationReason::CriteriaMet;
                break;
            }
            if let Some(snapshot) = state.history().last() {
                observer(snapshot);
            }
        }
        state.set_phase(Phase::Terminated);

        let global = state.global_best();
        let result = if global.found {
            let result = SwarmResult {
                success: global.fitness.is_finite(),
                best_position: global.position,
                best_fitness: global.fitness,
                epochs: state.epoch(),
                evaluations: state.evaluations(),
                termination,
                history: state.history().to_vec(),
                runtime_ms: 0.0,
            }
            .with_runtime(start_time.elapsed());
            info!(
                "swarm finished after {} epochs ({}): best fitness {:.6e}",
                result.epochs,
                result.termination.description(),
                result.best_fitness
            );
            Some(result)
        } else {
            warn!("swarm finished after {} epochs without a solution", state.epoch());
            None
        };

        *last_state = Some(state);
        *last_result = result.clone();
        result.ok_or(OptimizationError::NoSolution)
    }
}

impl<D: Direction, R: LocalRefinement + std::fmt::Debug> std::fmt::Debug for ParticleSwarm<D, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticleSwarm")
            .field("direction", &D::NAME)
            .field("config", &self.config)
            .field("criteria", &self.criteria)
            .field("refinement", &self.refinement)
            .field("position_hook", &self.position_hook.is_some())
            .finish_non_exhaustive()
    }
}

fn apply_hook(hook: HookRef<'_>, bounds: &MultiBounds, position: &mut [f64]) {
    if let Some(hook) = hook {
        hook(position);
        bounds.clamp_vec(position);
    }
}

/// Evaluate one particle and offer an improved personal best
fn evaluate<D: Direction>(
    particle: &mut Particle,
    objective: &dyn Objective,
    global: &Mutex<GlobalBest>,
) {
    let fitness = objective.evaluate(&particle.position);
    if particle.record_fitness::<D>(fitness) {
        accept(
            &mut lock_global(global),
            D::is_better,
            &particle.best_position,
            particle.best_fitness,
        );
    }
}

/// Evaluate then move each particle in turn
fn step_sequential<D: Direction>(
    state: &mut SwarmState,
    objective: &dyn Objective,
    coefficients: &Coefficients,
    bounds: &MultiBounds,
    engine: &mut dyn RandomEngine,
    hook: HookRef<'_>,
) {
    let (particles, global) = state.split();
    let count = particles.len();
    for particle in particles.iter_mut() {
        evaluate::<D>(particle, objective, global);
        let best = lock_global(global);
        particle.advance(coefficients, &best.position, bounds, engine);
        drop(best);
        apply_hook(hook, bounds, &mut particle.position);
    }
    state.add_evaluations(count);
}

/// Evaluate every particle, on worker threads when available
fn evaluate_parallel<D: Direction>(state: &mut SwarmState, objective: &dyn Objective) {
    let (particles, global) = state.split();
    let count = particles.len();

    #[cfg(feature = "parallel")]
    particles
        .par_iter_mut()
        .for_each(|particle| evaluate::<D>(particle, objective, global));

    #[cfg(not(feature = "parallel"))]
    particles
        .iter_mut()
        .for_each(|particle| evaluate::<D>(particle, objective, global));

    state.add_evaluations(count);
}

/// Move every particle towards a snapshot of the global best
fn move_all(
    state: &mut SwarmState,
    coefficients: &Coefficients,
    bounds: &MultiBounds,
    engine: &mut dyn RandomEngine,
    hook: HookRef<'_>,
) {
    let (particles, global) = state.split();
    let best = lock_global(global).position.clone();
    for particle in particles.iter_mut() {
        particle.advance(coefficients, &best, bounds, engine);
        apply_hook(hook, bounds, &mut particle.position);
    }
}
