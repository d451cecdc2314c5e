//! Swarm state
//!
//! [`SwarmState`] owns the particles of one solve together with the global
//! best. The global best sits behind the swarm's only lock: particles
//! evaluated on worker threads offer their personal bests through
//! [`SwarmState::offer`], which replaces the incumbent only on strict
//! improvement, so the recorded best never worsens.

use std::cmp::Ordering;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::diagnostics::EpochSnapshot;
use crate::swarm::direction::Direction;
use crate::swarm::particle::Particle;

/// Lifecycle of a solve
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// No particles yet
    Uninitialized,
    /// Particles sampled, no epoch run
    Initialized,
    /// Computing fitness values
    Evaluating,
    /// Updating velocities and positions
    Moving,
    /// Solve finished
    Terminated,
}

/// Best point seen by any particle
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlobalBest {
    /// Best position
    pub position: Vec<f64>,
    /// Fitness at `position`, or the direction's sentinel before any acceptance
    pub fitness: f64,
    /// Whether any candidate has been accepted
    pub found: bool,
}

/// Particles, global best and progress counters of one solve
#[derive(Debug)]
pub struct SwarmState {
    particles: Vec<Particle>,
    global: Mutex<GlobalBest>,
    epoch: usize,
    evaluations: usize,
    history: Vec<EpochSnapshot>,
    phase: Phase,
    dimension: usize,
    is_better: fn(f64, f64) -> bool,
    compare: fn(f64, f64) -> Ordering,
}

impl SwarmState {
    /// Create an empty state for a `dimension`-dimensional problem
    pub fn new<D: Direction>(dimension: usize) -> Self {
        Self {
            particles: Vec::new(),
            global: Mutex::new(GlobalBest {
                position: vec![0.0; dimension],
                fitness: D::worst(),
                found: false,
            }),
            epoch: 0,
            evaluations: 0,
            history: Vec::new(),
            phase: Phase::Uninitialized,
            dimension,
            is_better: D::is_better,
            compare: D::compare,
        }
    }

    /// Create a state from existing particles
    ///
    /// Every particle's personal best is offered to the global best.
    pub fn with_particles<D: Direction>(particles: Vec<Particle>) -> Self {
        let dimension = particles.first().map_or(0, Particle::dimension);
        let mut state = Self::new::<D>(dimension);
        state.install(particles);
        let candidates: Vec<(Vec<f64>, f64)> = state
            .particles
            .iter()
            .map(|p| (p.best_position.clone(), p.best_fitness))
            .collect();
        for (position, fitness) in candidates {
            state.offer_exclusive(&position, fitness);
        }
        state
    }

    /// Replace the particle set and reset the global best placeholder
    pub(crate) fn install(&mut self, particles: Vec<Particle>) {
        let placeholder = particles
            .first()
            .map(|p| p.position.clone())
            .unwrap_or_else(|| vec![0.0; self.dimension]);
        let global = self.global_mut();
        global.position = placeholder;
        self.particles = particles;
        self.phase = Phase::Initialized;
    }

    /// Get the particles
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Get mutable access to the particles
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Split into mutable particles and the shared global best
    pub(crate) fn split(&mut self) -> (&mut [Particle], &Mutex<GlobalBest>) {
        (&mut self.particles, &self.global)
    }

    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Completed epochs
    pub fn epoch(&self) -> usize {
        self.epoch
    }

    /// Objective evaluations so far
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// One snapshot per completed epoch
    pub fn history(&self) -> &[EpochSnapshot] {
        &self.history
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Copy of the global best
    pub fn global_best(&self) -> GlobalBest {
        self.lock().clone()
    }

    /// Global best fitness
    pub fn best_fitness(&self) -> f64 {
        self.lock().fitness
    }

    /// Whether any candidate has been accepted as global best
    pub fn has_solution(&self) -> bool {
        self.lock().found
    }

    /// Offer a candidate to the global best
    ///
    /// The candidate is copied in only if it strictly improves on the
    /// incumbent. Returns whether it was accepted.
    pub fn offer(&self, position: &[f64], fitness: f64) -> bool {
        let mut global = self.lock();
        accept(&mut global, self.is_better, position, fitness)
    }

    /// [`offer`](Self::offer) without locking, for callers holding `&mut self`
    pub fn offer_exclusive(&mut self, position: &[f64], fitness: f64) -> bool {
        let is_better = self.is_better;
        accept(self.global_mut(), is_better, position, fitness)
    }

    /// Whether `candidate` strictly improves on `incumbent` in this swarm's direction
    pub fn is_better(&self, candidate: f64, incumbent: f64) -> bool {
        (self.is_better)(candidate, incumbent)
    }

    /// Particle indices ordered best-first by personal best
    ///
    /// The sort is stable, so equal fitness keeps index order.
    pub fn ranked_indices(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.particles.len()).collect();
        order.sort_by(|&a, &b| {
            (self.compare)(self.particles[a].best_fitness, self.particles[b].best_fitness)
        });
        order
    }

    /// Personal best fitness values ordered best-first
    pub fn ranked_best_fitness(&self) -> Vec<f64> {
        self.ranked_indices()
            .into_iter()
            .map(|i| self.particles[i].best_fitness)
            .collect()
    }

    /// Count objective evaluations made outside the epoch loop
    pub fn add_evaluations(&mut self, count: usize) {
        self.evaluations += count;
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn begin_epoch(&mut self) {
        self.epoch += 1;
        self.phase = Phase::Evaluating;
    }

    /// Append a snapshot of the global best for the current epoch
    pub(crate) fn record_snapshot(&mut self) {
        let epoch = self.epoch;
        let evaluations = self.evaluations;
        let global = self.global_mut();
        let snapshot = EpochSnapshot {
            epoch,
            evaluations,
            best_fitness: global.fitness,
            best_position: global.position.clone(),
        };
        self.history.push(snapshot);
    }

    fn lock(&self) -> MutexGuard<'_, GlobalBest> {
        lock_global(&self.global)
    }

    fn global_mut(&mut self) -> &mut GlobalBest {
        self.global
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Read-modify-write of the global best under strict improvement
pub(crate) fn accept(
    global: &mut GlobalBest,
    is_better: fn(f64, f64) -> bool,
    position: &[f64],
    fitness: f64,
) -> bool {
    if is_better(fitness, global.fitness) {
        global.fitness = fitness;
        global.position.clear();
        global.position.extend_from_slice(position);
        global.found = true;
        true
    } else {
        false
    }
}

/// Lock a shared global best, recovering from poisoning
pub(crate) fn lock_global(global: &Mutex<GlobalBest>) -> MutexGuard<'_, GlobalBest> {
    global.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swarm::direction::{Maximize, Minimize};

    fn particle(best_fitness: f64, x: f64) -> Particle {
        let mut p = Particle::new::<Minimize>(vec![x], vec![0.0]);
        p.best_fitness = best_fitness;
        p.fitness = best_fitness;
        p
    }

    #[test]
    fn test_new_state() {
        let state = SwarmState::new::<Minimize>(3);
        assert_eq!(state.phase(), Phase::Uninitialized);
        assert_eq!(state.best_fitness(), f64::INFINITY);
        assert!(!state.has_solution());
        assert_eq!(state.dimension(), 3);
    }

    #[test]
    fn test_offer_strict_improvement() {
        let state = SwarmState::new::<Minimize>(1);
        assert!(state.offer(&[1.0], 5.0));
        assert!(!state.offer(&[2.0], 5.0));
        assert!(!state.offer(&[3.0], f64::NAN));
        assert!(state.offer(&[4.0], 4.0));

        let best = state.global_best();
        assert_eq!(best.position, vec![4.0]);
        assert_eq!(best.fitness, 4.0);
        assert!(best.found);
    }

    #[test]
    fn test_offer_maximize() {
        let mut state = SwarmState::new::<Maximize>(1);
        assert!(state.offer_exclusive(&[1.0], -5.0));
        assert!(state.offer_exclusive(&[2.0], 3.0));
        assert!(!state.offer_exclusive(&[3.0], 1.0));
        assert_eq!(state.global_best().position, vec![2.0]);
    }

    #[test]
    fn test_with_particles_seeds_global_best() {
        let state =
            SwarmState::with_particles::<Minimize>(vec![particle(3.0, 1.0), particle(1.0, 2.0)]);
        assert_eq!(state.best_fitness(), 1.0);
        assert_eq!(state.global_best().position, vec![2.0]);
        assert_eq!(state.phase(), Phase::Initialized);
    }

    #[test]
    fn test_ranked_best_fitness() {
        let particles = vec![
            particle(3.0, 0.0),
            particle(f64::NAN, 0.0),
            particle(1.0, 0.0),
            particle(2.0, 0.0),
        ];
        let state = SwarmState::with_particles::<Minimize>(particles.clone());
        assert_eq!(state.ranked_indices(), vec![2, 3, 0, 1]);

        let state = SwarmState::with_particles::<Maximize>(particles);
        assert_eq!(state.ranked_indices(), vec![0, 3, 2, 1]);
    }

    #[test]
    fn test_record_snapshot() {
        let mut state = SwarmState::new::<Minimize>(1);
        state.begin_epoch();
        state.add_evaluations(7);
        state.offer_exclusive(&[0.5], 2.0);
        state.record_snapshot();
        let snapshot = &state.history()[0];

        assert_eq!(snapshot.epoch, 1);
        assert_eq!(snapshot.evaluations, 7);
        assert_eq!(snapshot.best_fitness, 2.0);
        assert_eq!(state.history().len(), 1);
    }
}
