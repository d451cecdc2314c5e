//! Swarm particles

use serde::{Deserialize, Serialize};

use crate::random::RandomEngine;
use crate::space::bounds::MultiBounds;
use crate::swarm::config::Coefficients;
use crate::swarm::direction::Direction;

/// One candidate solution with its velocity and personal best
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Current position
    pub position: Vec<f64>,
    /// Current velocity
    pub velocity: Vec<f64>,
    /// Best position this particle has visited
    pub best_position: Vec<f64>,
    /// Fitness at the current position
    pub fitness: f64,
    /// Fitness at [`best_position`](Self::best_position)
    pub best_fitness: f64,
}

impl Particle {
    /// Create an unevaluated particle
    ///
    /// Both fitness fields start at the direction's sentinel so the first
    /// evaluation always becomes the personal best.
    pub fn new<D: Direction>(position: Vec<f64>, velocity: Vec<f64>) -> Self {
        Self {
            best_position: position.clone(),
            position,
            velocity,
            fitness: D::worst(),
            best_fitness: D::worst(),
        }
    }

    /// Sample a particle uniformly inside `bounds`
    ///
    /// Each dimension draws its position from `[min, max]`, then its velocity
    /// from `[-range, range]`.
    pub fn random<D: Direction, R: RandomEngine + ?Sized>(
        bounds: &MultiBounds,
        engine: &mut R,
    ) -> Self {
        let mut position = Vec::with_capacity(bounds.dimension());
        let mut velocity = Vec::with_capacity(bounds.dimension());
        for b in bounds.iter() {
            position.push(engine.next_in_range(b.min, b.max));
            velocity.push(engine.next_in_range(-b.range(), b.range()));
        }
        Self::new::<D>(position, velocity)
    }

    /// Dimensionality of the particle
    pub fn dimension(&self) -> usize {
        self.position.len()
    }

    /// Store the fitness of the current position
    ///
    /// Returns `true` when it strictly improves on the personal best, which is
    /// then moved to the current position.
    pub fn record_fitness<D: Direction>(&mut self, fitness: f64) -> bool {
        self.fitness = fitness;
        if D::is_better(fitness, self.best_fitness) {
            self.best_fitness = fitness;
            self.best_position.clone_from(&self.position);
            true
        } else {
            false
        }
    }

    /// Replace the particle's state with an externally found point
    pub fn relocate(&mut self, position: Vec<f64>, fitness: f64) {
        self.best_position.clone_from(&position);
        self.position = position;
        self.fitness = fitness;
        self.best_fitness = fitness;
    }

    /// Apply one velocity and position update, then clamp into `bounds`
    ///
    /// Two fresh deviates are drawn per dimension: the cognitive one first,
    /// then the social one.
    pub fn advance<R: RandomEngine + ?Sized>(
        &mut self,
        coefficients: &Coefficients,
        global_best: &[f64],
        bounds: &MultiBounds,
        engine: &mut R,
    ) {
        for i in 0..self.position.len() {
            let r_p = engine.next_f64();
            let r_g = engine.next_f64();
            let x = self.position[i];

            self.velocity[i] = coefficients.inertia * self.velocity[i]
                + coefficients.cognitive * r_p * (self.best_position[i] - x)
                + coefficients.social * r_g * (global_best[i] - x);
            self.position[i] = x + self.velocity[i];
        }
        bounds.clamp_vec(&mut self.position);
    }
}
