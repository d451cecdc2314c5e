//! Stopping criteria
//!
//! This module provides the pluggable criteria a swarm consults after every
//! epoch. Criteria only read the swarm state. A solve stops early only when
//! stopping is enabled and every configured criterion agrees; otherwise it
//! runs its full epoch budget.

use serde::{Deserialize, Serialize};

use crate::diagnostics::population_std_dev;
use crate::swarm::state::SwarmState;

/// Number of trailing snapshots [`HistoryDelta`] inspects
pub const HISTORY_WINDOW: usize = 10;

/// Consecutive-snapshot deltas averaged by [`HistoryDelta`]
const HISTORY_DELTAS: usize = 8;

/// Minimum number of particles [`StandardDeviationOfBest`] ranks
const MIN_RANKED: usize = 3;

/// Stopping criterion trait
pub trait StoppingCriterion: Send + Sync {
    /// Check whether the swarm may stop
    fn can_stop(&self, state: &SwarmState) -> bool;

    /// Get a description of the criterion
    fn reason(&self) -> &'static str;
}

/// Stop when the best personal bests agree
///
/// Ranks particles by personal best, takes the top `max(dimension, 3)` of
/// them (capped at the swarm size) and stops when the population standard
/// deviation of their fitness falls below the acceptance error.
#[derive(Clone, Debug)]
pub struct StandardDeviationOfBest {
    /// Threshold for the standard deviation
    pub acceptance_error: f64,
}

impl StandardDeviationOfBest {
    pub fn new(acceptance_error: f64) -> Self {
        Self { acceptance_error }
    }

    /// Number of particles inspected for a given swarm
    pub fn sample_size(state: &SwarmState) -> usize {
        state.dimension().max(MIN_RANKED).min(state.num_particles())
    }
}

impl StoppingCriterion for StandardDeviationOfBest {
    fn can_stop(&self, state: &SwarmState) -> bool {
        let n = Self::sample_size(state);
        let ranked = state.ranked_best_fitness();
        population_std_dev(&ranked[..n]) < self.acceptance_error
    }

    fn reason(&self) -> &'static str {
        "Standard deviation of the best personal bests below acceptance error"
    }
}

/// Stop when the global best has stalled over the recent history
///
/// Needs at least ten epoch snapshots. Takes the last ten and averages the
/// absolute change between each of the first eight and its successor.
#[derive(Clone, Debug)]
pub struct HistoryDelta {
    /// Threshold for the mean change
    pub acceptance_error: f64,
}

impl HistoryDelta {
    pub fn new(acceptance_error: f64) -> Self {
        Self { acceptance_error }
    }

    /// Mean absolute delta over the inspected window, if enough history exists
    pub fn mean_delta(state: &SwarmState) -> Option<f64> {
        let history = state.history();
        if history.len() < HISTORY_WINDOW {
            return None;
        }

        let start = history.len() - HISTORY_WINDOW;
        let total: f64 = history[start..start + HISTORY_DELTAS + 1]
            .windows(2)
            .map(|w| (w[0].best_fitness - w[1].best_fitness).abs())
            .sum();
        Some(total / HISTORY_DELTAS as f64)
    }
}

impl StoppingCriterion for HistoryDelta {
    fn can_stop(&self, state: &SwarmState) -> bool {
        Self::mean_delta(state).is_some_and(|delta| delta < self.acceptance_error)
    }

    fn reason(&self) -> &'static str {
        "Mean change over the last epochs below acceptance error"
    }
}

/// Stop once a number of epochs has completed
#[derive(Clone, Debug)]
pub struct MaxIterations(pub usize);

impl MaxIterations {
    pub fn new(max_epochs: usize) -> Self {
        Self(max_epochs)
    }
}

impl StoppingCriterion for MaxIterations {
    fn can_stop(&self, state: &SwarmState) -> bool {
        state.epoch() >= self.0
    }

    fn reason(&self) -> &'static str {
        "Maximum epochs reached"
    }
}

/// Stop when the magnitude of the global best falls below the acceptance error
///
/// Suited to objectives whose optimum value is zero.
#[derive(Clone, Debug)]
pub struct AbsoluteFitness {
    /// Threshold for `|best fitness|`
    pub acceptance_error: f64,
}

impl AbsoluteFitness {
    pub fn new(acceptance_error: f64) -> Self {
        Self { acceptance_error }
    }
}

impl StoppingCriterion for AbsoluteFitness {
    fn can_stop(&self, state: &SwarmState) -> bool {
        state.has_solution() && state.best_fitness().abs() < self.acceptance_error
    }

    fn reason(&self) -> &'static str {
        "Best fitness magnitude below acceptance error"
    }
}

/// Conjunction of criteria (all must agree)
///
/// An empty or disabled set never stops.
pub struct AllOf {
    criteria: Vec<Box<dyn StoppingCriterion>>,
    enabled: bool,
}

impl AllOf {
    /// Create an enabled conjunction
    pub fn new(criteria: Vec<Box<dyn StoppingCriterion>>) -> Self {
        Self {
            criteria,
            enabled: true,
        }
    }

    /// Create a conjunction that never stops
    pub fn disabled() -> Self {
        Self {
            criteria: Vec::new(),
            enabled: false,
        }
    }

    /// Enable or disable the conjunction
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Add a criterion
    pub fn push(&mut self, criterion: Box<dyn StoppingCriterion>) {
        self.criteria.push(criterion);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Descriptions of the configured criteria
    pub fn reasons(&self) -> Vec<&'static str> {
        self.criteria.iter().map(|c| c.reason()).collect()
    }
}

impl StoppingCriterion for AllOf {
    fn can_stop(&self, state: &SwarmState) -> bool {
        self.enabled && !self.criteria.is_empty() && self.criteria.iter().all(|c| c.can_stop(state))
    }

    fn reason(&self) -> &'static str {
        "All criteria met"
    }
}

impl std::fmt::Debug for AllOf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AllOf")
            .field("criteria", &self.reasons())
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// Serializable description of a built-in criterion
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoppingRule {
    /// [`StandardDeviationOfBest`]
    StandardDeviationOfBest,
    /// [`HistoryDelta`]
    HistoryDelta,
    /// [`MaxIterations`]
    MaxIterations {
        /// Epoch ceiling
        max_epochs: usize,
    },
    /// [`AbsoluteFitness`]
    AbsoluteFitness,
}

impl StoppingRule {
    /// Rules installed when none are configured explicitly
    pub fn defaults() -> Vec<Self> {
        vec![Self::StandardDeviationOfBest, Self::HistoryDelta]
    }

    /// Instantiate the criterion
    pub fn build(&self, acceptance_error: f64) -> Box<dyn StoppingCriterion> {
        match self {
            Self::StandardDeviationOfBest => Box::new(StandardDeviationOfBest::new(acceptance_error)),
            Self::HistoryDelta => Box::new(HistoryDelta::new(acceptance_error)),
            Self::MaxIterations { max_epochs } => Box::new(MaxIterations::new(*max_epochs)),
            Self::AbsoluteFitness => Box::new(AbsoluteFitness::new(acceptance_error)),
        }
    }
}

pub mod prelude {
    pub use super::{
        AbsoluteFitness, AllOf, HistoryDelta, MaxIterations, StandardDeviationOfBest,
        StoppingCriterion, StoppingRule, HISTORY_WINDOW,
    };
}
