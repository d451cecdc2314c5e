//! Diagnostics and run results
//!
//! This module provides per-epoch snapshots and the result record returned by
//! a swarm solve.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::OptResult;

/// Global best as recorded at the end of one epoch
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpochSnapshot {
    /// Epoch number, starting at 1
    pub epoch: usize,
    /// Objective evaluations so far
    pub evaluations: usize,
    /// Global best fitness
    pub best_fitness: f64,
    /// Global best position
    pub best_position: Vec<f64>,
}

/// Why a solve stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// Every configured stopping criterion agreed
    CriteriaMet,
    /// The epoch budget ran out first
    EpochBudgetExhausted,
}

impl TerminationReason {
    pub fn description(&self) -> &'static str {
        match self {
            Self::CriteriaMet => "stopping criteria met",
            Self::EpochBudgetExhausted => "epoch budget exhausted",
        }
    }
}

/// Result of a swarm solve
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SwarmResult {
    /// Best position found
    pub best_position: Vec<f64>,
    /// Fitness at the best position
    pub best_fitness: f64,
    /// Whether the best fitness is a finite value
    pub success: bool,
    /// Epochs completed
    pub epochs: usize,
    /// Objective evaluations spent, refinement included
    pub evaluations: usize,
    /// Why the solve stopped
    pub termination: TerminationReason,
    /// One snapshot per completed epoch
    pub history: Vec<EpochSnapshot>,
    /// Wall-clock time in milliseconds
    pub runtime_ms: f64,
}

impl SwarmResult {
    /// Set the runtime
    pub fn with_runtime(mut self, duration: Duration) -> Self {
        self.runtime_ms = duration.as_secs_f64() * 1000.0;
        self
    }

    /// Best fitness after each epoch
    pub fn best_fitness_history(&self) -> Vec<f64> {
        self.history.iter().map(|s| s.best_fitness).collect()
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> OptResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Get a summary of the run
    pub fn summary(&self) -> String {
        format!(
            "Swarm Summary:\n\
             - Epochs: {}\n\
             - Evaluations: {}\n\
             - Best fitness: {:.6}\n\
             - Best position: {:?}\n\
             - Runtime: {:.2}ms\n\
             - Termination: {}",
            self.epochs,
            self.evaluations,
            self.best_fitness,
            self.best_position,
            self.runtime_ms,
            self.termination.description()
        )
    }
}

/// Population standard deviation (divides by `n`)
///
/// Returns NaN for an empty slice.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

pub mod prelude {
    pub use super::{population_std_dev, EpochSnapshot, SwarmResult, TerminationReason};
}
