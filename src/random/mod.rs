//! Random engines
//!
//! The swarm draws every stochastic quantity through [`RandomEngine`], so the
//! concrete source can be swapped for a seeded generator or a fixed replay.

pub mod engines;
pub mod mt64;

use serde::{Deserialize, Serialize};

pub use engines::{DefaultEngine, MersenneTwisterEngine, SequenceEngine};
pub use mt64::Mt64;

/// Source of uniform deviates
pub trait RandomEngine: Send {
    /// Next deviate in [0, 1)
    fn next_f64(&mut self) -> f64;

    /// Next deviate scaled into [min, max)
    fn next_in_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }
}

impl<E: RandomEngine + ?Sized> RandomEngine for Box<E> {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }

    fn next_in_range(&mut self, min: f64, max: f64) -> f64 {
        (**self).next_in_range(min, max)
    }
}

/// Selectable engine implementations
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// [`DefaultEngine`]
    #[default]
    Default,
    /// [`MersenneTwisterEngine`]
    MersenneTwister,
}

impl EngineKind {
    /// Instantiate the engine, optionally seeded
    pub fn create(self, seed: Option<u64>) -> Box<dyn RandomEngine> {
        match self {
            Self::Default => Box::new(DefaultEngine::new(seed)),
            Self::MersenneTwister => Box::new(MersenneTwisterEngine::new(seed)),
        }
    }
}

pub mod prelude {
    pub use super::{
        DefaultEngine, EngineKind, MersenneTwisterEngine, Mt64, RandomEngine, SequenceEngine,
    };
}
