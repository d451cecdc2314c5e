//! Concrete random engines

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::random::mt64::{Mt64, DEFAULT_SEED};
use crate::random::RandomEngine;

/// Platform pseudo-random source backed by [`StdRng`]
#[derive(Clone, Debug)]
pub struct DefaultEngine {
    rng: StdRng,
}

impl DefaultEngine {
    /// Create an engine, seeded for reproducibility or from OS entropy
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Create a seeded engine
    pub fn seeded(seed: u64) -> Self {
        Self::new(Some(seed))
    }
}

impl RandomEngine for DefaultEngine {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Engine backed by the 64-bit Mersenne Twister
#[derive(Clone, Debug)]
pub struct MersenneTwisterEngine {
    mt: Mt64,
}

impl MersenneTwisterEngine {
    /// Create an engine; unseeded engines use the reference seed 5489
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            mt: Mt64::new(seed.unwrap_or(DEFAULT_SEED)),
        }
    }

    /// Create a seeded engine
    pub fn seeded(seed: u64) -> Self {
        Self::new(Some(seed))
    }
}

impl Default for MersenneTwisterEngine {
    fn default() -> Self {
        Self::new(None)
    }
}

impl RandomEngine for MersenneTwisterEngine {
    fn next_f64(&mut self) -> f64 {
        self.mt.next_f64()
    }
}

/// Engine replaying a fixed list of deviates, wrapping around at the end
///
/// Lets tests pin every stochastic step of a solver.
#[derive(Clone, Debug)]
pub struct SequenceEngine {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceEngine {
    /// Create an engine cycling through `values`
    ///
    /// # Panics
    /// Panics if `values` is empty or contains a value outside [0, 1)
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "SequenceEngine needs at least one value");
        assert!(
            values.iter().all(|v| (0.0..1.0).contains(v)),
            "SequenceEngine values must lie in [0, 1)"
        );
        Self { values, cursor: 0 }
    }

    /// Engine that always returns the same deviate
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomEngine for SequenceEngine {
    fn next_f64(&mut self) -> f64 {
        let value = self.values[self.cursor];
        self.cursor = (self.cursor + 1) % self.values.len();
        value
    }
}
