//! Swarm configuration
//!
//! [`SwarmConfig`] is an immutable, validated value. Build it with
//! [`SwarmConfigBuilder`], the [`SwarmConfig::create_default`] factory, or
//! load it from JSON; every path runs the same validation.

use serde::{Deserialize, Serialize};

use crate::error::{OptResult, OptimizationError};
use crate::random::EngineKind;
use crate::space::bounds::MultiBounds;
use crate::termination::StoppingRule;

/// Default acceptance error for stopping criteria
pub const DEFAULT_ACCEPTANCE_ERROR: f64 = 1e-9;

/// Velocity update weights
///
/// Defaults are the constriction-factor values ω = 0.729 and
/// φp = φg = 1.49445.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    /// Inertia weight ω
    pub inertia: f64,
    /// Cognitive weight φp (pull towards the personal best)
    pub cognitive: f64,
    /// Social weight φg (pull towards the global best)
    pub social: f64,
}

impl Coefficients {
    pub fn new(inertia: f64, cognitive: f64, social: f64) -> Self {
        Self {
            inertia,
            cognitive,
            social,
        }
    }

    fn validate(&self) -> OptResult<()> {
        let named = [
            ("inertia", self.inertia),
            ("cognitive", self.cognitive),
            ("social", self.social),
        ];
        for (name, value) in named {
            if !value.is_finite() {
                return Err(OptimizationError::Configuration(format!(
                    "{name} coefficient must be finite, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for Coefficients {
    fn default() -> Self {
        Self::new(0.729, 1.49445, 1.49445)
    }
}

fn default_acceptance_error() -> f64 {
    DEFAULT_ACCEPTANCE_ERROR
}

fn default_refine_every() -> usize {
    1
}

/// Particle swarm configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SwarmConfig {
    bounds: MultiBounds,
    num_particles: usize,
    max_epochs: usize,
    #[serde(default = "default_acceptance_error")]
    acceptance_error: f64,
    #[serde(default)]
    coefficients: Coefficients,
    #[serde(default)]
    engine: EngineKind,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    stopping_enabled: bool,
    #[serde(default = "StoppingRule::defaults")]
    stopping_rules: Vec<StoppingRule>,
    #[serde(default)]
    parallel: bool,
    #[serde(default = "default_refine_every")]
    refine_every: usize,
}

impl SwarmConfig {
    /// Create a configuration with default coefficients and engine
    ///
    /// Stopping criteria are configured with the default rules but disabled,
    /// so the solve runs the full epoch budget.
    pub fn create_default(
        num_particles: usize,
        max_epochs: usize,
        lower: &[f64],
        upper: &[f64],
        acceptance_error: f64,
    ) -> OptResult<Self> {
        SwarmConfigBuilder::new()
            .num_particles(num_particles)
            .max_epochs(max_epochs)
            .lower_bound(lower.to_vec())
            .upper_bound(upper.to_vec())
            .acceptance_error(acceptance_error)
            .build()
    }

    /// Start a builder
    pub fn builder() -> SwarmConfigBuilder {
        SwarmConfigBuilder::new()
    }

    /// Check every invariant of the configuration
    pub fn validate(&self) -> OptResult<()> {
        self.bounds.validate()?;
        if self.num_particles == 0 {
            return Err(OptimizationError::Configuration(
                "number of particles must be at least 1".to_string(),
            ));
        }
        if !(self.acceptance_error >= 0.0 && self.acceptance_error.is_finite()) {
            return Err(OptimizationError::Configuration(format!(
                "acceptance error must be non-negative and finite, got {}",
                self.acceptance_error
            )));
        }
        if self.refine_every == 0 {
            return Err(OptimizationError::Configuration(
                "refinement period must be at least 1".to_string(),
            ));
        }
        self.coefficients.validate()
    }

    /// Load and validate a configuration from JSON
    pub fn from_json(json: &str) -> OptResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> OptResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Search space
    pub fn bounds(&self) -> &MultiBounds {
        &self.bounds
    }

    /// Problem dimensionality
    pub fn dimension(&self) -> usize {
        self.bounds.dimension()
    }

    pub fn num_particles(&self) -> usize {
        self.num_particles
    }

    pub fn max_epochs(&self) -> usize {
        self.max_epochs
    }

    /// Threshold handed to the stopping criteria
    pub fn acceptance_error(&self) -> f64 {
        self.acceptance_error
    }

    pub fn coefficients(&self) -> &Coefficients {
        &self.coefficients
    }

    /// Random engine implementation
    pub fn engine(&self) -> EngineKind {
        self.engine
    }

    /// Seed for the random engine; `None` means unseeded
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn stopping_enabled(&self) -> bool {
        self.stopping_enabled
    }

    pub fn stopping_rules(&self) -> &[StoppingRule] {
        &self.stopping_rules
    }

    /// Whether particles are evaluated on worker threads
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Epochs between local refinement passes
    pub fn refine_every(&self) -> usize {
        self.refine_every
    }
}

/// Builder for [`SwarmConfig`]
#[derive(Clone, Debug)]
pub struct SwarmConfigBuilder {
    bounds: Option<MultiBounds>,
    lower: Option<Vec<f64>>,
    upper: Option<Vec<f64>>,
    num_particles: Option<usize>,
    max_epochs: Option<usize>,
    acceptance_error: f64,
    coefficients: Coefficients,
    engine: EngineKind,
    seed: Option<u64>,
    stopping_enabled: bool,
    stopping_rules: Option<Vec<StoppingRule>>,
    parallel: bool,
    refine_every: usize,
}

impl SwarmConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            bounds: None,
            lower: None,
            upper: None,
            num_particles: None,
            max_epochs: None,
            acceptance_error: DEFAULT_ACCEPTANCE_ERROR,
            coefficients: Coefficients::default(),
            engine: EngineKind::default(),
            seed: None,
            stopping_enabled: false,
            stopping_rules: None,
            parallel: false,
            refine_every: 1,
        }
    }

    /// Set the search space
    pub fn bounds(mut self, bounds: MultiBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Set the lower corner of the search box
    pub fn lower_bound(mut self, lower: Vec<f64>) -> Self {
        self.lower = Some(lower);
        self
    }

    /// Set the upper corner of the search box
    pub fn upper_bound(mut self, upper: Vec<f64>) -> Self {
        self.upper = Some(upper);
        self
    }

    /// Set the number of particles
    pub fn num_particles(mut self, n: usize) -> Self {
        self.num_particles = Some(n);
        self
    }

    /// Set the epoch budget
    pub fn max_epochs(mut self, n: usize) -> Self {
        self.max_epochs = Some(n);
        self
    }

    /// Set the stopping criteria threshold
    pub fn acceptance_error(mut self, error: f64) -> Self {
        self.acceptance_error = error;
        self
    }

    /// Set all velocity weights
    pub fn coefficients(mut self, coefficients: Coefficients) -> Self {
        self.coefficients = coefficients;
        self
    }

    /// Set the inertia weight
    pub fn inertia(mut self, inertia: f64) -> Self {
        self.coefficients.inertia = inertia;
        self
    }

    /// Set the cognitive weight
    pub fn cognitive(mut self, cognitive: f64) -> Self {
        self.coefficients.cognitive = cognitive;
        self
    }

    /// Set the social weight
    pub fn social(mut self, social: f64) -> Self {
        self.coefficients.social = social;
        self
    }

    /// Set the random engine implementation
    pub fn engine(mut self, engine: EngineKind) -> Self {
        self.engine = engine;
        self
    }

    /// Seed the random engine
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable or disable early stopping
    pub fn stopping_enabled(mut self, enabled: bool) -> Self {
        self.stopping_enabled = enabled;
        self
    }

    /// Add a stopping rule, replacing the defaults on first use
    pub fn stopping_rule(mut self, rule: StoppingRule) -> Self {
        self.stopping_rules.get_or_insert_with(Vec::new).push(rule);
        self
    }

    /// Set the full list of stopping rules
    pub fn stopping_rules(mut self, rules: Vec<StoppingRule>) -> Self {
        self.stopping_rules = Some(rules);
        self
    }

    /// Evaluate particles on worker threads
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the number of epochs between local refinement passes
    pub fn refine_every(mut self, epochs: usize) -> Self {
        self.refine_every = epochs;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> OptResult<SwarmConfig> {
        let bounds = match (self.bounds, self.lower, self.upper) {
            (Some(bounds), None, None) => bounds,
            (None, Some(lower), Some(upper)) => MultiBounds::from_slices(&lower, &upper)?,
            (Some(_), _, _) => {
                return Err(OptimizationError::Configuration(
                    "bounds and lower/upper corners are mutually exclusive".to_string(),
                ))
            }
            _ => {
                return Err(OptimizationError::Configuration(
                    "bounds must be specified".to_string(),
                ))
            }
        };

        let num_particles = self.num_particles.ok_or_else(|| {
            OptimizationError::Configuration("number of particles must be specified".to_string())
        })?;
        let max_epochs = self.max_epochs.ok_or_else(|| {
            OptimizationError::Configuration("max epochs must be specified".to_string())
        })?;

        let config = SwarmConfig {
            bounds,
            num_particles,
            max_epochs,
            acceptance_error: self.acceptance_error,
            coefficients: self.coefficients,
            engine: self.engine,
            seed: self.seed,
            stopping_enabled: self.stopping_enabled,
            stopping_rules: self.stopping_rules.unwrap_or_else(StoppingRule::defaults),
            parallel: self.parallel,
            refine_every: self.refine_every,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for SwarmConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpaceError;

    #[test]
    fn test_create_default() {
        let config =
            SwarmConfig::create_default(50, 100, &[-10.0, -10.0], &[10.0, 10.0], 1e-9).unwrap();
        assert_eq!(config.dimension(), 2);
        assert_eq!(config.num_particles(), 50);
        assert_eq!(config.max_epochs(), 100);
        assert_eq!(config.acceptance_error(), 1e-9);
        assert_eq!(config.coefficients(), &Coefficients::default());
        assert_eq!(config.engine(), EngineKind::Default);
        assert_eq!(config.seed(), None);
        assert!(!config.stopping_enabled());
        assert_eq!(config.stopping_rules(), StoppingRule::defaults().as_slice());
        assert_eq!(config.refine_every(), 1);
    }

    #[test]
    fn test_default_coefficients() {
        let c = Coefficients::default();
        assert_eq!(c.inertia, 0.729);
        assert_eq!(c.cognitive, 1.49445);
        assert_eq!(c.social, 1.49445);
    }

    #[test]
    fn test_mismatched_corners() {
        let err = SwarmConfig::create_default(10, 10, &[0.0, 0.0], &[1.0], 1e-9).unwrap_err();
        assert_eq!(
            err,
            OptimizationError::Space(SpaceError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_inverted_bound() {
        let err = SwarmConfig::create_default(10, 10, &[0.0, 5.0], &[1.0, 4.0], 1e-9).unwrap_err();
        assert!(matches!(
            err,
            OptimizationError::Space(SpaceError::InvalidBounds { index: 1, .. })
        ));
    }

    #[test]
    fn test_missing_fields() {
        let err = SwarmConfigBuilder::new().num_particles(5).max_epochs(5).build();
        assert_eq!(
            err,
            Err(OptimizationError::Configuration(
                "bounds must be specified".to_string()
            ))
        );

        let err = SwarmConfig::builder()
            .bounds(MultiBounds::symmetric(1.0, 2))
            .max_epochs(5)
            .build();
        assert!(matches!(err, Err(OptimizationError::Configuration(_))));
    }

    #[test]
    fn test_invalid_values() {
        let base = || {
            SwarmConfig::builder()
                .bounds(MultiBounds::symmetric(1.0, 2))
                .num_particles(5)
                .max_epochs(5)
        };
        assert!(base().build().is_ok());
        assert!(base().num_particles(0).build().is_err());
        assert!(base().acceptance_error(-1.0).build().is_err());
        assert!(base().inertia(f64::NAN).build().is_err());
        assert!(base().refine_every(0).build().is_err());
        assert!(base()
            .lower_bound(vec![0.0, 0.0])
            .upper_bound(vec![1.0, 1.0])
            .build()
            .is_err());
    }

    #[test]
    fn test_stopping_rule_replaces_defaults() {
        let config = SwarmConfig::builder()
            .bounds(MultiBounds::symmetric(1.0, 1))
            .num_particles(5)
            .max_epochs(5)
            .stopping_rule(StoppingRule::AbsoluteFitness)
            .build()
            .unwrap();
        assert_eq!(config.stopping_rules(), &[StoppingRule::AbsoluteFitness]);
    }

    #[test]
    fn test_json_round_trip_with_defaults() {
        let json = r#"{
            "bounds": { "bounds": [ { "min": -20.0, "max": 10.0 }, { "min": -20.0, "max": 10.0 } ] },
            "num_particles": 500,
            "max_epochs": 1000,
            "engine": "mersenne_twister",
            "seed": 7
        }"#;
        let config = SwarmConfig::from_json(json).unwrap();
        assert_eq!(config.acceptance_error(), DEFAULT_ACCEPTANCE_ERROR);
        assert_eq!(config.engine(), EngineKind::MersenneTwister);
        assert_eq!(config.seed(), Some(7));
        assert_eq!(config.stopping_rules(), StoppingRule::defaults().as_slice());

        let back = SwarmConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_json_validates() {
        let json = r#"{
            "bounds": { "bounds": [ { "min": 1.0, "max": 0.0 } ] },
            "num_particles": 5,
            "max_epochs": 5
        }"#;
        assert!(matches!(
            SwarmConfig::from_json(json),
            Err(OptimizationError::Space(SpaceError::InvalidBounds { .. }))
        ));
        assert!(matches!(
            SwarmConfig::from_json("{"),
            Err(OptimizationError::Serialization(_))
        ));
    }
}
