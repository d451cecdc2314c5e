//! Particle swarm optimization
//!
//! This module provides the swarm engine, its configuration and state, the
//! comparison directions and the local refinement strategies that turn the
//! plain swarm into the hybrid solver.

pub mod config;
pub mod direction;
pub mod engine;
pub mod particle;
pub mod refinement;
pub mod state;

pub use config::{Coefficients, SwarmConfig, SwarmConfigBuilder, DEFAULT_ACCEPTANCE_ERROR};
pub use direction::{Direction, Maximize, Minimize};
pub use engine::{ParticleSwarm, PositionHook};
pub use particle::Particle;
pub use refinement::{LocalRefinement, NoRefinement, RefinementOutcome, SimplexRefinement};
pub use state::{GlobalBest, Phase, SwarmState};

pub mod prelude {
    pub use super::{
        Coefficients, Direction, GlobalBest, LocalRefinement, Maximize, Minimize, NoRefinement,
        Particle, ParticleSwarm, Phase, RefinementOutcome, SimplexRefinement, SwarmConfig,
        SwarmConfigBuilder, SwarmState, DEFAULT_ACCEPTANCE_ERROR,
    };
}
