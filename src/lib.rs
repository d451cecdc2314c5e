//! # simplex-swarm
//!
//! Derivative-free optimization over bounded real vector spaces.
//!
//! The core is a particle swarm that can periodically refine its best
//! members with a Nelder-Mead simplex search. The simplex minimizer is also
//! usable on its own, from a single guess or from many starting points
//! spread by the Hammersley low-discrepancy sequence.
//!
//! ## Core Concepts
//!
//! - **One engine, two directions**: minimization and maximization share the
//!   same epoch loop, parameterized by a [`Direction`](swarm::Direction)
//! - **Hybrid refinement**: elite particles seed local simplex searches
//! - **Pluggable stopping**: criteria are combined by conjunction and can be
//!   switched off to run the full epoch budget
//! - **Reproducible runs**: every random draw goes through a seedable
//!   [`RandomEngine`](random::RandomEngine)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use simplex_swarm::prelude::*;
//!
//! let config = SwarmConfig::builder()
//!     .lower_bound(vec![-5.0; 4])
//!     .upper_bound(vec![5.0; 4])
//!     .num_particles(60)
//!     .max_epochs(300)
//!     .seed(42)
//!     .build()?;
//!
//! let result = ParticleSwarm::hybrid(Minimize, Rosenbrock::new(4), config).solve()?;
//! println!("{}", result.summary());
//! ```

pub mod diagnostics;
pub mod error;
pub mod fitness;
pub mod random;
pub mod simplex;
pub mod space;
pub mod swarm;
pub mod termination;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::diagnostics::prelude::*;
    pub use crate::error::*;
    pub use crate::fitness::prelude::*;
    pub use crate::random::prelude::*;
    pub use crate::simplex::prelude::*;
    pub use crate::space::prelude::*;
    pub use crate::swarm::prelude::*;
    pub use crate::termination::prelude::*;
}
