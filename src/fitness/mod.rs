//! Objectives and benchmarks
//!
//! This module provides the objective abstraction and benchmark functions.

pub mod benchmarks;
pub mod traits;

pub mod prelude {
    pub use super::benchmarks::*;
    pub use super::traits::*;
}
