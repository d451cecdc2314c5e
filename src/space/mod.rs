//! Search space
//!
//! This module provides box bounds and deterministic low-discrepancy sampling.

pub mod bounds;
pub mod hammersley;

pub mod prelude {
    pub use super::bounds::{Bounds, MultiBounds};
    pub use super::hammersley::{hammersley, hammersley_unit, radical_inverse, MAX_DIMENSION};
}
