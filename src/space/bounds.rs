//! Box bounds for the search space
//!
//! This module provides the per-dimension and multi-dimensional bound types
//! that every solver in the crate clamps and samples against.

use serde::{Deserialize, Serialize};

use crate::error::SpaceError;

/// Bounds for a single dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower bound (inclusive)
    pub min: f64,
    /// Upper bound (inclusive)
    pub max: f64,
}

impl Bounds {
    /// Create new bounds
    ///
    /// # Panics
    /// Panics if min > max
    pub fn new(min: f64, max: f64) -> Self {
        assert!(
            min <= max,
            "Invalid bounds: min ({}) must be <= max ({})",
            min,
            max
        );
        Self { min, max }
    }

    /// Create new bounds, reporting an inverted or non-finite pair as an error
    pub fn try_new(min: f64, max: f64) -> Result<Self, SpaceError> {
        let bounds = Self { min, max };
        bounds.check(0)?;
        Ok(bounds)
    }

    /// Create symmetric bounds centered at 0
    pub fn symmetric(half_width: f64) -> Self {
        Self::new(-half_width, half_width)
    }

    /// Get the range (max - min)
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Get the center point
    pub fn center(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Check if a value is within bounds
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp a value to be within bounds
    ///
    /// NaN is pulled to the lower bound so a clamped coordinate is always inside.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    /// Denormalize a value from [0, 1] to bounds
    pub fn denormalize(&self, value: f64) -> f64 {
        self.min + value * self.range()
    }

    fn check(&self, index: usize) -> Result<(), SpaceError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(SpaceError::InvalidBounds {
                index,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

impl From<(f64, f64)> for Bounds {
    fn from((min, max): (f64, f64)) -> Self {
        Self::new(min, max)
    }
}

/// Multi-dimensional bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiBounds {
    /// Bounds for each dimension
    pub bounds: Vec<Bounds>,
}

impl MultiBounds {
    /// Create new multi-dimensional bounds
    pub fn new(bounds: Vec<Bounds>) -> Self {
        Self { bounds }
    }

    /// Create uniform bounds for all dimensions
    pub fn uniform(bound: Bounds, dimension: usize) -> Self {
        Self {
            bounds: vec![bound; dimension],
        }
    }

    /// Create symmetric bounds for all dimensions
    pub fn symmetric(half_width: f64, dimension: usize) -> Self {
        Self::uniform(Bounds::symmetric(half_width), dimension)
    }

    /// Build bounds from separate lower and upper vectors, validating them
    pub fn from_slices(lower: &[f64], upper: &[f64]) -> Result<Self, SpaceError> {
        if lower.len() != upper.len() {
            return Err(SpaceError::DimensionMismatch {
                expected: lower.len(),
                actual: upper.len(),
            });
        }
        let bounds = lower
            .iter()
            .zip(upper)
            .map(|(&min, &max)| Bounds { min, max })
            .collect();
        let multi = Self { bounds };
        multi.validate()?;
        Ok(multi)
    }

    /// Check that the space is non-empty and every pair satisfies min <= max
    pub fn validate(&self) -> Result<(), SpaceError> {
        if self.bounds.is_empty() {
            return Err(SpaceError::EmptySpace);
        }
        for (index, b) in self.bounds.iter().enumerate() {
            b.check(index)?;
        }
        Ok(())
    }

    /// Get number of dimensions
    pub fn dimension(&self) -> usize {
        self.bounds.len()
    }

    /// Get bounds for a specific dimension
    pub fn get(&self, index: usize) -> Option<&Bounds> {
        self.bounds.get(index)
    }

    /// Iterate over the per-dimension bounds
    pub fn iter(&self) -> impl Iterator<Item = &Bounds> {
        self.bounds.iter()
    }

    /// Lower bounds as a vector
    pub fn lower(&self) -> Vec<f64> {
        self.bounds.iter().map(|b| b.min).collect()
    }

    /// Upper bounds as a vector
    pub fn upper(&self) -> Vec<f64> {
        self.bounds.iter().map(|b| b.max).collect()
    }

    /// Per-dimension ranges scaled by `fraction`
    pub fn scaled_ranges(&self, fraction: f64) -> Vec<f64> {
        self.bounds.iter().map(|b| b.range() * fraction).collect()
    }

    /// Clamp a vector to be within bounds
    pub fn clamp_vec(&self, values: &mut [f64]) {
        for (value, b) in values.iter_mut().zip(&self.bounds) {
            *value = b.clamp(*value);
        }
    }

    /// Check if all values are within bounds
    pub fn contains_vec(&self, values: &[f64]) -> bool {
        values.len() == self.bounds.len()
            && values.iter().zip(&self.bounds).all(|(&v, b)| b.contains(v))
    }

    /// Ensure `values` has this space's dimensionality
    pub fn check_dimension(&self, values: &[f64]) -> Result<(), SpaceError> {
        if values.len() != self.bounds.len() {
            return Err(SpaceError::DimensionMismatch {
                expected: self.bounds.len(),
                actual: values.len(),
            });
        }
        Ok(())
    }
}

impl FromIterator<Bounds> for MultiBounds {
    fn from_iter<I: IntoIterator<Item = Bounds>>(iter: I) -> Self {
        Self {
            bounds: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<(f64, f64)> for MultiBounds {
    fn from_iter<I: IntoIterator<Item = (f64, f64)>>(iter: I) -> Self {
        Self {
            bounds: iter.into_iter().map(Bounds::from).collect(),
        }
    }
}
