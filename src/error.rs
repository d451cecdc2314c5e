//! Error types for simplex-swarm
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Error type for search-space problems (bounds, dimensionality, sampling)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpaceError {
    /// Two vectors that must share a dimensionality do not
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A bound pair is inverted or not finite
    #[error("Invalid bounds at dimension {index}: min ({min}) must be <= max ({max})")]
    InvalidBounds { index: usize, min: f64, max: f64 },

    /// The search space has no dimensions
    #[error("Search space must have at least one dimension")]
    EmptySpace,

    /// Low-discrepancy sampling was asked for more dimensions than it has prime bases
    #[error("Dimension {requested} exceeds the {available} prime bases available")]
    DimensionOutOfRange { requested: usize, available: usize },
}

/// Top-level error type for optimization runs
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OptimizationError {
    /// Search-space error
    #[error("Search space error: {0}")]
    Space(#[from] SpaceError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A best-of query was made before any candidate was recorded
    #[error("No solutions have been found")]
    NoSolution,

    /// Configuration or result (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for OptimizationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for optimization operations
pub type OptResult<T> = Result<T, OptimizationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_error_display() {
        let err = SpaceError::DimensionMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(err.to_string(), "Dimension mismatch: expected 3, got 2");

        let err = SpaceError::InvalidBounds {
            index: 1,
            min: 5.0,
            max: -5.0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid bounds at dimension 1: min (5) must be <= max (-5)"
        );

        let err = SpaceError::DimensionOutOfRange {
            requested: 21,
            available: 20,
        };
        assert_eq!(
            err.to_string(),
            "Dimension 21 exceeds the 20 prime bases available"
        );
    }

    #[test]
    fn test_optimization_error_from_space_error() {
        let err: OptimizationError = SpaceError::EmptySpace.into();
        assert!(matches!(err, OptimizationError::Space(SpaceError::EmptySpace)));
    }

    #[test]
    fn test_optimization_error_display() {
        assert_eq!(
            OptimizationError::NoSolution.to_string(),
            "No solutions have been found"
        );
        assert_eq!(
            OptimizationError::Configuration("particle count must be positive".to_string())
                .to_string(),
            "Invalid configuration: particle count must be positive"
        );
    }

    #[test]
    fn test_serialization_error_from_json() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{ not json");
        let err: OptimizationError = parse.unwrap_err().into();
        assert!(matches!(err, OptimizationError::Serialization(_)));
    }
}
