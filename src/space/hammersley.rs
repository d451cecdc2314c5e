//! Hammersley low-discrepancy sequence
//!
//! Deterministic point sets that cover a box more evenly than independent
//! uniform draws. The first coordinate is the fractional ladder `i / n`; every
//! further coordinate is the radical inverse of `i` in the next prime base.
//! Used to spread the starting points of multi-start local searches.

use crate::error::SpaceError;
use crate::space::bounds::MultiBounds;

/// Prime bases for the radical-inverse coordinates.
///
/// Index `j` is the base used for coordinate `j`; index 0 is never used since
/// the first coordinate is `i / n`. This caps the sequence at 20 dimensions.
pub const PRIMES: [u64; 20] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71,
];

/// Largest dimensionality the generator supports
pub const MAX_DIMENSION: usize = PRIMES.len();

/// Radical inverse of `n` in `base`: the base-`base` digits of `n` mirrored
/// around the radix point.
///
/// # Panics
///
/// Panics if `base < 2`.
pub fn radical_inverse(mut n: u64, base: u64) -> f64 {
    assert!(base >= 2, "radical inverse base must be at least 2, got {}", base);
    let inv_base = 1.0 / base as f64;
    let mut power = inv_base;
    let mut inverse = 0.0;

    while n > 0 {
        inverse += (n % base) as f64 * power;
        n /= base;
        power *= inv_base;
    }

    inverse
}

/// Generate `num_points` unscaled Hammersley points in `[0, 1)^dimension`
pub fn hammersley_unit(num_points: usize, dimension: usize) -> Result<Vec<Vec<f64>>, SpaceError> {
    if dimension == 0 {
        return Err(SpaceError::EmptySpace);
    }
    if dimension > MAX_DIMENSION {
        return Err(SpaceError::DimensionOutOfRange {
            requested: dimension,
            available: MAX_DIMENSION,
        });
    }

    let points = (0..num_points)
        .map(|i| {
            let mut point = Vec::with_capacity(dimension);
            point.push(i as f64 / num_points as f64);
            point.extend((1..dimension).map(|j| radical_inverse(i as u64, PRIMES[j])));
            point
        })
        .collect();

    Ok(points)
}

/// Generate `num_points` Hammersley points scaled into `bounds`
///
/// Fails with [`SpaceError::DimensionOutOfRange`] for more than 20 dimensions
/// and with [`SpaceError::InvalidBounds`] for an inverted bound pair.
pub fn hammersley(num_points: usize, bounds: &MultiBounds) -> Result<Vec<Vec<f64>>, SpaceError> {
    bounds.validate()?;

    let mut points = hammersley_unit(num_points, bounds.dimension())?;
    for point in &mut points {
        for (x, b) in point.iter_mut().zip(bounds.iter()) {
            *x = b.denormalize(*x);
        }
    }

    Ok(points)
}
