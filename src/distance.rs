//! Distance metrics over coordinate vectors.
//!
//! Selection strategies measure how far fireworks are from each other
//! through [`DistanceCalculator`], so the metric can be swapped without
//! touching selection logic.

use crate::error::{FwaError, Result};
use crate::model::{Firework, Solution};

/// A metric over coordinate vectors of equal length.
pub trait DistanceCalculator: Send + Sync {
    /// Distance between two coordinate vectors.
    ///
    /// # Errors
    ///
    /// [`FwaError::DimensionMismatch`] if the lengths differ.
    fn distance(&self, a: &[f64], b: &[f64]) -> Result<f64>;

    fn distance_between_solutions(&self, a: &Solution, b: &Solution) -> Result<f64> {
        self.distance(&a.coordinates, &b.coordinates)
    }

    fn distance_between(&self, a: &Firework, b: &Firework) -> Result<f64> {
        self.distance(a.coordinates(), b.coordinates())
    }
}

/// Standard L2 norm of the difference.
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanDistance;

impl DistanceCalculator for EuclideanDistance {
    fn distance(&self, a: &[f64], b: &[f64]) -> Result<f64> {
        if a.len() != b.len() {
            return Err(FwaError::DimensionMismatch {
                expected: a.len(),
                actual: b.len(),
            });
        }

        Ok(a.iter()
            .zip(b)
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
            .sqrt())
    }
}
