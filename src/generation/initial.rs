//! Initial population seeding.

use super::{mismatch, require_dimensions, SparkGenerator};
use crate::error::{FwaError, Result};
use crate::explode::{Explosion, ExplosionKind};
use crate::model::{Dimension, Firework, FireworkId, FireworkType, Range};
use rand::RngCore;

/// Creates the first population uniformly at random.
///
/// Each coordinate is drawn from the dimension's initial range, which may
/// be narrower than its variation range (asymmetric initialization).
#[derive(Debug, Clone)]
pub struct InitialSparkGenerator {
    dimensions: Vec<Dimension>,
    initial_ranges: Vec<Range>,
}

impl InitialSparkGenerator {
    /// Seeds from each dimension's variation range.
    pub fn new(dimensions: Vec<Dimension>) -> Result<Self> {
        let ranges = dimensions.iter().map(|d| *d.variation_range()).collect();
        Self::with_initial_ranges(dimensions, ranges)
    }

    /// Seeds from explicit initial ranges, one per dimension.
    ///
    /// # Errors
    ///
    /// - [`FwaError::DimensionMismatch`] if the counts differ
    /// - [`FwaError::InvalidArgument`] if a range is unbounded
    pub fn with_initial_ranges(dimensions: Vec<Dimension>, initial_ranges: Vec<Range>) -> Result<Self> {
        require_dimensions(&dimensions)?;
        if initial_ranges.len() != dimensions.len() {
            return Err(FwaError::DimensionMismatch {
                expected: dimensions.len(),
                actual: initial_ranges.len(),
            });
        }
        if let Some(range) = initial_ranges.iter().find(|r| !r.is_finite()) {
            return Err(FwaError::InvalidArgument {
                name: "initial_ranges",
                reason: format!("initial range {range} must be bounded"),
            });
        }

        Ok(Self {
            dimensions,
            initial_ranges,
        })
    }
}

impl SparkGenerator for InitialSparkGenerator {
    fn spark_type(&self) -> FireworkType {
        FireworkType::Initial
    }

    fn create_spark(
        &self,
        explosion: &Explosion,
        id: FireworkId,
        rng: &mut dyn RngCore,
    ) -> Result<Firework> {
        if !matches!(explosion.kind(), ExplosionKind::Initial) {
            return Err(mismatch("InitialSparkGenerator", "initial", explosion));
        }

        let coordinates = self
            .dimensions
            .iter()
            .zip(&self.initial_ranges)
            .map(|(dimension, range)| dimension.variation_range().wrap(range.sample_uniform(rng)))
            .collect();

        Ok(Firework::new(
            id,
            FireworkType::Initial,
            explosion.step_number(),
            coordinates,
        ))
    }
}
