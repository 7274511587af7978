//! Gaussian (specific) sparks: multiplicative mutation of the parent.

use super::{check_dimensions, require_dimensions, require_parent, DimensionMask, SparkGenerator};
use crate::error::{FwaError, Result};
use crate::explode::Explosion;
use crate::model::{Dimension, Firework, FireworkId, FireworkType};
use rand::RngCore;
use rand_distr::{Distribution, Normal};

/// Creates specific sparks by scaling the parent's coordinates.
///
/// One factor `g` is drawn per spark from the configured distribution
/// (`N(1, 1)` by default) and multiplies the selected coordinates.
/// Coordinates leaving their range are wrapped back inside.
#[derive(Debug, Clone)]
pub struct GaussianSparkGenerator<D = Normal<f64>> {
    dimensions: Vec<Dimension>,
    mask: DimensionMask,
    distribution: D,
}

impl GaussianSparkGenerator<Normal<f64>> {
    /// The 2010 generator: `N(1, 1)`, coin-flipped dimensions.
    pub fn new(dimensions: Vec<Dimension>) -> Result<Self> {
        Self::with_mask(dimensions, DimensionMask::CoinFlip)
    }

    /// The 2012 generator: `N(1, 1)` applied to every dimension.
    pub fn all_dimensions(dimensions: Vec<Dimension>) -> Result<Self> {
        Self::with_mask(dimensions, DimensionMask::All)
    }

    pub fn with_mask(dimensions: Vec<Dimension>, mask: DimensionMask) -> Result<Self> {
        let normal = Normal::new(1.0, 1.0).map_err(|e| FwaError::InvalidArgument {
            name: "distribution",
            reason: e.to_string(),
        })?;
        Self::with_distribution(dimensions, mask, normal)
    }
}

impl<D> GaussianSparkGenerator<D>
where
    D: Distribution<f64> + Send + Sync,
{
    /// Uses a custom distribution for the scaling factor.
    pub fn with_distribution(dimensions: Vec<Dimension>, mask: DimensionMask, distribution: D) -> Result<Self> {
        require_dimensions(&dimensions)?;
        Ok(Self {
            dimensions,
            mask,
            distribution,
        })
    }
}

impl<D> SparkGenerator for GaussianSparkGenerator<D>
where
    D: Distribution<f64> + Send + Sync,
{
    fn spark_type(&self) -> FireworkType {
        FireworkType::SpecificSpark
    }

    fn create_spark(
        &self,
        explosion: &Explosion,
        id: FireworkId,
        rng: &mut dyn RngCore,
    ) -> Result<Firework> {
        let parent = require_parent("GaussianSparkGenerator", explosion)?;
        check_dimensions(&self.dimensions, parent.coordinates())?;

        let factor = self.distribution.sample(rng);
        let mut coordinates = parent.coordinates().to_vec();
        for (coordinate, dimension) in coordinates.iter_mut().zip(&self.dimensions) {
            if self.mask.selects(rng) {
                *coordinate = dimension.variation_range().wrap(*coordinate * factor);
            }
        }

        Ok(Firework::new(
            id,
            FireworkType::SpecificSpark,
            explosion.step_number(),
            coordinates,
        ))
    }
}
