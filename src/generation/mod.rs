//! Spark generators.
//!
//! A [`SparkGenerator`] turns an [`Explosion`] into new, unevaluated
//! fireworks. Each generator produces one [`FireworkType`] and reads how many
//! sparks to create from the explosion's spark counts.
//!
//! # Generators
//!
//! - [`ExplosionSparkGenerator`]: uniform displacement by the amplitude
//!   (2010: coin-flipped dimensions; 2012: every dimension)
//! - [`GaussianSparkGenerator`]: multiplicative Gaussian mutation
//! - [`EnhancedExplosionSparkGenerator`]: per-dimension amplitudes with
//!   uniform reseeding of out-of-range coordinates
//! - [`AttractRepulseSparkGenerator`]: scaling around the best solution
//! - [`InitialSparkGenerator`]: uniform seeding of the first population
//! - [`EliteStrategyGenerator`]: landscape approximation by curve fitting
//!
//! # Boundary policy
//!
//! Every coordinate a generator emits lies in its dimension's variation
//! range. Displacement-based generators wrap escaped values back with
//! [`Range::wrap`](crate::model::Range::wrap); the enhanced generator
//! reseeds them uniformly.
//!
//! # References
//!
//! - Tan & Zhu (2010), "Fireworks Algorithm for Optimization"
//! - Pei, Zheng, Tan & Takagi (2012), "An Empirical Study on Influence of
//!   Approximation Approaches on Enhancing Fireworks Algorithm"
//! - Zheng, Janecek & Tan (2013), "Enhanced Fireworks Algorithm"
//! - Ding, Zheng & Tan (2013), "GPU-based Parallel Fireworks Algorithm for
//!   Optimization" (attract-repulse mutation)

mod attract_repulse;
mod elite;
mod enhanced;
mod explosion;
mod gaussian;
mod initial;

pub use attract_repulse::AttractRepulseSparkGenerator;
pub use elite::{EliteStrategy, EliteStrategyGenerator};
pub use enhanced::EnhancedExplosionSparkGenerator;
pub use explosion::ExplosionSparkGenerator;
pub use gaussian::GaussianSparkGenerator;
pub use initial::InitialSparkGenerator;

use crate::error::{FwaError, Result};
use crate::explode::Explosion;
use crate::model::{Dimension, Firework, FireworkId, FireworkIds, FireworkType, Solution};
use rand::{Rng, RngCore};

/// Produces sparks of a single [`FireworkType`] from explosions.
pub trait SparkGenerator: Send + Sync {
    /// The type of the sparks this generator creates.
    fn spark_type(&self) -> FireworkType;

    /// Creates one spark.
    ///
    /// # Errors
    ///
    /// [`FwaError::ExplosionMismatch`] if the explosion variant is not one
    /// this generator handles.
    fn create_spark(
        &self,
        explosion: &Explosion,
        id: FireworkId,
        rng: &mut dyn RngCore,
    ) -> Result<Firework>;

    /// Creates as many sparks as the explosion requests for
    /// [`spark_type`](Self::spark_type); none if the type is absent.
    fn create_sparks(
        &self,
        explosion: &Explosion,
        ids: &mut FireworkIds,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Firework>> {
        let Some(count) = explosion.spark_count(self.spark_type()) else {
            return Ok(Vec::new());
        };

        let mut sparks = Vec::with_capacity(count);
        for _ in 0..count {
            sparks.push(self.create_spark(explosion, ids.issue()?, rng)?);
        }
        Ok(sparks)
    }

    /// Receives the best solution known at the start of a step.
    ///
    /// The default implementation ignores it.
    fn publish_best(&mut self, _best: &Solution) {}
}

/// Which dimensions a displacement touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DimensionMask {
    /// Each dimension is displaced with probability 1/2 (2010 paper).
    #[default]
    CoinFlip,
    /// Every dimension is displaced (2012 variant).
    All,
}

impl DimensionMask {
    fn selects(self, rng: &mut dyn RngCore) -> bool {
        match self {
            DimensionMask::CoinFlip => rng.random_bool(0.5),
            DimensionMask::All => true,
        }
    }
}

fn mismatch(generator: &'static str, expected: &'static str, explosion: &Explosion) -> FwaError {
    FwaError::ExplosionMismatch {
        generator,
        expected,
        found: explosion.kind().name(),
    }
}

/// Parent of an explosion that must have one.
fn require_parent<'a>(generator: &'static str, explosion: &'a Explosion) -> Result<&'a Firework> {
    explosion
        .parent()
        .ok_or_else(|| mismatch(generator, "firework", explosion))
}

fn check_dimensions(dimensions: &[Dimension], coordinates: &[f64]) -> Result<()> {
    if dimensions.len() != coordinates.len() {
        return Err(FwaError::DimensionMismatch {
            expected: dimensions.len(),
            actual: coordinates.len(),
        });
    }
    Ok(())
}

fn require_dimensions(dimensions: &[Dimension]) -> Result<()> {
    if dimensions.is_empty() {
        return Err(FwaError::Empty("dimensions"));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::model::{Dimension, Firework, FireworkId, FireworkType, Range};

    pub fn dimensions(count: usize) -> Vec<Dimension> {
        let range = Range::new(-10.0, 10.0).unwrap();
        (0..count).map(|_| Dimension::new(range)).collect()
    }

    pub fn parent(coordinates: Vec<f64>) -> Firework {
        Firework::with_quality(FireworkId(100), FireworkType::Initial, 0, coordinates, 1.0)
    }

    /// Asserts every coordinate lies in its dimension's range.
    pub fn assert_in_range(dimensions: &[Dimension], spark: &Firework) {
        for (dim, &c) in dimensions.iter().zip(spark.coordinates()) {
            assert!(
                dim.is_value_in_range(c),
                "coordinate {c} outside {}",
                dim.variation_range()
            );
        }
    }
}
