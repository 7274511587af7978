//! Enhanced explosion sparks with per-dimension amplitudes.

use super::{check_dimensions, mismatch, require_dimensions, DimensionMask, SparkGenerator};
use crate::error::Result;
use crate::explode::{Explosion, ExplosionKind};
use crate::model::{Dimension, Firework, FireworkId, FireworkType};
use rand::{Rng, RngCore};

/// Creates explosion sparks from an enhanced explosion.
///
/// Each selected dimension `k` is displaced by its own `A_k · U(-1, 1)`.
/// A coordinate that leaves its range is redrawn uniformly within it
/// (Zheng et al., 2013) instead of being wrapped.
#[derive(Debug, Clone)]
pub struct EnhancedExplosionSparkGenerator {
    dimensions: Vec<Dimension>,
}

impl EnhancedExplosionSparkGenerator {
    pub fn new(dimensions: Vec<Dimension>) -> Result<Self> {
        require_dimensions(&dimensions)?;
        Ok(Self { dimensions })
    }
}

impl SparkGenerator for EnhancedExplosionSparkGenerator {
    fn spark_type(&self) -> FireworkType {
        FireworkType::ExplosionSpark
    }

    fn create_spark(
        &self,
        explosion: &Explosion,
        id: FireworkId,
        rng: &mut dyn RngCore,
    ) -> Result<Firework> {
        let ExplosionKind::Enhanced { parent, amplitudes } = explosion.kind() else {
            return Err(mismatch(
                "EnhancedExplosionSparkGenerator",
                "enhanced firework",
                explosion,
            ));
        };
        check_dimensions(&self.dimensions, parent.coordinates())?;

        let mut coordinates = parent.coordinates().to_vec();
        for ((coordinate, dimension), amplitude) in
            coordinates.iter_mut().zip(&self.dimensions).zip(amplitudes)
        {
            if !DimensionMask::CoinFlip.selects(rng) {
                continue;
            }
            let range = dimension.variation_range();
            let moved = *coordinate + amplitude * rng.random_range(-1.0..1.0);
            *coordinate = if range.is_in_range(moved) {
                moved
            } else {
                range.sample_uniform(rng)
            };
        }

        Ok(Firework::new(
            id,
            FireworkType::ExplosionSpark,
            explosion.step_number(),
            coordinates,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::error::FwaError;
    use crate::explode::SparkCounts;
    use crate::model::FireworkIds;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn explosion(coordinates: Vec<f64>, amplitudes: Vec<f64>) -> Explosion {
        let counts = SparkCounts::from([(FireworkType::ExplosionSpark, 300)]);
        Explosion::enhanced(parent(coordinates), 1, amplitudes, counts).unwrap()
    }

    #[test]
    fn test_per_dimension_amplitudes() {
        let generator = EnhancedExplosionSparkGenerator::new(dimensions(2)).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let sparks = generator
            .create_sparks(
                &explosion(vec![0.0, 0.0], vec![0.1, 3.0]),
                &mut FireworkIds::new(),
                &mut rng,
            )
            .unwrap();

        assert_eq!(sparks.len(), 300);
        let max_first = sparks
            .iter()
            .map(|s| s.coordinates()[0].abs())
            .fold(0.0, f64::max);
        let max_second = sparks
            .iter()
            .map(|s| s.coordinates()[1].abs())
            .fold(0.0, f64::max);
        assert!(max_first <= 0.1);
        assert!(max_second > 1.0 && max_second <= 3.0);
    }

    #[test]
    fn test_escaped_coordinates_are_reseeded() {
        let dims = dimensions(3);
        let generator = EnhancedExplosionSparkGenerator::new(dims.clone()).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let sparks = generator
            .create_sparks(
                &explosion(vec![9.5, -9.5, 0.0], vec![1e3, 1e3, 1e3]),
                &mut FireworkIds::new(),
                &mut rng,
            )
            .unwrap();
        for spark in &sparks {
            assert_in_range(&dims, spark);
        }
    }

    #[test]
    fn test_requires_enhanced_explosion() {
        let generator = EnhancedExplosionSparkGenerator::new(dimensions(1)).unwrap();
        let plain = Explosion::firework(parent(vec![0.0]), 1, 1.0, SparkCounts::new()).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        assert!(matches!(
            generator.create_spark(&plain, FireworkId(0), &mut rng),
            Err(FwaError::ExplosionMismatch {
                expected: "enhanced firework",
                found: "firework",
                ..
            })
        ));
    }

    proptest! {
        #[test]
        fn prop_sparks_always_in_range(
            seed: u64,
            x in -10.0f64..=10.0,
            y in -10.0f64..=10.0,
            ax in 0.0f64..1e4,
            ay in 0.0f64..1e4,
        ) {
            let dims = dimensions(2);
            let generator = EnhancedExplosionSparkGenerator::new(dims.clone()).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            let sparks = generator
                .create_sparks(&explosion(vec![x, y], vec![ax, ay]), &mut FireworkIds::new(), &mut rng)
                .unwrap();
            for spark in &sparks {
                for (dim, &c) in dims.iter().zip(spark.coordinates()) {
                    prop_assert!(dim.is_value_in_range(c));
                }
            }
        }
    }
}
