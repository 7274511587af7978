//! Explosion sparks: uniform displacement within the amplitude.

use super::{check_dimensions, mismatch, require_dimensions, DimensionMask, SparkGenerator};
use crate::error::Result;
use crate::explode::{Explosion, ExplosionKind};
use crate::model::{Dimension, Firework, FireworkId, FireworkType};
use rand::{Rng, RngCore};

/// Creates explosion sparks around a parent firework.
///
/// One offset `A · U(-1, 1)` is drawn per spark and added to the selected
/// dimensions of the parent. Coordinates leaving their range are wrapped
/// back inside.
#[derive(Debug, Clone)]
pub struct ExplosionSparkGenerator {
    dimensions: Vec<Dimension>,
    mask: DimensionMask,
}

impl ExplosionSparkGenerator {
    /// The 2010 generator: each dimension is displaced with probability 1/2.
    pub fn new(dimensions: Vec<Dimension>) -> Result<Self> {
        Self::with_mask(dimensions, DimensionMask::CoinFlip)
    }

    /// The 2012 generator: every dimension is displaced by the same offset.
    pub fn all_dimensions(dimensions: Vec<Dimension>) -> Result<Self> {
        Self::with_mask(dimensions, DimensionMask::All)
    }

    pub fn with_mask(dimensions: Vec<Dimension>, mask: DimensionMask) -> Result<Self> {
        require_dimensions(&dimensions)?;
        Ok(Self { dimensions, mask })
    }

    pub fn mask(&self) -> DimensionMask {
        self.mask
    }
}

impl SparkGenerator for ExplosionSparkGenerator {
    fn spark_type(&self) -> FireworkType {
        FireworkType::ExplosionSpark
    }

    fn create_spark(
        &self,
        explosion: &Explosion,
        id: FireworkId,
        rng: &mut dyn RngCore,
    ) -> Result<Firework> {
        let ExplosionKind::Firework { parent, amplitude } = explosion.kind() else {
            return Err(mismatch("ExplosionSparkGenerator", "firework", explosion));
        };
        check_dimensions(&self.dimensions, parent.coordinates())?;

        let offset = amplitude * rng.random_range(-1.0..1.0);
        let mut coordinates = parent.coordinates().to_vec();
        for (coordinate, dimension) in coordinates.iter_mut().zip(&self.dimensions) {
            if self.mask.selects(rng) {
                *coordinate = dimension.variation_range().wrap(*coordinate + offset);
            }
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

    fn explosion(coordinates: Vec<f64>, amplitude: f64, count: usize) -> Explosion {
        let counts = SparkCounts::from([(FireworkType::ExplosionSpark, count)]);
        Explosion::firework(parent(coordinates), 2, amplitude, counts).unwrap()
    }

    #[test]
    fn test_sparks_stay_within_amplitude() {
        let dims = dimensions(3);
        let generator = ExplosionSparkGenerator::new(dims.clone()).unwrap();
        let explosion = explosion(vec![1.0, 2.0, 3.0], 0.5, 200);
        let mut rng = StdRng::seed_from_u64(42);
        let sparks = generator
            .create_sparks(&explosion, &mut FireworkIds::new(), &mut rng)
            .unwrap();

        for spark in &sparks {
            for (c, p) in spark.coordinates().iter().zip([1.0, 2.0, 3.0]) {
                assert!((c - p).abs() <= 0.5 + 1e-12);
            }
            assert!(!spark.is_evaluated());
            assert_in_range(&dims, spark);
        }
    }

    #[test]
    fn test_single_offset_shared_by_all_dimensions() {
        let generator = ExplosionSparkGenerator::all_dimensions(dimensions(4)).unwrap();
        let explosion = explosion(vec![0.0; 4], 1.0, 1);
        let mut rng = StdRng::seed_from_u64(3);
        let spark = generator.create_spark(&explosion, FireworkId(0), &mut rng).unwrap();

        let first = spark.coordinates()[0];
        assert!(spark.coordinates().iter().all(|&c| (c - first).abs() < 1e-12));
    }

    #[test]
    fn test_coin_flip_leaves_some_dimensions_untouched() {
        let generator = ExplosionSparkGenerator::new(dimensions(10)).unwrap();
        let explosion = explosion(vec![0.0; 10], 5.0, 50);
        let mut rng = StdRng::seed_from_u64(11);
        let sparks = generator
            .create_sparks(&explosion, &mut FireworkIds::new(), &mut rng)
            .unwrap();

        let untouched = sparks
            .iter()
            .flat_map(|s| s.coordinates().iter())
            .filter(|&&c| c == 0.0)
            .count();
        assert!(untouched > 100, "expected about half untouched, got {untouched}/500");
    }

    #[test]
    fn test_out_of_range_wraps() {
        let dims = dimensions(2);
        let generator = ExplosionSparkGenerator::all_dimensions(dims.clone()).unwrap();
        let explosion = explosion(vec![9.9, -9.9], 500.0, 100);
        let mut rng = StdRng::seed_from_u64(5);
        let sparks = generator
            .create_sparks(&explosion, &mut FireworkIds::new(), &mut rng)
            .unwrap();
        for spark in &sparks {
            assert_in_range(&dims, spark);
        }
    }

    #[test]
    fn test_rejects_other_explosions() {
        let generator = ExplosionSparkGenerator::new(dimensions(1)).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let err = generator
            .create_spark(&Explosion::initial(0, 1), FireworkId(0), &mut rng)
            .unwrap_err();
        assert!(matches!(
            err,
            FwaError::ExplosionMismatch {
                found: "initial",
                ..
            }
        ));
    }

    #[test]
    fn test_requires_dimensions() {
        assert_eq!(
            ExplosionSparkGenerator::new(Vec::new()).unwrap_err(),
            FwaError::Empty("dimensions")
        );
    }

    proptest! {
        #[test]
        fn prop_sparks_always_in_range(
            seed: u64,
            x in -10.0f64..=10.0,
            y in -10.0f64..=10.0,
            amplitude in 0.0f64..1e4,
        ) {
            let dims = dimensions(2);
            let generator = ExplosionSparkGenerator::new(dims.clone()).unwrap();
            let explosion = explosion(vec![x, y], amplitude, 10);
            let mut rng = StdRng::seed_from_u64(seed);
            let sparks = generator
                .create_sparks(&explosion, &mut FireworkIds::new(), &mut rng)
                .unwrap();
            for spark in &sparks {
                for (dim, &c) in dims.iter().zip(spark.coordinates()) {
                    prop_assert!(dim.is_value_in_range(c));
                }
            }
        }
    }
}
