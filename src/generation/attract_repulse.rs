//! Attract-repulse sparks (GPU-FWA mutation).

use super::{check_dimensions, require_dimensions, require_parent, DimensionMask, SparkGenerator};
use crate::error::{FwaError, Result};
use crate::explode::Explosion;
use crate::model::{Dimension, Firework, FireworkId, FireworkType, Solution};
use rand::distr::Uniform;
use rand::RngCore;
use rand_distr::Distribution;

/// Creates specific sparks by scaling a firework's offset from the best
/// solution.
///
/// A factor `s` is drawn per spark; every coin-flipped coordinate moves by
/// `(x - best) · s`. Positive factors push the spark away from the best
/// solution, negative factors (drawn when `delta > 1`) pull it toward it.
/// Escaped coordinates are wrapped.
///
/// The generator reads its own copy of the best solution, which the driver
/// refreshes through [`SparkGenerator::publish_best`] once per step.
#[derive(Debug, Clone)]
pub struct AttractRepulseSparkGenerator<D = Uniform<f64>> {
    dimensions: Vec<Dimension>,
    distribution: D,
    best: Option<Solution>,
}

impl AttractRepulseSparkGenerator<Uniform<f64>> {
    /// Scaling factors drawn from `U(1 - delta, 1 + delta)`.
    pub fn new(dimensions: Vec<Dimension>, delta: f64) -> Result<Self> {
        if !delta.is_finite() || delta <= 0.0 {
            return Err(FwaError::InvalidArgument {
                name: "delta",
                reason: format!("must be positive and finite, got {delta}"),
            });
        }
        let uniform = Uniform::new(1.0 - delta, 1.0 + delta).map_err(|e| FwaError::InvalidArgument {
            name: "delta",
            reason: e.to_string(),
        })?;
        Self::with_distribution(dimensions, uniform)
    }
}

impl<D> AttractRepulseSparkGenerator<D>
where
    D: Distribution<f64> + Send + Sync,
{
    pub fn with_distribution(dimensions: Vec<Dimension>, distribution: D) -> Result<Self> {
        require_dimensions(&dimensions)?;
        Ok(Self {
            dimensions,
            distribution,
            best: None,
        })
    }

    /// The best-solution snapshot currently used as the attractor.
    pub fn best(&self) -> Option<&Solution> {
        self.best.as_ref()
    }
}

impl<D> SparkGenerator for AttractRepulseSparkGenerator<D>
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
        let parent = require_parent("AttractRepulseSparkGenerator", explosion)?;
        check_dimensions(&self.dimensions, parent.coordinates())?;

        let best = self.best.as_ref().ok_or_else(|| FwaError::InvalidArgument {
            name: "best",
            reason: "no best solution has been published".into(),
        })?;
        check_dimensions(&self.dimensions, &best.coordinates)?;

        let factor = self.distribution.sample(rng);
        let mut coordinates = parent.coordinates().to_vec();
        for ((coordinate, dimension), &anchor) in coordinates
            .iter_mut()
            .zip(&self.dimensions)
            .zip(&best.coordinates)
        {
            if DimensionMask::CoinFlip.selects(rng) {
                let moved = *coordinate + (*coordinate - anchor) * factor;
                *coordinate = dimension.variation_range().wrap(moved);
            }
        }

        Ok(Firework::new(
            id,
            FireworkType::SpecificSpark,
            explosion.step_number(),
            coordinates,
        ))
    }

    fn publish_best(&mut self, best: &Solution) {
        self.best = Some(best.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::explode::SparkCounts;
    use crate::model::FireworkIds;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn explosion(coordinates: Vec<f64>) -> Explosion {
        let counts = SparkCounts::from([(FireworkType::SpecificSpark, 200)]);
        Explosion::firework(parent(coordinates), 1, 1.0, counts).unwrap()
    }

    #[test]
    fn test_requires_published_best() {
        let generator = AttractRepulseSparkGenerator::new(dimensions(2), 0.5).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            generator.create_spark(&explosion(vec![1.0, 1.0]), FireworkId(0), &mut rng),
            Err(FwaError::InvalidArgument { name: "best", .. })
        ));
    }

    /// Always yields the same factor.
    struct Fixed(f64);

    impl Distribution<f64> for Fixed {
        fn sample<R: rand::Rng + ?Sized>(&self, _: &mut R) -> f64 {
            self.0
        }
    }

    fn fixed_generator(factor: f64, best: Vec<f64>) -> AttractRepulseSparkGenerator<Fixed> {
        let mut generator =
            AttractRepulseSparkGenerator::with_distribution(dimensions(2), Fixed(factor)).unwrap();
        generator.publish_best(&Solution::new(best, 0.0));
        generator
    }

    #[test]
    fn test_moves_by_offset_times_factor() {
        let generator = fixed_generator(0.5, vec![0.0, 0.0]);
        let mut rng = StdRng::seed_from_u64(2);
        let sparks = generator
            .create_sparks(&explosion(vec![4.0, -4.0]), &mut FireworkIds::new(), &mut rng)
            .unwrap();

        for spark in &sparks {
            let c = spark.coordinates();
            assert!(c[0] == 4.0 || c[0] == 6.0, "got {}", c[0]);
            assert!(c[1] == -4.0 || c[1] == -6.0, "got {}", c[1]);
        }
        assert!(sparks.iter().any(|s| s.coordinates()[0] == 6.0));
    }

    #[test]
    fn test_negative_factor_attracts() {
        let generator = fixed_generator(-0.5, vec![1.0, 1.0]);
        let mut rng = StdRng::seed_from_u64(3);
        let sparks = generator
            .create_sparks(&explosion(vec![5.0, -3.0]), &mut FireworkIds::new(), &mut rng)
            .unwrap();

        for spark in &sparks {
            let c = spark.coordinates();
            assert!(c[0] == 5.0 || c[0] == 3.0, "got {}", c[0]);
            assert!(c[1] == -3.0 || c[1] == -1.0, "got {}", c[1]);
        }
    }

    #[test]
    fn test_escaped_coordinates_wrap() {
        // 8 + 8 * 1.0 = 16 wraps to -4 in [-10, 10]
        let generator = fixed_generator(1.0, vec![0.0, 0.0]);
        let mut rng = StdRng::seed_from_u64(4);
        let sparks = generator
            .create_sparks(&explosion(vec![8.0, 8.0]), &mut FireworkIds::new(), &mut rng)
            .unwrap();

        for spark in &sparks {
            assert_in_range(&dimensions(2), spark);
            for &c in spark.coordinates() {
                assert!(c == 8.0 || (c + 4.0).abs() < 1e-12, "got {c}");
            }
        }
    }

    #[test]
    fn test_uniform_factor_stays_in_range() {
        let dims = dimensions(2);
        let mut generator = AttractRepulseSparkGenerator::new(dims.clone(), 0.5).unwrap();
        generator.publish_best(&Solution::new(vec![0.0, 0.0], 0.0));
        assert!(generator.best().is_some());

        let mut rng = StdRng::seed_from_u64(2);
        let sparks = generator
            .create_sparks(&explosion(vec![2.0, -2.0]), &mut FireworkIds::new(), &mut rng)
            .unwrap();

        assert_eq!(sparks.len(), 200);
        for spark in &sparks {
            assert_in_range(&dims, spark);
            // x + x * s with s in [0.5, 1.5)
            for (&c, p) in spark.coordinates().iter().zip([2.0f64, -2.0]) {
                assert!(c == p || (c.abs() >= 3.0 - 1e-12 && c.abs() <= 5.0 + 1e-12), "got {c}");
                assert_eq!(c.signum(), p.signum());
            }
        }
    }

    #[test]
    fn test_rejects_bad_delta() {
        assert!(AttractRepulseSparkGenerator::new(dimensions(1), 0.0).is_err());
        assert!(AttractRepulseSparkGenerator::new(dimensions(1), f64::NAN).is_err());
    }

    #[test]
    fn test_rejects_initial_explosion() {
        let mut generator = AttractRepulseSparkGenerator::new(dimensions(1), 0.5).unwrap();
        generator.publish_best(&Solution::new(vec![0.0], 0.0));
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            generator.create_spark(&Explosion::initial(0, 1), FireworkId(0), &mut rng),
            Err(FwaError::ExplosionMismatch { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_sparks_always_in_range(
            seed: u64,
            x in -10.0f64..=10.0,
            y in -10.0f64..=10.0,
            bx in -10.0f64..=10.0,
            by in -10.0f64..=10.0,
            delta in 0.01f64..5.0,
        ) {
            let dims = dimensions(2);
            let mut generator = AttractRepulseSparkGenerator::new(dims.clone(), delta).unwrap();
            generator.publish_best(&Solution::new(vec![bx, by], 0.0));
            let mut rng = StdRng::seed_from_u64(seed);
            let sparks = generator
                .create_sparks(&explosion(vec![x, y]), &mut FireworkIds::new(), &mut rng)
                .unwrap();
            for spark in &sparks {
                for (dim, &c) in dims.iter().zip(spark.coordinates()) {
                    prop_assert!(dim.is_value_in_range(c));
                }
            }
        }
    }
}
