//! Elite strategy: sparks placed by approximating the fitness landscape.

use super::{check_dimensions, mismatch, require_dimensions, SparkGenerator};
use crate::error::{FwaError, Result};
use crate::explode::{Explosion, ExplosionKind};
use crate::model::{Dimension, Firework, FireworkId, FireworkType};
use crate::numeric::{
    BisectionSolver, CurveFitter, Differentiator, EquationSolver, LeastSquaresFitter,
    PolynomialDifferentiator,
};
use crate::problem::ProblemTarget;
use rand::RngCore;
use std::fmt;

/// Sampled spans narrower than this collapse to their lower end under LS2.
const DEGENERATE_SPAN: f64 = 1e-12;

/// How the elite point is read off the fitted curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EliteStrategy {
    /// Midpoint of the dimension's variation range.
    Ls1,
    /// Stationary point of the fitted curve within the variation range.
    #[default]
    Ls2,
}

/// Creates one elite firework per request from a sample of the population.
///
/// [`EliteStrategy::Ls1`] takes the midpoint of every dimension's variation
/// range. [`EliteStrategy::Ls2`] fits the sampled `(coordinate, quality)`
/// pairs of each dimension with a [`CurveFitter`], differentiates the fit and
/// solves for a root within the dimension's variation range. A dimension in
/// which every sample shares one coordinate keeps that coordinate.
///
/// A fit or solve that fails (no sign change of the derivative, an unbounded
/// range) surfaces as [`FwaError::Numeric`].
///
/// Fitting is deterministic: every elite spark from the same explosion has
/// the same coordinates.
pub struct EliteStrategyGenerator {
    dimensions: Vec<Dimension>,
    strategy: EliteStrategy,
    target: ProblemTarget,
    fitter: Box<dyn CurveFitter>,
    differentiator: Box<dyn Differentiator>,
    solver: Box<dyn EquationSolver>,
}

impl EliteStrategyGenerator {
    /// Quadratic least-squares fit, exact differentiation, bisection.
    pub fn new(dimensions: Vec<Dimension>, strategy: EliteStrategy, target: ProblemTarget) -> Result<Self> {
        Self::with_services(
            dimensions,
            strategy,
            target,
            Box::new(LeastSquaresFitter::default()),
            Box::new(PolynomialDifferentiator),
            Box::new(BisectionSolver::default()),
        )
    }

    pub fn with_services(
        dimensions: Vec<Dimension>,
        strategy: EliteStrategy,
        target: ProblemTarget,
        fitter: Box<dyn CurveFitter>,
        differentiator: Box<dyn Differentiator>,
        solver: Box<dyn EquationSolver>,
    ) -> Result<Self> {
        require_dimensions(&dimensions)?;
        Ok(Self {
            dimensions,
            strategy,
            target,
            fitter,
            differentiator,
            solver,
        })
    }

    pub fn strategy(&self) -> EliteStrategy {
        self.strategy
    }

    /// Elite coordinate for one dimension.
    fn elite_coordinate(&self, xs: &[f64], ys: &[f64], dimension: &Dimension) -> Result<f64> {
        let range = dimension.variation_range();
        let coordinate = match self.strategy {
            EliteStrategy::Ls1 => range.midpoint(),
            EliteStrategy::Ls2 => {
                let lo = xs.iter().copied().fold(f64::INFINITY, f64::min);
                let hi = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                if hi - lo <= DEGENERATE_SPAN {
                    lo
                } else {
                    let fitted = self.fitter.approximate(xs, ys)?;
                    let slope = self.differentiator.differentiate(&fitted);
                    self.solver.solve(&slope, range)?
                }
            }
        };
        Ok(range.wrap(coordinate))
    }
}

impl fmt::Debug for EliteStrategyGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EliteStrategyGenerator")
            .field("dimensions", &self.dimensions.len())
            .field("strategy", &self.strategy)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl SparkGenerator for EliteStrategyGenerator {
    fn spark_type(&self) -> FireworkType {
        FireworkType::EliteFirework
    }

    fn create_spark(
        &self,
        explosion: &Explosion,
        id: FireworkId,
        _rng: &mut dyn RngCore,
    ) -> Result<Firework> {
        let ExplosionKind::Elite { fireworks } = explosion.kind() else {
            return Err(mismatch("EliteStrategyGenerator", "elite", explosion));
        };
        for firework in fireworks {
            check_dimensions(&self.dimensions, firework.coordinates())?;
            if !firework.is_evaluated() {
                return Err(FwaError::InvalidArgument {
                    name: "fireworks",
                    reason: format!("firework {} has not been evaluated", firework.id()),
                });
            }
        }

        let ys: Vec<f64> = fireworks.iter().map(Firework::quality).collect();
        let coordinates = self
            .dimensions
            .iter()
            .enumerate()
            .map(|(k, dimension)| {
                let xs: Vec<f64> = fireworks.iter().map(|f| f.coordinates()[k]).collect();
                self.elite_coordinate(&xs, &ys, dimension)
            })
            .collect::<Result<Vec<f64>>>()?;

        Ok(Firework::new(
            id,
            FireworkType::EliteFirework,
            explosion.step_number(),
            coordinates,
        ))
    }
}
