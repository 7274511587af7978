//! The optimization problem consumed by the algorithm.
//!
//! A [`Problem`] supplies the search-space dimensions, the initial ranges
//! fireworks are seeded in, the optimization direction and the quality
//! function. [`FunctionProblem`] wraps a closure for the common case.

use crate::error::{FwaError, Result};
use crate::model::{Dimension, Firework, Range};
use std::cmp::Ordering;

/// Direction of optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProblemTarget {
    /// Lower quality is better.
    #[default]
    Minimum,
    /// Higher quality is better.
    Maximum,
}

impl ProblemTarget {
    /// Orders qualities so that the better one comes first.
    ///
    /// NaN compares equal to everything, mirroring how the population is
    /// sorted elsewhere in the crate.
    pub fn compare(&self, a: f64, b: f64) -> Ordering {
        let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
        match self {
            ProblemTarget::Minimum => ord,
            ProblemTarget::Maximum => ord.reverse(),
        }
    }

    /// Whether `candidate` is strictly better than `reference`.
    pub fn is_better(&self, candidate: f64, reference: f64) -> bool {
        self.compare(candidate, reference) == Ordering::Less
    }

    /// Returns the best firework; the first one wins ties.
    ///
    /// # Errors
    ///
    /// [`FwaError::Empty`] if `fireworks` is empty.
    pub fn best<'a>(&self, fireworks: &'a [Firework]) -> Result<&'a Firework> {
        self.extremum(fireworks, Ordering::Less)
    }

    /// Returns the worst firework; the first one wins ties.
    pub fn worst<'a>(&self, fireworks: &'a [Firework]) -> Result<&'a Firework> {
        self.extremum(fireworks, Ordering::Greater)
    }

    fn extremum<'a>(&self, fireworks: &'a [Firework], wanted: Ordering) -> Result<&'a Firework> {
        let (first, rest) = fireworks
            .split_first()
            .ok_or(FwaError::Empty("fireworks"))?;
        Ok(rest.iter().fold(first, |current, candidate| {
            if self.compare(candidate.quality(), current.quality()) == wanted {
                candidate
            } else {
                current
            }
        }))
    }
}

/// Defines an FWA optimization problem.
///
/// # Examples
///
/// ```
/// use u_fireworks::model::{Dimension, Range};
/// use u_fireworks::problem::{Problem, ProblemTarget};
///
/// struct Sphere {
///     dimensions: Vec<Dimension>,
/// }
///
/// impl Problem for Sphere {
///     fn dimensions(&self) -> &[Dimension] {
///         &self.dimensions
///     }
///
///     fn target(&self) -> ProblemTarget {
///         ProblemTarget::Minimum
///     }
///
///     fn calculate_quality(&self, coordinates: &[f64]) -> f64 {
///         coordinates.iter().map(|x| x * x).sum()
///     }
/// }
///
/// let range = Range::new(-10.0, 10.0).unwrap();
/// let sphere = Sphere { dimensions: vec![Dimension::new(range), Dimension::new(range)] };
/// assert_eq!(sphere.calculate_quality(&[1.0, 2.0]), 5.0);
/// assert_eq!(sphere.initial_ranges().len(), 2);
/// ```
pub trait Problem: Send + Sync {
    /// Ordered, non-empty dimensions of the search space.
    fn dimensions(&self) -> &[Dimension];

    /// Optimization direction.
    fn target(&self) -> ProblemTarget;

    /// Computes the quality of a point. Called exactly once per firework.
    fn calculate_quality(&self, coordinates: &[f64]) -> f64;

    /// Ranges the initial population is drawn from, one per dimension.
    ///
    /// Defaults to each dimension's variation range.
    fn initial_ranges(&self) -> Vec<Range> {
        self.dimensions()
            .iter()
            .map(|d| *d.variation_range())
            .collect()
    }

    /// Called at the end of every step with the current best quality.
    ///
    /// The default implementation is a no-op.
    fn on_step(&self, _step_number: usize, _best_quality: f64) {}
}

/// A [`Problem`] backed by a quality closure.
///
/// ```
/// use u_fireworks::model::Range;
/// use u_fireworks::problem::{FunctionProblem, Problem, ProblemTarget};
///
/// let problem = FunctionProblem::uniform(
///     3,
///     Range::new(-5.0, 5.0).unwrap(),
///     ProblemTarget::Minimum,
///     |x: &[f64]| x.iter().map(|v| v.abs()).sum(),
/// );
/// assert_eq!(problem.dimensions().len(), 3);
/// ```
pub struct FunctionProblem<F> {
    dimensions: Vec<Dimension>,
    initial_ranges: Option<Vec<Range>>,
    target: ProblemTarget,
    function: F,
}

impl<F> FunctionProblem<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    pub fn new(dimensions: Vec<Dimension>, target: ProblemTarget, function: F) -> Self {
        Self {
            dimensions,
            initial_ranges: None,
            target,
            function,
        }
    }

    /// Creates `dimension_count` dimensions sharing the same variation range.
    pub fn uniform(dimension_count: usize, range: Range, target: ProblemTarget, function: F) -> Self {
        let dimensions = (0..dimension_count).map(|_| Dimension::new(range)).collect();
        Self::new(dimensions, target, function)
    }

    /// Seeds the initial population from `ranges` instead of the variation ranges.
    ///
    /// # Errors
    ///
    /// [`FwaError::DimensionMismatch`] if the count differs from the dimensions.
    pub fn with_initial_ranges(mut self, ranges: Vec<Range>) -> Result<Self> {
        if ranges.len() != self.dimensions.len() {
            return Err(FwaError::DimensionMismatch {
                expected: self.dimensions.len(),
                actual: ranges.len(),
            });
        }
        self.initial_ranges = Some(ranges);
        Ok(self)
    }
}

impl<F> Problem for FunctionProblem<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    fn target(&self) -> ProblemTarget {
        self.target
    }

    fn calculate_quality(&self, coordinates: &[f64]) -> f64 {
        (self.function)(coordinates)
    }

    fn initial_ranges(&self) -> Vec<Range> {
        match &self.initial_ranges {
            Some(ranges) => ranges.clone(),
            None => self
                .dimensions
                .iter()
                .map(|d| *d.variation_range())
                .collect(),
        }
    }
}
