//! Stop conditions for [`FireworksAlgorithm::solve`](crate::fwa::FireworksAlgorithm::solve).
//!
//! A [`StopCondition`] inspects the state after every step. Conditions
//! compose with [`AnyOf`], and any `Fn(&AlgorithmState) -> bool` closure is
//! a condition too.
//!
//! # Examples
//!
//! ```
//! use u_fireworks::problem::ProblemTarget;
//! use u_fireworks::stop::{AnyOf, QualityThreshold, StepLimit};
//!
//! let stop = AnyOf::new()
//!     .or(StepLimit::new(500))
//!     .or(QualityThreshold::new(ProblemTarget::Minimum, 1e-6));
//! assert_eq!(stop.len(), 2);
//! ```

use crate::model::AlgorithmState;
use crate::problem::ProblemTarget;

/// Decides whether the run is over.
pub trait StopCondition {
    fn should_stop(&self, state: &AlgorithmState) -> bool;
}

impl<F> StopCondition for F
where
    F: Fn(&AlgorithmState) -> bool,
{
    fn should_stop(&self, state: &AlgorithmState) -> bool {
        self(state)
    }
}

/// Stops once `steps` steps have been made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepLimit {
    pub steps: usize,
}

impl StepLimit {
    pub fn new(steps: usize) -> Self {
        Self { steps }
    }
}

impl StopCondition for StepLimit {
    fn should_stop(&self, state: &AlgorithmState) -> bool {
        state.step_number() >= self.steps
    }
}

/// Stops once the best quality reaches `quality`.
///
/// "Reaches" is judged under `target`: for [`ProblemTarget::Minimum`] the
/// best quality must be at most `quality + tolerance`, for
/// [`ProblemTarget::Maximum`] at least `quality - tolerance`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityThreshold {
    pub target: ProblemTarget,
    pub quality: f64,
    pub tolerance: f64,
}

impl QualityThreshold {
    pub fn new(target: ProblemTarget, quality: f64) -> Self {
        Self {
            target,
            quality,
            tolerance: 0.0,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance.abs();
        self
    }
}

impl StopCondition for QualityThreshold {
    fn should_stop(&self, state: &AlgorithmState) -> bool {
        let best = state.best_solution().quality;
        match self.target {
            ProblemTarget::Minimum => best <= self.quality + self.tolerance,
            ProblemTarget::Maximum => best >= self.quality - self.tolerance,
        }
    }
}

/// Stops as soon as any inner condition does. Empty means never.
#[derive(Default)]
pub struct AnyOf {
    conditions: Vec<Box<dyn StopCondition>>,
}

impl AnyOf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn or(mut self, condition: impl StopCondition + 'static) -> Self {
        self.conditions.push(Box::new(condition));
        self
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl StopCondition for AnyOf {
    fn should_stop(&self, state: &AlgorithmState) -> bool {
        self.conditions.iter().any(|c| c.should_stop(state))
    }
}

impl std::fmt::Debug for AnyOf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnyOf")
            .field("conditions", &self.conditions.len())
            .finish()
    }
}
