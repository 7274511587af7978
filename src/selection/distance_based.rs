//! Distance-based selection (2010 paper).

use super::{best_index, trivial_selection, FireworkSelector};
use crate::distance::{DistanceCalculator, EuclideanDistance};
use crate::error::Result;
use crate::model::Firework;
use crate::problem::ProblemTarget;
use rand::RngCore;
use std::cmp::Ordering;

/// Keeps the best firework and favours the ones far from the crowd.
///
/// Every firework gets `R_i = Σ_j d(x_i, x_j)` over the whole population
/// and a selection probability `p_i = R_i / Σ R`. The remaining
/// `count - 1` slots go to the highest probabilities, deterministically;
/// ties keep their input order.
///
/// # Complexity
/// O(n²) distance evaluations per call
#[derive(Debug, Clone)]
pub struct DistanceBasedSelector<D = EuclideanDistance> {
    target: ProblemTarget,
    distance: D,
}

impl DistanceBasedSelector<EuclideanDistance> {
    pub fn new(target: ProblemTarget) -> Self {
        Self::with_distance(target, EuclideanDistance)
    }
}

impl<D: DistanceCalculator> DistanceBasedSelector<D> {
    pub fn with_distance(target: ProblemTarget, distance: D) -> Self {
        Self { target, distance }
    }

    /// Selection probability of every firework in `from`.
    ///
    /// Falls back to a uniform distribution when all fireworks coincide.
    pub fn probabilities(&self, from: &[Firework]) -> Result<Vec<f64>> {
        let mut sums = vec![0.0; from.len()];
        for i in 0..from.len() {
            for j in (i + 1)..from.len() {
                let d = self.distance.distance_between(&from[i], &from[j])?;
                sums[i] += d;
                sums[j] += d;
            }
        }

        let total: f64 = sums.iter().sum();
        if total > 0.0 && total.is_finite() {
            Ok(sums.into_iter().map(|r| r / total).collect())
        } else {
            Ok(vec![1.0 / from.len() as f64; from.len()])
        }
    }
}

impl<D: DistanceCalculator> FireworkSelector for DistanceBasedSelector<D> {
    fn select(&self, from: &[Firework], count: usize, _rng: &mut dyn RngCore) -> Result<Vec<Firework>> {
        if let Some(selected) = trivial_selection(from, count)? {
            return Ok(selected);
        }

        let best = best_index(self.target, from);
        let probabilities = self.probabilities(from)?;

        let mut ranked: Vec<usize> = (0..from.len()).filter(|&i| i != best).collect();
        ranked.sort_by(|&a, &b| {
            probabilities[b]
                .partial_cmp(&probabilities[a])
                .unwrap_or(Ordering::Equal)
        });

        let mut selected = Vec::with_capacity(count);
        selected.push(from[best].clone());
        selected.extend(ranked.into_iter().take(count - 1).map(|i| from[i].clone()));
        Ok(selected)
    }
}
