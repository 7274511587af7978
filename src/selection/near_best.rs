//! Near-best selection (2012 paper).

use super::{best_index, trivial_selection, FireworkSelector};
use crate::distance::{DistanceCalculator, EuclideanDistance};
use crate::error::Result;
use crate::model::Firework;
use crate::problem::ProblemTarget;
use rand::RngCore;
use std::cmp::Ordering;

/// Keeps the best firework and the ones closest to it.
///
/// Candidates are sorted by ascending distance to the best firework; ties
/// keep their input order. Converges faster than distance-based selection
/// at the cost of diversity.
#[derive(Debug, Clone)]
pub struct NearBestSelector<D = EuclideanDistance> {
    target: ProblemTarget,
    distance: D,
}

impl NearBestSelector<EuclideanDistance> {
    pub fn new(target: ProblemTarget) -> Self {
        Self::with_distance(target, EuclideanDistance)
    }
}

impl<D: DistanceCalculator> NearBestSelector<D> {
    pub fn with_distance(target: ProblemTarget, distance: D) -> Self {
        Self { target, distance }
    }
}

impl<D: DistanceCalculator> FireworkSelector for NearBestSelector<D> {
    fn select(&self, from: &[Firework], count: usize, _rng: &mut dyn RngCore) -> Result<Vec<Firework>> {
        if let Some(selected) = trivial_selection(from, count)? {
            return Ok(selected);
        }

        let best = best_index(self.target, from);
        let mut ranked = Vec::with_capacity(from.len() - 1);
        for (i, firework) in from.iter().enumerate() {
            if i != best {
                ranked.push((i, self.distance.distance_between(&from[best], firework)?));
            }
        }
        ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

        let mut selected = Vec::with_capacity(count);
        selected.push(from[best].clone());
        selected.extend(ranked.into_iter().take(count - 1).map(|(i, _)| from[i].clone()));
        Ok(selected)
    }
}
