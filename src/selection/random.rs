//! Random selection, with and without elitism.

use super::{best_index, trivial_selection, FireworkSelector};
use crate::error::Result;
use crate::model::Firework;
use crate::problem::ProblemTarget;
use rand::seq::index;
use rand::RngCore;

/// Keeps the best firework and fills the rest uniformly at random.
///
/// Also known as elitism-random selection (EFWA).
#[derive(Debug, Clone, Copy, Default)]
pub struct BestAndRandomSelector {
    target: ProblemTarget,
}

impl BestAndRandomSelector {
    pub fn new(target: ProblemTarget) -> Self {
        Self { target }
    }
}

impl FireworkSelector for BestAndRandomSelector {
    fn select(&self, from: &[Firework], count: usize, rng: &mut dyn RngCore) -> Result<Vec<Firework>> {
        if let Some(selected) = trivial_selection(from, count)? {
            return Ok(selected);
        }

        let best = best_index(self.target, from);
        let mut selected = Vec::with_capacity(count);
        selected.push(from[best].clone());
        // sample among the others, skipping over the best's slot
        for i in index::sample(rng, from.len() - 1, count - 1) {
            let i = if i >= best { i + 1 } else { i };
            selected.push(from[i].clone());
        }
        Ok(selected)
    }
}

/// Uniform sample without replacement; no firework is guaranteed to survive.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSelector;

impl FireworkSelector for RandomSelector {
    fn select(&self, from: &[Firework], count: usize, rng: &mut dyn RngCore) -> Result<Vec<Firework>> {
        if let Some(selected) = trivial_selection(from, count)? {
            return Ok(selected);
        }

        Ok(index::sample(rng, from.len(), count)
            .into_iter()
            .map(|i| from[i].clone())
            .collect())
    }
}
