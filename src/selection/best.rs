//! Greedy best-k selection.

use super::{trivial_selection, FireworkSelector};
use crate::error::Result;
use crate::model::Firework;
use crate::problem::ProblemTarget;
use rand::RngCore;

/// Keeps the `count` best fireworks.
///
/// Equivalent to extracting the best remaining firework `count` times;
/// equal qualities keep their input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestSelector {
    target: ProblemTarget,
}

impl BestSelector {
    pub fn new(target: ProblemTarget) -> Self {
        Self { target }
    }
}

impl FireworkSelector for BestSelector {
    fn select(&self, from: &[Firework], count: usize, _rng: &mut dyn RngCore) -> Result<Vec<Firework>> {
        if let Some(selected) = trivial_selection(from, count)? {
            return Ok(selected);
        }

        let mut order: Vec<usize> = (0..from.len()).collect();
        order.sort_by(|&a, &b| self.target.compare(from[a].quality(), from[b].quality()));
        Ok(order.into_iter().take(count).map(|i| from[i].clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_top_k_minimum() {
        let from = population(&[3.0, 1.0, 2.0, 1.0, 5.0]);
        let mut rng = StdRng::seed_from_u64(0);
        let selected = BestSelector::new(ProblemTarget::Minimum)
            .select(&from, 3, &mut rng)
            .unwrap();
        assert_eq!(ids(&selected), vec![1, 3, 2]);
    }

    #[test]
    fn test_top_k_maximum() {
        let from = population(&[3.0, 1.0, 2.0, 1.0, 5.0]);
        let mut rng = StdRng::seed_from_u64(0);
        let selected = BestSelector::new(ProblemTarget::Maximum)
            .select(&from, 2, &mut rng)
            .unwrap();
        assert_eq!(ids(&selected), vec![4, 0]);
    }
}
