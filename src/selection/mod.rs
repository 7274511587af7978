//! Firework selection strategies.
//!
//! After every explosion the merged population (survivors plus sparks) is
//! reduced back to `locations_number` fireworks by a [`FireworkSelector`].
//! Different strategies trade diversity against exploitation.
//!
//! # Contract
//!
//! - `from` is never modified
//! - `count == from.len()` returns a copy of the whole population
//! - `count == 0` returns nothing
//! - `count > from.len()` fails with [`FwaError::SelectionCount`]
//!
//! Best-preserving strategies ([`DistanceBasedSelector`], [`NearBestSelector`],
//! [`BestSelector`], [`BestAndRandomSelector`]) always include the best
//! firework under their [`ProblemTarget`] when `count >= 1`.
//!
//! # References
//!
//! - Tan & Zhu (2010), "Fireworks Algorithm for Optimization" (distance-based)
//! - Pei, Zheng, Tan & Takagi (2012), "An Empirical Study on Influence of
//!   Approximation Approaches on Enhancing Fireworks Algorithm" (near-best)
//! - Zheng, Janecek & Tan (2013), "Enhanced Fireworks Algorithm"
//!   (elitism-random selection)

mod best;
mod distance_based;
mod near_best;
mod random;

pub use best::BestSelector;
pub use distance_based::DistanceBasedSelector;
pub use near_best::NearBestSelector;
pub use random::{BestAndRandomSelector, RandomSelector};

use crate::error::{FwaError, Result};
use crate::model::Firework;
use crate::problem::ProblemTarget;
use rand::RngCore;

/// Picks the fireworks that survive to the next step.
pub trait FireworkSelector: Send + Sync {
    /// Selects `count` fireworks from `from`.
    ///
    /// # Errors
    ///
    /// [`FwaError::SelectionCount`] if `count > from.len()`.
    fn select(&self, from: &[Firework], count: usize, rng: &mut dyn RngCore) -> Result<Vec<Firework>>;
}

/// Handles the cases every selector treats the same way.
///
/// Returns `Some` when the answer does not depend on the strategy.
fn trivial_selection(from: &[Firework], count: usize) -> Result<Option<Vec<Firework>>> {
    if count > from.len() {
        return Err(FwaError::SelectionCount {
            requested: count,
            available: from.len(),
        });
    }
    if count == from.len() {
        return Ok(Some(from.to_vec()));
    }
    if count == 0 {
        return Ok(Some(Vec::new()));
    }
    Ok(None)
}

/// Index of the best firework; the first one wins ties.
///
/// `from` must not be empty.
fn best_index(target: ProblemTarget, from: &[Firework]) -> usize {
    (1..from.len()).fold(0, |best, i| {
        if target.is_better(from[i].quality(), from[best].quality()) {
            i
        } else {
            best
        }
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::model::{Firework, FireworkId, FireworkType};

    /// Evaluated fireworks on a line: `x = i`, quality taken from `qualities`.
    pub fn population(qualities: &[f64]) -> Vec<Firework> {
        qualities
            .iter()
            .enumerate()
            .map(|(i, &q)| {
                Firework::with_quality(FireworkId(i as u64), FireworkType::ExplosionSpark, 1, vec![i as f64, 0.0], q)
            })
            .collect()
    }

    pub fn ids(fireworks: &[Firework]) -> Vec<u64> {
        fireworks.iter().map(|f| f.id().0).collect()
    }
}
