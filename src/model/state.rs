//! Algorithm state carried between steps.

use super::firework::{Firework, FireworkId, FireworkIds, Solution};
use crate::error::{FwaError, Result};

/// Population, step counter and best-known solution of a running FWA.
///
/// The state also owns the [`FireworkIds`] issuer so that ids stay unique
/// across steps, whichever state-update mode the driver uses.
#[derive(Debug, Clone)]
pub struct AlgorithmState {
    fireworks: Vec<Firework>,
    step_number: usize,
    best_solution: Solution,
    ids: FireworkIds,
}

impl AlgorithmState {
    /// Creates a state around a non-empty population.
    ///
    /// The id issuer resumes after the largest id in `fireworks`.
    pub fn new(fireworks: Vec<Firework>, step_number: usize, best_solution: Solution) -> Result<Self> {
        if fireworks.is_empty() {
            return Err(FwaError::Empty("fireworks"));
        }

        let max_id = fireworks.iter().map(|fw| fw.id().0).max().unwrap_or(0);
        let next = max_id.checked_add(1).ok_or_else(|| FwaError::InvalidArgument {
            name: "fireworks",
            reason: format!("firework id {} leaves no room for new ids", FireworkId(max_id)),
        })?;
        let ids = FireworkIds::starting_at(next);

        Ok(Self {
            fireworks,
            step_number,
            best_solution,
            ids,
        })
    }

    pub(crate) fn from_parts(
        fireworks: Vec<Firework>,
        step_number: usize,
        best_solution: Solution,
        ids: FireworkIds,
    ) -> Self {
        debug_assert!(!fireworks.is_empty());
        Self {
            fireworks,
            step_number,
            best_solution,
            ids,
        }
    }

    pub fn fireworks(&self) -> &[Firework] {
        &self.fireworks
    }

    pub fn step_number(&self) -> usize {
        self.step_number
    }

    pub fn best_solution(&self) -> &Solution {
        &self.best_solution
    }

    pub fn ids(&self) -> &FireworkIds {
        &self.ids
    }

    pub(crate) fn ids_mut(&mut self) -> &mut FireworkIds {
        &mut self.ids
    }

    /// Replaces the population after a step. Used by the in-place update mode.
    pub(crate) fn advance(&mut self, fireworks: Vec<Firework>, best_solution: Solution) {
        debug_assert!(!fireworks.is_empty());
        self.fireworks = fireworks;
        self.best_solution = best_solution;
        self.step_number += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FireworkId, FireworkType};

    fn firework(id: u64, quality: f64) -> Firework {
        Firework::with_quality(FireworkId(id), FireworkType::Initial, 0, vec![quality], quality)
    }

    #[test]
    fn test_rejects_empty_population() {
        let result = AlgorithmState::new(Vec::new(), 0, Solution::quality_only(0.0));
        assert_eq!(result.unwrap_err(), FwaError::Empty("fireworks"));
    }

    #[test]
    fn test_rejects_largest_id() {
        let result = AlgorithmState::new(vec![firework(u64::MAX, 1.0)], 0, Solution::quality_only(1.0));
        assert!(matches!(
            result,
            Err(FwaError::InvalidArgument { name: "fireworks", .. })
        ));
    }

    #[test]
    fn test_ids_resume_after_population() {
        let state = AlgorithmState::new(
            vec![firework(4, 1.0), firework(9, 2.0)],
            3,
            Solution::quality_only(1.0),
        )
        .unwrap();
        assert_eq!(state.ids().issued(), 10);
        assert_eq!(state.step_number(), 3);
    }

    #[test]
    fn test_advance_increments_step() {
        let mut state =
            AlgorithmState::new(vec![firework(0, 1.0)], 0, Solution::quality_only(1.0)).unwrap();
        state.advance(vec![firework(1, 0.5)], Solution::new(vec![0.5], 0.5));
        assert_eq!(state.step_number(), 1);
        assert_eq!(state.fireworks()[0].id(), FireworkId(1));
        assert_eq!(state.best_solution().quality, 0.5);
    }
}
