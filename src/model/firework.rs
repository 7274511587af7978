//! Points in the search space: solutions and fireworks.

use crate::error::{FwaError, Result};

/// Tolerance used when comparing qualities of two solutions.
const QUALITY_TOLERANCE: f64 = 1e-10;

/// A point in the search space together with its quality.
///
/// Coordinates follow the order of the problem's dimensions. An empty
/// coordinate vector is a quality-only placeholder.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    pub coordinates: Vec<f64>,
    pub quality: f64,
}

impl Solution {
    pub fn new(coordinates: Vec<f64>, quality: f64) -> Self {
        Self {
            coordinates,
            quality,
        }
    }

    /// A solution that carries only a quality value.
    pub fn quality_only(quality: f64) -> Self {
        Self {
            coordinates: Vec::new(),
            quality,
        }
    }
}

impl PartialEq for Solution {
    fn eq(&self, other: &Self) -> bool {
        self.coordinates == other.coordinates && qualities_equal(self.quality, other.quality)
    }
}

fn qualities_equal(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || a == b || (a - b).abs() <= QUALITY_TOLERANCE
}

/// How a firework came into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FireworkType {
    /// Created uniformly at random during initialization.
    Initial,
    /// Produced by an explosion around a parent firework.
    ExplosionSpark,
    /// Produced by a mutation operator (Gaussian, attract-repulse).
    SpecificSpark,
    /// Produced by the elite strategy from a fitted landscape.
    EliteFirework,
}

/// Integer handle identifying a firework within one algorithm run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FireworkId(pub u64);

impl std::fmt::Display for FireworkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues sequential [`FireworkId`]s.
#[derive(Debug, Clone, Default)]
pub struct FireworkIds {
    next: u64,
}

impl FireworkIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// An issuer whose first id is `next`.
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    /// Returns the next unused id.
    ///
    /// # Errors
    ///
    /// [`FwaError::InvalidArgument`] once every `u64` id has been issued.
    pub fn issue(&mut self) -> Result<FireworkId> {
        let id = FireworkId(self.next);
        self.next = self.next.checked_add(1).ok_or_else(|| FwaError::InvalidArgument {
            name: "ids",
            reason: "firework id space exhausted".into(),
        })?;
        Ok(id)
    }

    /// Number of ids issued so far.
    pub fn issued(&self) -> u64 {
        self.next
    }
}

/// A member of the FWA population.
///
/// A firework starts with a NaN quality and is evaluated exactly once.
#[derive(Debug, Clone)]
pub struct Firework {
    id: FireworkId,
    kind: FireworkType,
    birth_step_number: usize,
    coordinates: Vec<f64>,
    quality: f64,
}

impl Firework {
    /// Creates an unevaluated firework.
    pub fn new(
        id: FireworkId,
        kind: FireworkType,
        birth_step_number: usize,
        coordinates: Vec<f64>,
    ) -> Self {
        Self {
            id,
            kind,
            birth_step_number,
            coordinates,
            quality: f64::NAN,
        }
    }

    /// Creates a firework whose quality is already known.
    pub fn with_quality(
        id: FireworkId,
        kind: FireworkType,
        birth_step_number: usize,
        coordinates: Vec<f64>,
        quality: f64,
    ) -> Self {
        Self {
            id,
            kind,
            birth_step_number,
            coordinates,
            quality,
        }
    }

    pub fn id(&self) -> FireworkId {
        self.id
    }

    pub fn kind(&self) -> FireworkType {
        self.kind
    }

    pub fn birth_step_number(&self) -> usize {
        self.birth_step_number
    }

    pub fn coordinates(&self) -> &[f64] {
        &self.coordinates
    }

    /// Quality, or NaN while the firework is unevaluated.
    pub fn quality(&self) -> f64 {
        self.quality
    }

    pub fn is_evaluated(&self) -> bool {
        !self.quality.is_nan()
    }

    /// Stores the quality computed by the problem.
    ///
    /// # Errors
    ///
    /// [`FwaError::AlreadyEvaluated`] if the firework already has a quality.
    pub fn set_quality(&mut self, quality: f64) -> Result<()> {
        if self.is_evaluated() {
            return Err(FwaError::AlreadyEvaluated {
                id: self.id,
                kind: self.kind,
            });
        }
        self.quality = quality;
        Ok(())
    }

    pub fn to_solution(&self) -> Solution {
        Solution::new(self.coordinates.clone(), self.quality)
    }
}

impl PartialEq for Firework {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solution_equality_tolerates_tiny_quality_gap() {
        let a = Solution::new(vec![1.0, 2.0], 0.5);
        let b = Solution::new(vec![1.0, 2.0], 0.5 + 1e-12);
        let c = Solution::new(vec![1.0, 2.5], 0.5);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(Solution::quality_only(f64::NAN), Solution::quality_only(f64::NAN));
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut ids = FireworkIds::new();
        assert_eq!(ids.issue().unwrap(), FireworkId(0));
        assert_eq!(ids.issue().unwrap(), FireworkId(1));
        assert_eq!(ids.issued(), 2);
    }

    #[test]
    fn test_exhausted_ids_are_an_error() {
        let mut ids = FireworkIds::starting_at(u64::MAX - 1);
        assert_eq!(ids.issue().unwrap(), FireworkId(u64::MAX - 1));
        assert!(matches!(ids.issue(), Err(FwaError::InvalidArgument { name: "ids", .. })));
        assert_eq!(ids.issued(), u64::MAX);
    }

    #[test]
    fn test_quality_set_once() {
        let mut fw = Firework::new(FireworkId(3), FireworkType::Initial, 0, vec![0.0]);
        assert!(!fw.is_evaluated());
        fw.set_quality(4.0).unwrap();
        assert_eq!(fw.quality(), 4.0);

        let err = fw.set_quality(5.0).unwrap_err();
        assert!(matches!(err, FwaError::AlreadyEvaluated { id: FireworkId(3), .. }));
        assert_eq!(fw.quality(), 4.0);
    }

    #[test]
    fn test_firework_identity() {
        let a = Firework::new(FireworkId(1), FireworkType::Initial, 0, vec![1.0]);
        let b = Firework::new(FireworkId(2), FireworkType::Initial, 0, vec![1.0]);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_eq!(a.to_solution().coordinates, vec![1.0]);
    }
}
