//! Search-space axes.

use super::range::Range;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_DIMENSION_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of a [`Dimension`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DimensionId(u64);

/// One axis of the search space.
///
/// Dimensions are compared by identity: two dimensions created from the
/// same range are still distinct. Clones share the identity of the
/// original.
///
/// ```
/// use u_fireworks::model::{Dimension, Range};
///
/// let a = Dimension::new(Range::new(-1.0, 1.0).unwrap());
/// let b = Dimension::new(Range::new(-1.0, 1.0).unwrap());
/// assert_ne!(a, b);
/// assert_eq!(a, a.clone());
/// ```
#[derive(Debug, Clone)]
pub struct Dimension {
    id: DimensionId,
    variation_range: Range,
}

impl Dimension {
    pub fn new(variation_range: Range) -> Self {
        Self {
            id: DimensionId(NEXT_DIMENSION_ID.fetch_add(1, Ordering::Relaxed)),
            variation_range,
        }
    }

    pub fn id(&self) -> DimensionId {
        self.id
    }

    /// The range every coordinate on this axis must stay within.
    pub fn variation_range(&self) -> &Range {
        &self.variation_range
    }

    pub fn is_value_in_range(&self, value: f64) -> bool {
        self.variation_range.is_in_range(value)
    }
}

impl PartialEq for Dimension {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Dimension {}

impl std::hash::Hash for Dimension {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_identity_equality() {
        let range = Range::new(0.0, 1.0).unwrap();
        let a = Dimension::new(range);
        let b = Dimension::new(range);
        assert_ne!(a, b);
        assert_eq!(a.clone(), a);

        let set: HashSet<Dimension> = [a.clone(), b, a].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_value_in_range() {
        let dim = Dimension::new(Range::new(-10.0, 10.0).unwrap());
        assert!(dim.is_value_in_range(10.0));
        assert!(!dim.is_value_in_range(10.5));
    }
}
