//! Closed/open real intervals.

use crate::error::{ensure_finite, FwaError, Result};
use rand::{Rng, RngCore};

/// Absolute tolerance used when a value touches a range bound.
const BOUND_TOLERANCE: f64 = 1e-10;

/// Maximum number of redraws when uniform sampling hits an open bound.
const MAX_SAMPLE_ATTEMPTS: usize = 16;

/// An immutable interval of real numbers.
///
/// Each bound can independently be open or closed. Infinite bounds are
/// always open.
///
/// # Examples
///
/// ```
/// use u_fireworks::model::Range;
///
/// let range = Range::new(5.0, 15.5).unwrap();
/// assert!(range.is_in_range(5.0));
/// assert!(range.is_in_range(10.0));
/// assert!(!range.is_in_range(4.5));
/// assert!(!range.is_in_range(16.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    minimum: f64,
    maximum: f64,
    length: f64,
    is_minimum_open: bool,
    is_maximum_open: bool,
}

impl Range {
    /// Creates a closed range `[minimum, maximum]`.
    pub fn new(minimum: f64, maximum: f64) -> Result<Self> {
        Self::with_openness(minimum, maximum, false, false)
    }

    /// Creates a range with explicit openness for each bound.
    ///
    /// Infinite bounds are forced open regardless of the flags.
    pub fn with_openness(
        minimum: f64,
        maximum: f64,
        is_minimum_open: bool,
        is_maximum_open: bool,
    ) -> Result<Self> {
        if minimum.is_nan() || maximum.is_nan() || minimum > maximum {
            return Err(FwaError::InvalidRange { minimum, maximum });
        }

        Ok(Self {
            minimum,
            maximum,
            length: (maximum - minimum).abs(),
            is_minimum_open: is_minimum_open || minimum.is_infinite(),
            is_maximum_open: is_maximum_open || maximum.is_infinite(),
        })
    }

    /// Creates the closed range `[mean - deviation, mean + deviation]`.
    pub fn around(mean: f64, deviation: f64) -> Result<Self> {
        Self::around_with_openness(mean, deviation, false, false)
    }

    /// Creates `mean ± deviation` with explicit bound openness.
    pub fn around_with_openness(
        mean: f64,
        deviation: f64,
        is_minimum_open: bool,
        is_maximum_open: bool,
    ) -> Result<Self> {
        let (minimum, maximum) = deviate(mean, deviation)?;
        Self::with_openness(minimum, maximum, is_minimum_open, is_maximum_open)
    }

    /// Creates the closed range `mean ± deviation`, clamped to
    /// `[min_restriction, max_restriction]`.
    pub fn around_restricted(
        mean: f64,
        deviation: f64,
        min_restriction: f64,
        max_restriction: f64,
    ) -> Result<Self> {
        let (minimum, maximum) = deviate(mean, deviation)?;
        let (minimum, maximum) = restrict(minimum, maximum, min_restriction, max_restriction)?;
        Self::new(minimum, maximum)
    }

    /// Creates the closed range `mean ± |mean| * percent / 100`.
    pub fn around_percent(mean: f64, deviation_percent: f64) -> Result<Self> {
        Self::around(mean, percent_deviation(mean, deviation_percent)?)
    }

    /// Percentage variant of [`around_restricted`](Self::around_restricted).
    pub fn around_percent_restricted(
        mean: f64,
        deviation_percent: f64,
        min_restriction: f64,
        max_restriction: f64,
    ) -> Result<Self> {
        let deviation = percent_deviation(mean, deviation_percent)?;
        Self::around_restricted(mean, deviation, min_restriction, max_restriction)
    }

    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    /// `|maximum - minimum|`.
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn is_minimum_open(&self) -> bool {
        self.is_minimum_open
    }

    pub fn is_maximum_open(&self) -> bool {
        self.is_maximum_open
    }

    /// Whether both bounds are finite.
    pub fn is_finite(&self) -> bool {
        self.minimum.is_finite() && self.maximum.is_finite()
    }

    pub fn midpoint(&self) -> f64 {
        self.minimum + (self.maximum - self.minimum) / 2.0
    }

    /// Returns `true` if `value` lies in the range, honoring bound openness.
    pub fn is_in_range(&self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        if value < self.minimum - BOUND_TOLERANCE || value > self.maximum + BOUND_TOLERANCE {
            return false;
        }

        let touches_minimum = (value - self.minimum).abs() <= BOUND_TOLERANCE;
        let touches_maximum = (value - self.maximum).abs() <= BOUND_TOLERANCE;

        match (touches_minimum, touches_maximum) {
            (true, true) => !self.is_minimum_open && !self.is_maximum_open,
            (true, false) => !self.is_minimum_open,
            (false, true) => !self.is_maximum_open,
            (false, false) => true,
        }
    }

    /// Maps an out-of-range value back inside by modular wrap-around.
    ///
    /// Values already in range are returned untouched. Otherwise the value
    /// becomes `minimum + (value - minimum) mod length` with a non-negative
    /// remainder. When the result still misses the range (an open bound hit
    /// exactly, a degenerate range, or a non-finite input), the midpoint is
    /// used.
    pub fn wrap(&self, value: f64) -> f64 {
        if self.is_in_range(value) {
            return value;
        }

        if self.is_finite() && self.length > 0.0 && value.is_finite() {
            let wrapped = self.minimum + (value - self.minimum).rem_euclid(self.length);
            if self.is_in_range(wrapped) {
                return wrapped;
            }
        }

        self.fallback()
    }

    /// Draws a value uniformly from the range.
    ///
    /// Unbounded ranges cannot be sampled uniformly and yield the fallback
    /// point used by [`wrap`](Self::wrap).
    pub fn sample_uniform(&self, rng: &mut dyn RngCore) -> f64 {
        if !self.is_finite() || self.length == 0.0 {
            return self.fallback();
        }

        for _ in 0..MAX_SAMPLE_ATTEMPTS {
            let value = rng.random_range(self.minimum..=self.maximum);
            if self.is_in_range(value) {
                return value;
            }
        }
        self.midpoint()
    }

    fn fallback(&self) -> f64 {
        if self.is_finite() {
            self.midpoint()
        } else if self.minimum.is_finite() {
            self.minimum + 1.0
        } else if self.maximum.is_finite() {
            self.maximum - 1.0
        } else {
            0.0
        }
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let open = if self.is_minimum_open { '(' } else { '[' };
        let close = if self.is_maximum_open { ')' } else { ']' };
        write!(f, "{open}{}, {}{close}", self.minimum, self.maximum)
    }
}

fn deviate(mean: f64, deviation: f64) -> Result<(f64, f64)> {
    ensure_finite("mean", mean)?;
    ensure_finite("deviation", deviation)?;
    if deviation < 0.0 {
        return Err(FwaError::InvalidArgument {
            name: "deviation",
            reason: format!("must be non-negative, got {deviation}"),
        });
    }
    Ok((mean - deviation, mean + deviation))
}

fn percent_deviation(mean: f64, deviation_percent: f64) -> Result<f64> {
    ensure_finite("mean", mean)?;
    ensure_finite("deviation_percent", deviation_percent)?;
    Ok(mean.abs() * deviation_percent / 100.0)
}

fn restrict(
    minimum: f64,
    maximum: f64,
    min_restriction: f64,
    max_restriction: f64,
) -> Result<(f64, f64)> {
    if min_restriction.is_nan() || max_restriction.is_nan() || min_restriction > max_restriction {
        return Err(FwaError::InvalidRange {
            minimum: min_restriction,
            maximum: max_restriction,
        });
    }

    let minimum = minimum.clamp(min_restriction, max_restriction);
    let maximum = maximum.clamp(min_restriction, max_restriction);
    Ok((minimum, maximum))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_closed_range_membership() {
        let range = Range::new(5.0, 15.5).unwrap();
        assert!(range.is_in_range(5.0));
        assert!(range.is_in_range(15.5));
        assert!(range.is_in_range(10.0));
        assert!(!range.is_in_range(16.0));
        assert!(!range.is_in_range(4.5));
        assert!((range.length() - 10.5).abs() < 1e-12);
    }

    #[test]
    fn test_open_bounds() {
        let range = Range::with_openness(0.0, 1.0, true, false).unwrap();
        assert!(!range.is_in_range(0.0));
        assert!(range.is_in_range(1.0));
        assert!(range.is_in_range(0.5));

        let range = Range::with_openness(0.0, 1.0, false, true).unwrap();
        assert!(range.is_in_range(0.0));
        assert!(!range.is_in_range(1.0));
    }

    #[test]
    fn test_infinite_bounds_forced_open() {
        let range = Range::new(f64::NEG_INFINITY, 3.0).unwrap();
        assert!(range.is_minimum_open());
        assert!(!range.is_maximum_open());
        assert!(range.is_in_range(-1e300));
        assert!(range.length().is_infinite());
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(matches!(
            Range::new(2.0, 1.0),
            Err(FwaError::InvalidRange { .. })
        ));
        assert!(Range::new(f64::NAN, 1.0).is_err());
        assert!(Range::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_nan_is_never_in_range() {
        let range = Range::new(-1.0, 1.0).unwrap();
        assert!(!range.is_in_range(f64::NAN));
    }

    // ---- Factories ----

    #[test]
    fn test_around() {
        let range = Range::around(10.0, 2.5).unwrap();
        assert_eq!(range.minimum(), 7.5);
        assert_eq!(range.maximum(), 12.5);
    }

    #[test]
    fn test_around_rejects_negative_deviation() {
        assert!(matches!(
            Range::around(0.0, -1.0),
            Err(FwaError::InvalidArgument {
                name: "deviation",
                ..
            })
        ));
        assert!(Range::around(f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn test_around_restricted_clamps() {
        let range = Range::around_restricted(9.0, 3.0, 0.0, 10.0).unwrap();
        assert_eq!(range.minimum(), 6.0);
        assert_eq!(range.maximum(), 10.0);

        assert!(Range::around_restricted(0.0, 1.0, 5.0, 4.0).is_err());
    }

    #[test]
    fn test_around_percent() {
        let range = Range::around_percent(-20.0, 10.0).unwrap();
        assert!((range.minimum() + 22.0).abs() < 1e-12);
        assert!((range.maximum() + 18.0).abs() < 1e-12);

        let range = Range::around_percent_restricted(100.0, 50.0, 0.0, 120.0).unwrap();
        assert_eq!(range.minimum(), 50.0);
        assert_eq!(range.maximum(), 120.0);
    }

    // ---- Wrap ----

    #[test]
    fn test_wrap_is_modular() {
        let range = Range::new(-10.0, 10.0).unwrap();
        assert_eq!(range.wrap(3.0), 3.0);
        assert!((range.wrap(12.0) - (-8.0)).abs() < 1e-12);
        assert!((range.wrap(-13.0) - 7.0).abs() < 1e-12);
        assert!(range.is_in_range(range.wrap(-1234.5)));
    }

    #[test]
    fn test_wrap_non_finite_uses_midpoint() {
        let range = Range::new(0.0, 4.0).unwrap();
        assert_eq!(range.wrap(f64::NAN), 2.0);
        assert_eq!(range.wrap(f64::INFINITY), 2.0);
    }

    #[test]
    fn test_wrap_degenerate_range() {
        let range = Range::new(3.0, 3.0).unwrap();
        assert_eq!(range.wrap(7.0), 3.0);
    }

    #[test]
    fn test_sample_uniform_stays_inside() {
        let range = Range::with_openness(-1.0, 1.0, true, true).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(range.is_in_range(range.sample_uniform(&mut rng)));
        }
    }

    proptest! {
        #[test]
        fn prop_bounds_follow_openness(
            min in -1e6f64..1e6,
            len in 1e-3f64..1e6,
            min_open: bool,
            max_open: bool,
        ) {
            let range = Range::with_openness(min, min + len, min_open, max_open).unwrap();
            prop_assert_eq!(range.is_in_range(range.minimum()), !min_open);
            prop_assert_eq!(range.is_in_range(range.maximum()), !max_open);
            prop_assert!(range.is_in_range(range.midpoint()));
            prop_assert!(!range.is_in_range(range.maximum() + 1.0));
            prop_assert!(!range.is_in_range(range.minimum() - 1.0));
        }

        #[test]
        fn prop_wrap_always_lands_inside(
            min in -1e3f64..1e3,
            len in 1e-2f64..1e3,
            value in -1e5f64..1e5,
        ) {
            let range = Range::new(min, min + len).unwrap();
            prop_assert!(range.is_in_range(range.wrap(value)));
        }
    }
}
