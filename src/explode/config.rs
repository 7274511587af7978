//! Exploder settings.

use crate::error::{FwaError, Result};

/// Parameters controlling explosion amplitude and spark counts.
///
/// # Defaults
///
/// The defaults follow Tan & Zhu (2010): `m = 50`, `a = 0.04`, `b = 0.8`,
/// `Â = 40`, and five Gaussian sparks per selected firework.
///
/// ```
/// use u_fireworks::explode::ExploderSettings;
///
/// let settings = ExploderSettings::default()
///     .with_explosion_sparks_number_modifier(30.0)
///     .with_explosion_sparks_maximum_amplitude(10.0);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExploderSettings {
    /// Total number of explosion sparks shared by the population (`m`).
    pub explosion_sparks_number_modifier: f64,

    /// Lower bound on a single firework's sparks, as a fraction of `m` (`a`).
    pub explosion_sparks_number_lower_bound: f64,

    /// Upper bound on a single firework's sparks, as a fraction of `m` (`b`).
    pub explosion_sparks_number_upper_bound: f64,

    /// Maximum explosion amplitude (`Â`).
    pub explosion_sparks_maximum_amplitude: f64,

    /// Specific (Gaussian / attract-repulse) sparks per selected explosion.
    pub specific_sparks_per_explosion_number: usize,

    /// Floor for enhanced per-dimension amplitudes, as a fraction of each
    /// dimension's length. Only used by enhanced explosions.
    pub minimal_amplitude_fraction: f64,
}

impl Default for ExploderSettings {
    fn default() -> Self {
        Self {
            explosion_sparks_number_modifier: 50.0,
            explosion_sparks_number_lower_bound: 0.04,
            explosion_sparks_number_upper_bound: 0.8,
            explosion_sparks_maximum_amplitude: 40.0,
            specific_sparks_per_explosion_number: 5,
            minimal_amplitude_fraction: 1e-4,
        }
    }
}

impl ExploderSettings {
    pub fn with_explosion_sparks_number_modifier(mut self, m: f64) -> Self {
        self.explosion_sparks_number_modifier = m;
        self
    }

    /// Sets the lower and upper spark-count fractions `(a, b)`.
    pub fn with_explosion_sparks_number_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.explosion_sparks_number_lower_bound = lower;
        self.explosion_sparks_number_upper_bound = upper;
        self
    }

    pub fn with_explosion_sparks_maximum_amplitude(mut self, amplitude: f64) -> Self {
        self.explosion_sparks_maximum_amplitude = amplitude;
        self
    }

    pub fn with_specific_sparks_per_explosion_number(mut self, n: usize) -> Self {
        self.specific_sparks_per_explosion_number = n;
        self
    }

    pub fn with_minimal_amplitude_fraction(mut self, fraction: f64) -> Self {
        self.minimal_amplitude_fraction = fraction;
        self
    }

    /// Validates the settings.
    pub fn validate(&self) -> Result<()> {
        let m = self.explosion_sparks_number_modifier;
        if !m.is_finite() || m <= 0.0 {
            return Err(FwaError::Config(format!(
                "explosion_sparks_number_modifier must be positive and finite, got {m}"
            )));
        }

        let (a, b) = (
            self.explosion_sparks_number_lower_bound,
            self.explosion_sparks_number_upper_bound,
        );
        if !(0.0 < a && a < b && b < 1.0) {
            return Err(FwaError::Config(format!(
                "spark number bounds must satisfy 0 < a < b < 1, got a = {a}, b = {b}"
            )));
        }

        let amplitude = self.explosion_sparks_maximum_amplitude;
        if !amplitude.is_finite() || amplitude <= 0.0 {
            return Err(FwaError::Config(format!(
                "explosion_sparks_maximum_amplitude must be positive and finite, got {amplitude}"
            )));
        }

        let fraction = self.minimal_amplitude_fraction;
        if !(0.0..=1.0).contains(&fraction) {
            return Err(FwaError::Config(format!(
                "minimal_amplitude_fraction must be in [0, 1], got {fraction}"
            )));
        }

        Ok(())
    }
}
