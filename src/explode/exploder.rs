//! Explosion amplitude and spark-count computation.

use super::config::ExploderSettings;
use super::explosion::{Explosion, SparkCounts};
use crate::error::{FwaError, Result};
use crate::model::{Dimension, Firework, FireworkType};
use crate::problem::ProblemTarget;

/// Smallest positive subnormal `f64`; keeps the ratios defined when every
/// quality in the population is equal.
const EPSILON: f64 = f64::MIN_POSITIVE * f64::EPSILON;

/// Computes explosions for the fireworks of a population.
///
/// Better fireworks get smaller amplitudes and more sparks (Tan & Zhu, 2010):
///
/// ```text
/// A_i = Â · (|f(x_i) − y_best| + ε) / (Σ_j |f(x_j) − y_best| + ε)
/// s_i = m · (|y_worst − f(x_i)| + ε) / (Σ_j |y_worst − f(x_j)| + ε)
/// ```
///
/// `s_i` is then bounded to `[round(a·m), round(b·m)]` and rounded half away
/// from zero.
#[derive(Debug, Clone)]
pub struct Exploder {
    settings: ExploderSettings,
    target: ProblemTarget,
    min_allowed_explosion_sparks_number_exact: f64,
    max_allowed_explosion_sparks_number_exact: f64,
    min_allowed_explosion_sparks_number: usize,
    max_allowed_explosion_sparks_number: usize,
}

impl Exploder {
    /// Creates an exploder for a problem with the given optimization target.
    ///
    /// # Errors
    ///
    /// [`FwaError::Config`] if `settings` fail validation.
    pub fn new(settings: ExploderSettings, target: ProblemTarget) -> Result<Self> {
        settings.validate()?;

        let m = settings.explosion_sparks_number_modifier;
        let min_exact = settings.explosion_sparks_number_lower_bound * m;
        let max_exact = settings.explosion_sparks_number_upper_bound * m;

        Ok(Self {
            min_allowed_explosion_sparks_number_exact: min_exact,
            max_allowed_explosion_sparks_number_exact: max_exact,
            min_allowed_explosion_sparks_number: min_exact.round() as usize,
            max_allowed_explosion_sparks_number: max_exact.round() as usize,
            settings,
            target,
        })
    }

    pub fn settings(&self) -> &ExploderSettings {
        &self.settings
    }

    /// Inclusive bounds on the explosion sparks of a single firework.
    pub fn explosion_sparks_bounds(&self) -> (usize, usize) {
        (
            self.min_allowed_explosion_sparks_number,
            self.max_allowed_explosion_sparks_number,
        )
    }

    /// Creates the explosion of `focus` for the step being computed.
    ///
    /// `current_step_number` may equal the focus' birth step, so a firework
    /// born in a step can explode in that same step.
    ///
    /// # Errors
    ///
    /// - [`FwaError::Empty`] if `current_fireworks` is empty
    /// - [`FwaError::StepBeforeBirth`] if the step precedes the focus' birth
    /// - [`FwaError::NonFinite`] if the amplitude degenerates
    pub fn explode(
        &self,
        focus: &Firework,
        current_fireworks: &[Firework],
        current_step_number: usize,
    ) -> Result<Explosion> {
        check_step(focus, current_step_number)?;

        let amplitude = self.calculate_amplitude(focus, current_fireworks)?;
        let spark_counts = self.spark_counts(focus, current_fireworks)?;

        log::trace!(
            "firework {} explodes at step {}: amplitude {:.6}, sparks {:?}",
            focus.id(),
            current_step_number,
            amplitude,
            spark_counts
        );

        Explosion::firework(focus.clone(), current_step_number, amplitude, spark_counts)
    }

    /// Creates an explosion with one amplitude per dimension.
    ///
    /// Each amplitude is the scalar amplitude, raised to at least
    /// `minimal_amplitude_fraction` of the dimension's length so that the
    /// best firework keeps exploring.
    pub fn explode_enhanced(
        &self,
        focus: &Firework,
        current_fireworks: &[Firework],
        current_step_number: usize,
        dimensions: &[Dimension],
    ) -> Result<Explosion> {
        check_step(focus, current_step_number)?;
        if focus.coordinates().len() != dimensions.len() {
            return Err(FwaError::DimensionMismatch {
                expected: dimensions.len(),
                actual: focus.coordinates().len(),
            });
        }

        let amplitude = self.calculate_amplitude(focus, current_fireworks)?;
        let amplitudes = dimensions
            .iter()
            .map(|dimension| {
                let length = dimension.variation_range().length();
                if length.is_finite() {
                    amplitude.max(self.settings.minimal_amplitude_fraction * length)
                } else {
                    amplitude
                }
            })
            .collect();
        let spark_counts = self.spark_counts(focus, current_fireworks)?;

        Explosion::enhanced(focus.clone(), current_step_number, amplitudes, spark_counts)
    }

    /// Explosion amplitude of `focus` relative to the population.
    pub fn calculate_amplitude(&self, focus: &Firework, current_fireworks: &[Firework]) -> Result<f64> {
        let best_quality = self.target.best(current_fireworks)?.quality();

        let numerator = (focus.quality() - best_quality).abs() + EPSILON;
        let denominator = current_fireworks
            .iter()
            .map(|fw| (fw.quality() - best_quality).abs())
            .sum::<f64>()
            + EPSILON;

        let amplitude = self.settings.explosion_sparks_maximum_amplitude * (numerator / denominator);
        if amplitude.is_finite() {
            Ok(amplitude)
        } else {
            Err(FwaError::NonFinite {
                name: "amplitude",
                value: amplitude,
            })
        }
    }

    /// Bounded, rounded number of explosion sparks for `focus`.
    pub fn count_explosion_sparks(&self, focus: &Firework, current_fireworks: &[Firework]) -> Result<usize> {
        let exact = self.count_explosion_sparks_exact(focus, current_fireworks)?;

        let count = if exact < self.min_allowed_explosion_sparks_number_exact {
            self.min_allowed_explosion_sparks_number
        } else if exact > self.max_allowed_explosion_sparks_number_exact {
            self.max_allowed_explosion_sparks_number
        } else {
            exact.round() as usize
        };
        Ok(count)
    }

    fn count_explosion_sparks_exact(&self, focus: &Firework, current_fireworks: &[Firework]) -> Result<f64> {
        let worst_quality = self.target.worst(current_fireworks)?.quality();

        let numerator = (worst_quality - focus.quality()).abs() + EPSILON;
        let denominator = current_fireworks
            .iter()
            .map(|fw| (worst_quality - fw.quality()).abs())
            .sum::<f64>()
            + EPSILON;

        let exact = self.settings.explosion_sparks_number_modifier * (numerator / denominator);
        if exact.is_nan() {
            return Err(FwaError::NonFinite {
                name: "explosion sparks number",
                value: exact,
            });
        }
        Ok(exact)
    }

    fn spark_counts(&self, focus: &Firework, current_fireworks: &[Firework]) -> Result<SparkCounts> {
        Ok(SparkCounts::from([
            (
                FireworkType::ExplosionSpark,
                self.count_explosion_sparks(focus, current_fireworks)?,
            ),
            (
                FireworkType::SpecificSpark,
                self.settings.specific_sparks_per_explosion_number,
            ),
        ]))
    }
}

fn check_step(focus: &Firework, current_step_number: usize) -> Result<()> {
    if current_step_number < focus.birth_step_number() {
        return Err(FwaError::StepBeforeBirth {
            step: current_step_number,
            birth_step: focus.birth_step_number(),
        });
    }
    Ok(())
}
