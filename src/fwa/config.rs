//! FWA configuration.
//!
//! [`FwaConfig`] holds the population size, the explosion settings and the
//! strategy used at each stage of a step.

use crate::error::{FwaError, Result};
use crate::explode::ExploderSettings;
use crate::generation::EliteStrategy;

/// How explosion sparks are displaced around their firework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExplosionStrategy {
    /// Scalar amplitude, coin-flipped dimensions (2010).
    #[default]
    Classic,
    /// Scalar amplitude applied to every dimension (2012).
    AllDimensions,
    /// Per-dimension amplitudes with a minimal amplitude and uniform
    /// reseeding of escaped coordinates (2013).
    Enhanced,
}

/// How specific sparks are derived from their parent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpecificStrategy {
    /// `N(1, 1)` scaling of coin-flipped dimensions (2010).
    #[default]
    Gaussian,
    /// `N(1, 1)` scaling of every dimension (2012).
    GaussianAllDimensions,
    /// Scaling of the offset from the best solution by `U(1 - delta, 1 + delta)`.
    AttractRepulse { delta: f64 },
}

/// Which fireworks survive a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionStrategy {
    /// Best plus the most isolated fireworks (2010).
    #[default]
    DistanceBased,
    /// Best plus its nearest neighbours (2012).
    NearBest,
    /// The best fireworks by quality.
    Best,
    /// Best plus a uniform random sample.
    BestAndRandom,
    /// A uniform random sample.
    Random,
}

/// Parameters of the elite refinement that follows selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EliteConfig {
    pub strategy: EliteStrategy,

    /// Number of selected fireworks the landscape is fitted to.
    pub sample_size: usize,

    /// Degree of the least-squares polynomial.
    pub polynomial_degree: usize,
}

impl Default for EliteConfig {
    fn default() -> Self {
        Self {
            strategy: EliteStrategy::Ls2,
            sample_size: 5,
            polynomial_degree: 2,
        }
    }
}

/// Configuration for the Fireworks Algorithm.
///
/// # Defaults
///
/// The default is the 2010 algorithm:
///
/// ```
/// use u_fireworks::fwa::{FwaConfig, SelectionStrategy};
///
/// let config = FwaConfig::default();
/// assert_eq!(config.locations_number, 5);
/// assert_eq!(config.selection, SelectionStrategy::DistanceBased);
/// assert!(config.elite.is_none());
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_fireworks::fwa::{FwaConfig, SelectionStrategy, SpecificStrategy};
///
/// let config = FwaConfig::default()
///     .with_locations_number(8)
///     .with_specific_strategy(SpecificStrategy::AttractRepulse { delta: 0.5 })
///     .with_selection(SelectionStrategy::BestAndRandom)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FwaConfig {
    /// Number of fireworks kept after every step.
    pub locations_number: usize,

    /// Amplitude and spark-count parameters.
    pub exploder: ExploderSettings,

    /// Number of fireworks per step that also throw specific sparks.
    ///
    /// Parents are drawn without replacement; capped at the population size.
    pub specific_spark_parents_number: usize,

    pub explosion_strategy: ExplosionStrategy,

    pub specific_strategy: SpecificStrategy,

    pub selection: SelectionStrategy,

    /// Elite refinement after selection. `None` disables it.
    pub elite: Option<EliteConfig>,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for FwaConfig {
    fn default() -> Self {
        Self {
            locations_number: 5,
            exploder: ExploderSettings::default(),
            specific_spark_parents_number: 5,
            explosion_strategy: ExplosionStrategy::default(),
            specific_strategy: SpecificStrategy::default(),
            selection: SelectionStrategy::default(),
            elite: None,
            seed: None,
        }
    }
}

impl FwaConfig {
    pub fn with_locations_number(mut self, n: usize) -> Self {
        self.locations_number = n;
        self
    }

    pub fn with_exploder(mut self, settings: ExploderSettings) -> Self {
        self.exploder = settings;
        self
    }

    pub fn with_specific_spark_parents_number(mut self, n: usize) -> Self {
        self.specific_spark_parents_number = n;
        self
    }

    pub fn with_explosion_strategy(mut self, strategy: ExplosionStrategy) -> Self {
        self.explosion_strategy = strategy;
        self
    }

    pub fn with_specific_strategy(mut self, strategy: SpecificStrategy) -> Self {
        self.specific_strategy = strategy;
        self
    }

    pub fn with_selection(mut self, selection: SelectionStrategy) -> Self {
        self.selection = selection;
        self
    }

    /// Enables the elite refinement.
    pub fn with_elite(mut self, elite: EliteConfig) -> Self {
        self.elite = Some(elite);
        self
    }

    pub fn without_elite(mut self) -> Self {
        self.elite = None;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The original algorithm (Tan & Zhu, 2010).
    ///
    /// - Coin-flipped explosion and Gaussian sparks
    /// - Distance-based selection, no elite refinement
    pub fn fwa2010() -> Self {
        Self::default()
    }

    /// The 2012 variant (Pei et al.).
    ///
    /// - Every dimension displaced by explosion and Gaussian sparks
    /// - Near-best selection
    /// - LS2 elite refinement over the whole population
    pub fn fwa2012() -> Self {
        Self {
            explosion_strategy: ExplosionStrategy::AllDimensions,
            specific_strategy: SpecificStrategy::GaussianAllDimensions,
            selection: SelectionStrategy::NearBest,
            elite: Some(EliteConfig::default()),
            ..Self::default()
        }
    }

    /// The GPU-FWA flavour (Ding et al., 2013), run sequentially.
    ///
    /// - Enhanced explosion with a minimal amplitude
    /// - Attract-repulse specific sparks, `delta = 0.5`
    /// - Best-and-random selection
    pub fn gpu2013() -> Self {
        Self {
            explosion_strategy: ExplosionStrategy::Enhanced,
            specific_strategy: SpecificStrategy::AttractRepulse { delta: 0.5 },
            selection: SelectionStrategy::BestAndRandom,
            ..Self::default()
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// [`FwaError::Config`] describing the first invalid parameter.
    pub fn validate(&self) -> Result<()> {
        if self.locations_number == 0 {
            return Err(FwaError::Config("locations_number must be at least 1".into()));
        }
        self.exploder.validate()?;
        if self.specific_spark_parents_number > self.locations_number {
            return Err(FwaError::Config(format!(
                "specific_spark_parents_number ({}) exceeds locations_number ({})",
                self.specific_spark_parents_number, self.locations_number
            )));
        }
        if let SpecificStrategy::AttractRepulse { delta } = self.specific_strategy {
            if !delta.is_finite() || delta <= 0.0 {
                return Err(FwaError::Config(format!(
                    "attract-repulse delta must be positive and finite, got {delta}"
                )));
            }
        }
        if let Some(elite) = &self.elite {
            if elite.sample_size == 0 || elite.sample_size > self.locations_number {
                return Err(FwaError::Config(format!(
                    "elite sample_size must be in 1..={}, got {}",
                    self.locations_number, elite.sample_size
                )));
            }
            if elite.polynomial_degree == 0 {
                return Err(FwaError::Config("elite polynomial_degree must be at least 1".into()));
            }
        }
        Ok(())
    }
}
