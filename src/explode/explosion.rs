//! Explosion descriptors consumed by spark generators.

use crate::error::{ensure_finite, FwaError, Result};
use crate::model::{Firework, FireworkType};
use std::collections::BTreeMap;

/// How many sparks of each type an explosion should produce.
pub type SparkCounts = BTreeMap<FireworkType, usize>;

/// The variant-specific payload of an [`Explosion`].
#[derive(Debug, Clone)]
pub enum ExplosionKind {
    /// Population seeding; there is no parent.
    Initial,
    /// Explosion around a parent with a scalar amplitude.
    Firework { parent: Firework, amplitude: f64 },
    /// Explosion around a parent with one amplitude per dimension.
    Enhanced {
        parent: Firework,
        amplitudes: Vec<f64>,
    },
    /// A sample of the population used to approximate the landscape.
    Elite { fireworks: Vec<Firework> },
}

impl ExplosionKind {
    /// Short name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            ExplosionKind::Initial => "initial",
            ExplosionKind::Firework { .. } => "firework",
            ExplosionKind::Enhanced { .. } => "enhanced firework",
            ExplosionKind::Elite { .. } => "elite",
        }
    }
}

/// An immutable description of one explosion event.
#[derive(Debug, Clone)]
pub struct Explosion {
    step_number: usize,
    spark_counts: SparkCounts,
    kind: ExplosionKind,
}

impl Explosion {
    /// Seeds `spark_count` initial fireworks.
    pub fn initial(step_number: usize, spark_count: usize) -> Self {
        Self {
            step_number,
            spark_counts: SparkCounts::from([(FireworkType::Initial, spark_count)]),
            kind: ExplosionKind::Initial,
        }
    }

    /// Explosion around `parent` with a scalar amplitude.
    ///
    /// # Errors
    ///
    /// [`FwaError::NonFinite`] if `amplitude` is NaN or infinite.
    pub fn firework(
        parent: Firework,
        step_number: usize,
        amplitude: f64,
        spark_counts: SparkCounts,
    ) -> Result<Self> {
        ensure_finite("amplitude", amplitude)?;
        Ok(Self {
            step_number,
            spark_counts,
            kind: ExplosionKind::Firework { parent, amplitude },
        })
    }

    /// Explosion around `parent` with per-dimension amplitudes.
    pub fn enhanced(
        parent: Firework,
        step_number: usize,
        amplitudes: Vec<f64>,
        spark_counts: SparkCounts,
    ) -> Result<Self> {
        if amplitudes.len() != parent.coordinates().len() {
            return Err(FwaError::DimensionMismatch {
                expected: parent.coordinates().len(),
                actual: amplitudes.len(),
            });
        }
        for &amplitude in &amplitudes {
            ensure_finite("amplitude", amplitude)?;
        }
        Ok(Self {
            step_number,
            spark_counts,
            kind: ExplosionKind::Enhanced { parent, amplitudes },
        })
    }

    /// Elite explosion over a non-empty sample of evaluated fireworks.
    pub fn elite(
        fireworks: Vec<Firework>,
        step_number: usize,
        spark_counts: SparkCounts,
    ) -> Result<Self> {
        if fireworks.is_empty() {
            return Err(FwaError::Empty("elite sample"));
        }
        Ok(Self {
            step_number,
            spark_counts,
            kind: ExplosionKind::Elite { fireworks },
        })
    }

    pub fn step_number(&self) -> usize {
        self.step_number
    }

    pub fn spark_counts(&self) -> &SparkCounts {
        &self.spark_counts
    }

    /// Number of sparks of `kind` to produce, if any were requested.
    pub fn spark_count(&self, kind: FireworkType) -> Option<usize> {
        self.spark_counts.get(&kind).copied()
    }

    pub fn kind(&self) -> &ExplosionKind {
        &self.kind
    }

    /// The focus firework, for variants that have one.
    pub fn parent(&self) -> Option<&Firework> {
        match &self.kind {
            ExplosionKind::Firework { parent, .. } | ExplosionKind::Enhanced { parent, .. } => {
                Some(parent)
            }
            ExplosionKind::Initial | ExplosionKind::Elite { .. } => None,
        }
    }
}
