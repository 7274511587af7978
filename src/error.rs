//! Error type shared by every FWA component.
//!
//! All failures are deterministic argument or wiring faults: there is no
//! retry layer, and the driver treats any error as fatal to the current run.

use crate::model::{FireworkId, FireworkType};

/// Errors raised by the Fireworks Algorithm core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FwaError {
    /// A required collection was empty.
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// An argument is outside its valid domain.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// A value that must be finite was NaN or infinite.
    #[error("`{name}` must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    /// `minimum > maximum`, or a bound was NaN.
    #[error("invalid range: minimum {minimum} must not exceed maximum {maximum}")]
    InvalidRange { minimum: f64, maximum: f64 },

    /// A firework was exploded before the step it was born in.
    #[error("step {step} precedes firework birth step {birth_step}")]
    StepBeforeBirth { step: usize, birth_step: usize },

    /// A selector was asked for more fireworks than available.
    #[error("cannot select {requested} fireworks out of {available}")]
    SelectionCount { requested: usize, available: usize },

    /// Coordinate vectors of different lengths were combined.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A spark generator received an explosion variant it cannot handle.
    #[error("{generator} cannot handle {found} explosion (expected {expected})")]
    ExplosionMismatch {
        generator: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// Quality was assigned to a firework that already has one.
    #[error("firework {id} ({kind:?}) has already been evaluated")]
    AlreadyEvaluated { id: FireworkId, kind: FireworkType },

    /// A curve-fit, differentiation or root-finding service failed.
    #[error("numeric service failed: {0}")]
    Numeric(String),

    /// Configuration validation failed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FwaError>;

/// Fails with [`FwaError::NonFinite`] unless `value` is finite.
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FwaError::NonFinite { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_descriptive() {
        let err = FwaError::SelectionCount {
            requested: 7,
            available: 3,
        };
        assert_eq!(err.to_string(), "cannot select 7 fireworks out of 3");

        let err = FwaError::StepBeforeBirth {
            step: 1,
            birth_step: 2,
        };
        assert!(err.to_string().contains("precedes"));
    }

    #[test]
    fn test_ensure_finite() {
        assert_eq!(ensure_finite("x", 1.5), Ok(1.5));
        assert!(matches!(
            ensure_finite("x", f64::NAN),
            Err(FwaError::NonFinite { name: "x", .. })
        ));
        assert!(ensure_finite("x", f64::INFINITY).is_err());
    }
}
