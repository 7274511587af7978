//! Explosions: amplitude and spark-count computation.
//!
//! The [`Exploder`] turns a firework and the current population into an
//! [`Explosion`] describing how far and how many sparks the firework
//! throws. Spark generators in [`crate::generation`] consume explosions.
//!
//! # References
//!
//! - Tan & Zhu (2010), "Fireworks Algorithm for Optimization", ICSI 2010
//! - Zheng, Janecek & Tan (2013), "Enhanced Fireworks Algorithm", IEEE CEC 2013

mod config;
mod exploder;
mod explosion;

pub use config::ExploderSettings;
pub use exploder::Exploder;
pub use explosion::{Explosion, ExplosionKind, SparkCounts};
