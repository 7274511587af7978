//! Search-space model: ranges, dimensions, fireworks and algorithm state.

mod dimension;
mod firework;
mod range;
mod state;

pub use dimension::{Dimension, DimensionId};
pub use firework::{Firework, FireworkId, FireworkIds, FireworkType, Solution};
pub use range::Range;
pub use state::AlgorithmState;
