//! Fireworks Algorithm driver.
//!
//! Each step explodes every firework of the current population, throws
//! explosion and specific sparks, evaluates them through the [`Problem`],
//! merges them with the population and selects the survivors.
//!
//! # Key Types
//!
//! - [`FwaConfig`]: population size, exploder settings, strategies, presets
//! - [`FireworksAlgorithm`]: runs steps, either one at a time or until a
//!   [`StopCondition`](crate::stop::StopCondition) holds
//! - [`FwaResult`]: best solution and per-step history of a run
//!
//! # References
//!
//! - Tan & Zhu (2010), "Fireworks Algorithm for Optimization"
//! - Pei, Zheng, Tan & Takagi (2012), "An Empirical Study on Influence of
//!   Approximation Approaches on Enhancing Fireworks Algorithm"
//! - Ding, Zheng & Tan (2013), "GPU-based Parallel Fireworks Algorithm for
//!   Optimization"
//!
//! [`Problem`]: crate::problem::Problem

mod config;
mod runner;

pub use config::{EliteConfig, ExplosionStrategy, FwaConfig, SelectionStrategy, SpecificStrategy};
pub use runner::{FireworksAlgorithm, FwaResult};
