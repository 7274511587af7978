//! Fireworks Algorithm (FWA) for continuous black-box optimization.
//!
//! A population of fireworks explodes every step. Each explosion throws
//! sparks around its firework; the sparks are evaluated, merged with the
//! population and the survivors are selected for the next step.
//!
//! - **Explosions** ([`explode`]): amplitude and spark count per firework,
//!   derived from the qualities of the whole population
//! - **Spark generators** ([`generation`]): explosion, Gaussian, enhanced,
//!   attract-repulse and elite sparks behind one [`SparkGenerator`] trait
//! - **Selection** ([`selection`]): distance-based, near-best, best,
//!   best-and-random and random survivor selection
//! - **Driver** ([`fwa`]): the step loop, configurable per paper variant
//!   (2010, 2012, GPU-FWA 2013)
//!
//! # Quick start
//!
//! ```
//! use u_fireworks::fwa::{FireworksAlgorithm, FwaConfig};
//! use u_fireworks::model::Range;
//! use u_fireworks::problem::{FunctionProblem, ProblemTarget};
//! use u_fireworks::stop::StepLimit;
//!
//! let problem = FunctionProblem::uniform(
//!     3,
//!     Range::new(-5.0, 5.0).unwrap(),
//!     ProblemTarget::Minimum,
//!     |x: &[f64]| x.iter().map(|v| v * v).sum(),
//! );
//! let mut fwa = FireworksAlgorithm::new(problem, FwaConfig::fwa2012().with_seed(7)).unwrap();
//! let result = fwa.solve(&StepLimit::new(10)).unwrap();
//! assert_eq!(result.best.coordinates.len(), 3);
//! ```
//!
//! # Logging
//!
//! The crate logs through the [`log`] facade and installs no logger.
//!
//! [`SparkGenerator`]: generation::SparkGenerator

pub mod distance;
pub mod error;
pub mod explode;
pub mod fwa;
pub mod generation;
pub mod model;
pub mod numeric;
pub mod problem;
pub mod selection;
pub mod stop;

pub use error::{FwaError, Result};
