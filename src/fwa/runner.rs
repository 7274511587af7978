//! FWA step loop execution.
//!
//! [`FireworksAlgorithm`] orchestrates one step as:
//! explode → explosion sparks → specific sparks → evaluate → merge →
//! select → elite refinement → best update.

use super::config::{ExplosionStrategy, FwaConfig, SelectionStrategy, SpecificStrategy};
use crate::error::{ensure_finite, FwaError, Result};
use crate::explode::{Exploder, Explosion, SparkCounts};
use crate::generation::{
    AttractRepulseSparkGenerator, EliteStrategyGenerator, EnhancedExplosionSparkGenerator,
    ExplosionSparkGenerator, GaussianSparkGenerator, InitialSparkGenerator, SparkGenerator,
};
use crate::model::{AlgorithmState, Dimension, Firework, FireworkIds, FireworkType, Solution};
use crate::numeric::{
    BisectionSolver, CurveFitter, Differentiator, EquationSolver, LeastSquaresFitter,
    PolynomialDifferentiator,
};
use crate::problem::{Problem, ProblemTarget};
use crate::selection::{
    BestAndRandomSelector, BestSelector, DistanceBasedSelector, FireworkSelector, NearBestSelector,
    RandomSelector,
};
use crate::stop::StopCondition;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

/// Result of an FWA run.
#[derive(Debug, Clone)]
pub struct FwaResult {
    /// The best solution found during the entire run.
    pub best: Solution,

    /// Best quality (same as `best.quality`).
    pub best_quality: f64,

    /// Total number of steps executed.
    pub steps: usize,

    /// Best quality after initialization and after every step.
    pub quality_history: Vec<f64>,

    /// State after the last step.
    pub final_state: AlgorithmState,
}

/// Executes the Fireworks Algorithm on a [`Problem`].
///
/// # Usage
///
/// ```
/// use u_fireworks::fwa::{FireworksAlgorithm, FwaConfig};
/// use u_fireworks::model::Range;
/// use u_fireworks::problem::{FunctionProblem, ProblemTarget};
/// use u_fireworks::stop::StepLimit;
///
/// let sphere = FunctionProblem::uniform(
///     2,
///     Range::new(-10.0, 10.0).unwrap(),
///     ProblemTarget::Minimum,
///     |x: &[f64]| x.iter().map(|v| v * v).sum(),
/// );
/// let mut fwa = FireworksAlgorithm::new(sphere, FwaConfig::default().with_seed(42)).unwrap();
/// let result = fwa.solve(&StepLimit::new(20)).unwrap();
///
/// assert_eq!(result.steps, 20);
/// assert_eq!(result.quality_history.len(), 21);
/// assert!(result.best_quality <= result.quality_history[0]);
/// ```
pub struct FireworksAlgorithm<P: Problem> {
    problem: P,
    config: FwaConfig,
    exploder: Exploder,
    initial_generator: InitialSparkGenerator,
    explosion_generator: Box<dyn SparkGenerator>,
    specific_generator: Box<dyn SparkGenerator>,
    elite_generator: Option<EliteStrategyGenerator>,
    selector: Box<dyn FireworkSelector>,
    rng: StdRng,
}

impl<P: Problem> FireworksAlgorithm<P> {
    /// Builds the exploder, generators and selector described by `config`.
    ///
    /// # Errors
    ///
    /// - [`FwaError::Config`] if the configuration is invalid
    /// - [`FwaError::Empty`] if the problem has no dimensions
    pub fn new(problem: P, config: FwaConfig) -> Result<Self> {
        config.validate()?;

        let target = problem.target();
        let dimensions = problem.dimensions().to_vec();
        let exploder = Exploder::new(config.exploder.clone(), target)?;
        let initial_generator =
            InitialSparkGenerator::with_initial_ranges(dimensions.clone(), problem.initial_ranges())?;
        let explosion_generator = build_explosion_generator(config.explosion_strategy, &dimensions)?;
        let specific_generator = build_specific_generator(config.specific_strategy, &dimensions)?;
        let elite_generator = match &config.elite {
            Some(elite) => Some(EliteStrategyGenerator::with_services(
                dimensions,
                elite.strategy,
                target,
                Box::new(LeastSquaresFitter {
                    degree: elite.polynomial_degree,
                }),
                Box::new(PolynomialDifferentiator),
                Box::new(BisectionSolver::default()),
            )?),
            None => None,
        };
        let selector = build_selector(config.selection, target);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        Ok(Self {
            problem,
            config,
            exploder,
            initial_generator,
            explosion_generator,
            specific_generator,
            elite_generator,
            selector,
            rng,
        })
    }

    /// Replaces the configured selection strategy.
    pub fn with_selector(mut self, selector: Box<dyn FireworkSelector>) -> Self {
        self.selector = selector;
        self
    }

    /// Replaces the numeric services used by the elite refinement.
    ///
    /// # Errors
    ///
    /// [`FwaError::Config`] if the configuration has no elite refinement.
    pub fn with_elite_services(
        mut self,
        fitter: Box<dyn CurveFitter>,
        differentiator: Box<dyn Differentiator>,
        solver: Box<dyn EquationSolver>,
    ) -> Result<Self> {
        let elite = self
            .config
            .elite
            .ok_or_else(|| FwaError::Config("elite refinement is disabled".into()))?;
        self.elite_generator = Some(EliteStrategyGenerator::with_services(
            self.problem.dimensions().to_vec(),
            elite.strategy,
            self.problem.target(),
            fitter,
            differentiator,
            solver,
        )?);
        Ok(self)
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }

    pub fn config(&self) -> &FwaConfig {
        &self.config
    }

    /// Creates and evaluates the step-0 population.
    pub fn initialize(&mut self) -> Result<AlgorithmState> {
        let mut ids = FireworkIds::new();
        let explosion = Explosion::initial(0, self.config.locations_number);
        let mut fireworks = self
            .initial_generator
            .create_sparks(&explosion, &mut ids, &mut self.rng)?;
        self.calculate_qualities(&mut fireworks)?;

        let best = self.problem.target().best(&fireworks)?.to_solution();
        log::debug!(
            "initialized {} fireworks, best quality {}",
            fireworks.len(),
            best.quality
        );
        Ok(AlgorithmState::from_parts(fireworks, 0, best, ids))
    }

    /// Makes one step and returns the next state; `state` is left untouched.
    pub fn make_step(&mut self, state: &AlgorithmState) -> Result<AlgorithmState> {
        let mut next = state.clone();
        self.make_step_in_place(&mut next)?;
        Ok(next)
    }

    /// Makes one step, updating `state`.
    ///
    /// On error `state` is unchanged.
    pub fn make_step_in_place(&mut self, state: &mut AlgorithmState) -> Result<()> {
        let mut ids = state.ids().clone();
        let (fireworks, best) = self.step(state, &mut ids)?;
        *state.ids_mut() = ids;
        state.advance(fireworks, best);

        let best_quality = state.best_solution().quality;
        log::debug!(
            "step {}: {} fireworks, best quality {}",
            state.step_number(),
            state.fireworks().len(),
            best_quality
        );
        self.problem.on_step(state.step_number(), best_quality);
        Ok(())
    }

    /// Evaluates every firework exactly once.
    ///
    /// # Errors
    ///
    /// - [`FwaError::AlreadyEvaluated`] if a firework already has a quality
    /// - [`FwaError::NonFinite`] if the problem returns NaN or an infinity
    pub fn calculate_qualities(&self, fireworks: &mut [Firework]) -> Result<()> {
        for firework in fireworks.iter_mut() {
            if firework.is_evaluated() {
                return Err(FwaError::AlreadyEvaluated {
                    id: firework.id(),
                    kind: firework.kind(),
                });
            }
            let quality = self.problem.calculate_quality(firework.coordinates());
            firework.set_quality(ensure_finite("quality", quality)?)?;
        }
        Ok(())
    }

    /// Runs until `stop` is satisfied.
    ///
    /// `stop` is checked after initialization and after every step, so a
    /// condition that never holds loops forever.
    pub fn solve<S: StopCondition + ?Sized>(&mut self, stop: &S) -> Result<FwaResult> {
        log::info!(
            "FWA starting: {} dimensions, {} locations, {:?} selection",
            self.problem.dimensions().len(),
            self.config.locations_number,
            self.config.selection
        );

        let mut state = self.initialize()?;
        let mut quality_history = vec![state.best_solution().quality];
        while !stop.should_stop(&state) {
            self.make_step_in_place(&mut state)?;
            quality_history.push(state.best_solution().quality);
        }

        let best = state.best_solution().clone();
        log::info!(
            "FWA finished after {} steps, best quality {}",
            state.step_number(),
            best.quality
        );
        Ok(FwaResult {
            best_quality: best.quality,
            best,
            steps: state.step_number(),
            quality_history,
            final_state: state,
        })
    }

    /// Computes the next population and best solution.
    fn step(&mut self, state: &AlgorithmState, ids: &mut FireworkIds) -> Result<(Vec<Firework>, Solution)> {
        let current = state.fireworks();
        let step_number = state.step_number() + 1;
        let target = self.problem.target();
        self.specific_generator.publish_best(state.best_solution());

        // 1. Explode every firework
        let explosions = current
            .iter()
            .map(|focus| match self.config.explosion_strategy {
                ExplosionStrategy::Enhanced => self.exploder.explode_enhanced(
                    focus,
                    current,
                    step_number,
                    self.problem.dimensions(),
                ),
                ExplosionStrategy::Classic | ExplosionStrategy::AllDimensions => {
                    self.exploder.explode(focus, current, step_number)
                }
            })
            .collect::<Result<Vec<Explosion>>>()?;

        // 2. Explosion sparks for all, specific sparks for a random subset
        let mut sparks = Vec::new();
        for explosion in &explosions {
            sparks.extend(self.explosion_generator.create_sparks(explosion, ids, &mut self.rng)?);
        }
        let parents = self.config.specific_spark_parents_number.min(explosions.len());
        for i in index::sample(&mut self.rng, explosions.len(), parents) {
            sparks.extend(self.specific_generator.create_sparks(&explosions[i], ids, &mut self.rng)?);
        }

        // 3. Evaluate, merge, select
        self.calculate_qualities(&mut sparks)?;
        let mut merged = current.to_vec();
        merged.extend(sparks);
        let mut selected = self
            .selector
            .select(&merged, self.config.locations_number, &mut self.rng)?;

        // 4. Elite refinement
        let elite = self.refine(&mut selected, step_number, ids)?;

        // 5. Best known solution
        let mut best = state.best_solution().clone();
        let newest_best = target.best(&merged)?;
        if target.is_better(newest_best.quality(), best.quality) {
            best = newest_best.to_solution();
        }
        if let Some(elite) = elite {
            if target.is_better(elite.quality(), best.quality) {
                best = elite.to_solution();
            }
        }

        Ok((selected, best))
    }

    /// Replaces the worst selected firework with an elite spark if it is
    /// strictly better. Returns the elite spark when one was created.
    ///
    /// Numeric failures skip the refinement for this step.
    fn refine(
        &mut self,
        selected: &mut [Firework],
        step_number: usize,
        ids: &mut FireworkIds,
    ) -> Result<Option<Firework>> {
        let (Some(generator), Some(elite)) = (&self.elite_generator, &self.config.elite) else {
            return Ok(None);
        };

        let sample_size = elite.sample_size.min(selected.len());
        let sample: Vec<Firework> = index::sample(&mut self.rng, selected.len(), sample_size)
            .into_iter()
            .map(|i| selected[i].clone())
            .collect();
        let counts = SparkCounts::from([(FireworkType::EliteFirework, 1)]);
        let explosion = Explosion::elite(sample, step_number, counts)?;

        let mut sparks = match generator.create_sparks(&explosion, ids, &mut self.rng) {
            Ok(sparks) => sparks,
            Err(FwaError::Numeric(reason)) => {
                log::warn!("step {step_number}: elite refinement skipped: {reason}");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        self.calculate_qualities(&mut sparks)?;
        let Some(spark) = sparks.pop() else {
            return Ok(None);
        };

        let target = self.problem.target();
        let worst = target.worst(selected)?;
        if target.is_better(spark.quality(), worst.quality()) {
            let worst_id = worst.id();
            if let Some(slot) = selected.iter_mut().find(|f| f.id() == worst_id) {
                log::trace!(
                    "step {step_number}: elite spark {} ({}) replaces {} ({})",
                    spark.id(),
                    spark.quality(),
                    worst_id,
                    slot.quality()
                );
                *slot = spark.clone();
            }
        }
        Ok(Some(spark))
    }
}

fn build_explosion_generator(
    strategy: ExplosionStrategy,
    dimensions: &[Dimension],
) -> Result<Box<dyn SparkGenerator>> {
    let dimensions = dimensions.to_vec();
    Ok(match strategy {
        ExplosionStrategy::Classic => Box::new(ExplosionSparkGenerator::new(dimensions)?),
        ExplosionStrategy::AllDimensions => Box::new(ExplosionSparkGenerator::all_dimensions(dimensions)?),
        ExplosionStrategy::Enhanced => Box::new(EnhancedExplosionSparkGenerator::new(dimensions)?),
    })
}

fn build_specific_generator(
    strategy: SpecificStrategy,
    dimensions: &[Dimension],
) -> Result<Box<dyn SparkGenerator>> {
    let dimensions = dimensions.to_vec();
    Ok(match strategy {
        SpecificStrategy::Gaussian => Box::new(GaussianSparkGenerator::new(dimensions)?),
        SpecificStrategy::GaussianAllDimensions => {
            Box::new(GaussianSparkGenerator::all_dimensions(dimensions)?)
        }
        SpecificStrategy::AttractRepulse { delta } => {
            Box::new(AttractRepulseSparkGenerator::new(dimensions, delta)?)
        }
    })
}

fn build_selector(selection: SelectionStrategy, target: ProblemTarget) -> Box<dyn FireworkSelector> {
    match selection {
        SelectionStrategy::DistanceBased => Box::new(DistanceBasedSelector::new(target)),
        SelectionStrategy::NearBest => Box::new(NearBestSelector::new(target)),
        SelectionStrategy::Best => Box::new(BestSelector::new(target)),
        SelectionStrategy::BestAndRandom => Box::new(BestAndRandomSelector::new(target)),
        SelectionStrategy::Random => Box::new(RandomSelector),
    }
}
