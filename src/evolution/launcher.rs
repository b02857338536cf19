use std::time::Duration;

use tracing::info;

use super::{
    options::{EngineOptions, LogLevel},
    population::Population,
    Evaluator,
};
use crate::{
    chromosome::{Chromosome, Fitness},
    error::{GeneticError, Result},
    orchestrator::Orchestrator,
    rng::RandomNumberGenerator,
};

/// Represents the result of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvolutionResult {
    /// The fittest chromosome of the last generation.
    pub chromosome: Chromosome,
    /// Its fitness.
    pub fitness: Fitness,
    /// Number of completed generations after the initial one.
    pub generations: usize,
    /// `true` if the chromosome survives the whole course.
    pub solved: bool,
    /// Wall-clock time spent in the generational loop.
    pub elapsed: Duration,
    /// The last generation, in the order it was assembled: elites first.
    pub population: Population,
}

impl EvolutionResult {
    pub(crate) fn from_population(
        population: Population,
        generations: usize,
        elapsed: Duration,
    ) -> Self {
        Self {
            chromosome: population.fittest().clone(),
            fitness: population.best_fitness().unwrap_or(0),
            generations,
            solved: population.found_solution(),
            elapsed,
            population,
        }
    }
}

/// Runs a search with a given orchestrator and evaluator.
///
/// # Example
///
/// ```rust
/// use flapgen::{
///     evolution::{EngineOptions, EvolutionLauncher},
///     orchestrator::SequentialOrchestrator,
///     rng::RandomNumberGenerator,
/// };
///
/// let evaluator = |genes: &[bool]| genes.iter().take_while(|g| **g).count();
/// let launcher = EvolutionLauncher::new(SequentialOrchestrator::new(), evaluator);
///
/// let mut rng = RandomNumberGenerator::from_seed(42);
/// let result = launcher.evolve(&EngineOptions::new(100, 10, 0.2), &mut rng).unwrap();
///
/// assert!(result.solved);
/// assert_eq!(result.chromosome.genes(), &[true; 10]);
/// ```
#[derive(Clone)]
pub struct EvolutionLauncher<O, E>
where
    O: Orchestrator,
    E: Evaluator,
{
    orchestrator: O,
    evaluator: E,
}

impl<O, E> EvolutionLauncher<O, E>
where
    O: Orchestrator,
    E: Evaluator,
{
    pub fn new(orchestrator: O, evaluator: E) -> Self {
        Self {
            orchestrator,
            evaluator,
        }
    }

    pub fn orchestrator(&self) -> &O {
        &self.orchestrator
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Searches from a random initial population.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` for invalid options before any
    /// work is done, and propagates orchestrator failures.
    pub fn evolve(
        &self,
        options: &EngineOptions,
        rng: &mut RandomNumberGenerator,
    ) -> Result<EvolutionResult> {
        options.validate()?;

        let population = Population::random(
            options.get_population_size(),
            options.get_chromosome_length(),
            rng,
        )?;
        self.evolve_from(population, options, rng)
    }

    /// Searches from a caller-provided initial population.
    ///
    /// Every chromosome is scored again with this launcher's evaluator, so a
    /// fitness cached by another evaluator or deserialized is never trusted.
    ///
    /// # Errors
    ///
    /// Fails if the population does not match the configured size and length.
    pub fn evolve_from(
        &self,
        mut population: Population,
        options: &EngineOptions,
        rng: &mut RandomNumberGenerator,
    ) -> Result<EvolutionResult> {
        options.validate()?;

        if population.len() != options.get_population_size()
            || population.chromosome_length() != options.get_chromosome_length()
        {
            return Err(GeneticError::Configuration(format!(
                "initial population is {}x{}, options expect {}x{}",
                population.len(),
                population.chromosome_length(),
                options.get_population_size(),
                options.get_chromosome_length()
            )));
        }

        population.rescore(&self.evaluator)?;

        let result = self
            .orchestrator
            .run(population, &self.evaluator, options, rng)?;

        if *options.get_log_level() != LogLevel::None {
            info!(
                generations = result.generations,
                fitness = result.fitness,
                solved = result.solved,
                elapsed_ms = result.elapsed.as_secs_f64() * 1000.0,
                "search finished"
            );
        }

        Ok(result)
    }
}
