//! # EngineOptions
//!
//! The `EngineOptions` struct holds the configuration of a search: population
//! size, chromosome length, selection ratio, worker count, crossover split
//! policy, logging level and an optional generation cap.
//!
//! ## Example
//!
//! ```rust
//! use flapgen::evolution::options::{EngineOptions, LogLevel, WorkerCount};
//!
//! // Create a new EngineOptions instance with custom parameters
//! let options = EngineOptions::new(100, 10, 0.2);
//! assert_eq!(options.elite_count(), 20);
//!
//! // Or use the builder
//! let options = EngineOptions::builder()
//!     .population_size(500)
//!     .chromosome_length(64)
//!     .selection_ratio(0.1)
//!     .workers(WorkerCount::Fixed(4))
//!     .log_level(LogLevel::Minimal)
//!     .build();
//! assert!(options.validate().is_ok());
//! ```
//!
//! ## Validation
//!
//! `validate` rejects a zero population size, a zero chromosome length, a
//! selection ratio outside `(0, 1)`, a ratio that leaves no elite
//! (`floor(N * r) == 0`) and an explicit worker count of zero. Every engine
//! entry point validates before spawning any thread.

use std::num::NonZeroUsize;
use std::thread;

use crate::{
    breeding::SplitPolicy,
    error::{GeneticError, Result},
};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// One progress record per generation plus the fittest genes.
    Verbose,
    /// One progress record per generation.
    Minimal,
    None,
}

/// How many persistent workers the pooled orchestrator starts.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerCount {
    /// Half of the available hardware parallelism, at least one.
    Auto,
    Fixed(usize),
}

impl WorkerCount {
    /// Resolves the count to a concrete, positive number of workers.
    pub fn resolve(&self) -> Result<usize> {
        match *self {
            WorkerCount::Auto => {
                let hardware = thread::available_parallelism()
                    .map(NonZeroUsize::get)
                    .unwrap_or(1);
                Ok((hardware / 2).max(1))
            }
            WorkerCount::Fixed(0) => Err(GeneticError::Configuration(
                "Worker count cannot be zero".to_string(),
            )),
            WorkerCount::Fixed(n) => Ok(n),
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    population_size: usize,
    chromosome_length: usize,
    selection_ratio: f64,
    workers: WorkerCount,
    split_policy: SplitPolicy,
    log_level: LogLevel,
    /// Stop after this many generations even without a solution.
    max_generations: Option<usize>,
}

impl EngineOptions {
    pub fn new(population_size: usize, chromosome_length: usize, selection_ratio: f64) -> Self {
        Self {
            population_size,
            chromosome_length,
            selection_ratio,
            ..Self::default()
        }
    }

    /// Returns a builder for creating an `EngineOptions` instance.
    pub fn builder() -> EngineOptionsBuilder {
        EngineOptionsBuilder::default()
    }

    /// Checks every configuration constraint.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` describing the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(GeneticError::Configuration(
                "Population size cannot be zero".to_string(),
            ));
        }

        if self.chromosome_length == 0 {
            return Err(GeneticError::Configuration(
                "Chromosome length cannot be zero".to_string(),
            ));
        }

        if !self.selection_ratio.is_finite()
            || self.selection_ratio <= 0.0
            || self.selection_ratio >= 1.0
        {
            return Err(GeneticError::Configuration(format!(
                "Selection ratio must lie strictly between 0 and 1, got {}",
                self.selection_ratio
            )));
        }

        if self.elite_count() == 0 {
            return Err(GeneticError::Configuration(format!(
                "Selection ratio {} keeps no elite out of a population of {}",
                self.selection_ratio, self.population_size
            )));
        }

        self.workers.resolve()?;

        Ok(())
    }

    /// Number of elites carried over each generation, `floor(N * r)`.
    pub fn elite_count(&self) -> usize {
        (self.population_size as f64 * self.selection_ratio).floor() as usize
    }

    pub fn get_population_size(&self) -> usize {
        self.population_size
    }

    pub fn get_chromosome_length(&self) -> usize {
        self.chromosome_length
    }

    pub fn get_selection_ratio(&self) -> f64 {
        self.selection_ratio
    }

    pub fn get_workers(&self) -> WorkerCount {
        self.workers
    }

    pub fn get_split_policy(&self) -> SplitPolicy {
        self.split_policy
    }

    pub fn get_log_level(&self) -> &LogLevel {
        &self.log_level
    }

    pub fn get_max_generations(&self) -> Option<usize> {
        self.max_generations
    }

    pub fn set_population_size(&mut self, population_size: usize) {
        self.population_size = population_size;
    }

    pub fn set_chromosome_length(&mut self, chromosome_length: usize) {
        self.chromosome_length = chromosome_length;
    }

    pub fn set_selection_ratio(&mut self, selection_ratio: f64) {
        self.selection_ratio = selection_ratio;
    }

    pub fn set_workers(&mut self, workers: WorkerCount) {
        self.workers = workers;
    }

    pub fn set_split_policy(&mut self, split_policy: SplitPolicy) {
        self.split_policy = split_policy;
    }

    pub fn set_log_level(&mut self, log_level: LogLevel) {
        self.log_level = log_level;
    }

    pub fn set_max_generations(&mut self, max_generations: Option<usize>) {
        self.max_generations = max_generations;
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            population_size: 1000,
            chromosome_length: 100,
            selection_ratio: 0.2,
            workers: WorkerCount::Auto,
            split_policy: SplitPolicy::Midpoint,
            log_level: LogLevel::None,
            max_generations: None,
        }
    }
}

/// Builder for `EngineOptions`.
///
/// Unset fields fall back to `EngineOptions::default()`.
#[derive(Debug, Clone, Default)]
pub struct EngineOptionsBuilder {
    population_size: Option<usize>,
    chromosome_length: Option<usize>,
    selection_ratio: Option<f64>,
    workers: Option<WorkerCount>,
    split_policy: Option<SplitPolicy>,
    log_level: Option<LogLevel>,
    max_generations: Option<usize>,
}

impl EngineOptionsBuilder {
    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    pub fn chromosome_length(mut self, value: usize) -> Self {
        self.chromosome_length = Some(value);
        self
    }

    pub fn selection_ratio(mut self, value: f64) -> Self {
        self.selection_ratio = Some(value);
        self
    }

    pub fn workers(mut self, value: WorkerCount) -> Self {
        self.workers = Some(value);
        self
    }

    pub fn split_policy(mut self, value: SplitPolicy) -> Self {
        self.split_policy = Some(value);
        self
    }

    pub fn log_level(mut self, value: LogLevel) -> Self {
        self.log_level = Some(value);
        self
    }

    pub fn max_generations(mut self, value: usize) -> Self {
        self.max_generations = Some(value);
        self
    }

    /// Builds the `EngineOptions` instance.
    pub fn build(self) -> EngineOptions {
        let defaults = EngineOptions::default();
        EngineOptions {
            population_size: self.population_size.unwrap_or(defaults.population_size),
            chromosome_length: self
                .chromosome_length
                .unwrap_or(defaults.chromosome_length),
            selection_ratio: self.selection_ratio.unwrap_or(defaults.selection_ratio),
            workers: self.workers.unwrap_or(defaults.workers),
            split_policy: self.split_policy.unwrap_or(defaults.split_policy),
            log_level: self.log_level.unwrap_or(defaults.log_level),
            max_generations: self.max_generations.or(defaults.max_generations),
        }
    }
}
