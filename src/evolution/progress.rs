use std::time::Duration;

use tracing::{debug, info};

use super::{options::LogLevel, population::Population};
use crate::chromosome::Fitness;

/// One progress record, emitted after every completed generation.
///
/// Purely informational: nothing in the search reads it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationRecord {
    pub generation: usize,
    pub elapsed: Duration,
    pub best_fitness: Fitness,
}

impl GenerationRecord {
    pub fn new(generation: usize, elapsed: Duration, population: &Population) -> Self {
        Self {
            generation,
            elapsed,
            best_fitness: population.best_fitness().unwrap_or(0),
        }
    }

    /// Emits the record as a `tracing` event according to `level`.
    pub fn report(&self, level: &LogLevel, population: &Population) {
        match level {
            LogLevel::None => {}
            LogLevel::Minimal => self.emit(population),
            LogLevel::Verbose => {
                self.emit(population);
                debug!(
                    generation = self.generation,
                    fittest = population.fittest_index(),
                    genes = %population.fittest(),
                    "fittest chromosome"
                );
            }
        }
    }

    fn emit(&self, population: &Population) {
        info!(
            generation = self.generation,
            elapsed_ms = self.elapsed.as_secs_f64() * 1000.0,
            best_fitness = self.best_fitness,
            course_length = population.chromosome_length(),
            "generation complete"
        );
    }
}
