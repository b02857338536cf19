use std::time::Instant;

use super::{should_stop, Orchestrator};
use crate::{
    breeding::Breeder,
    error::Result,
    evolution::{
        options::EngineOptions, population::Population, progress::GenerationRecord,
        EvolutionResult, Evaluator,
    },
    rng::RandomNumberGenerator,
    selection::ElitistSelection,
};

/// Runs every operator on the calling thread.
///
/// The reference control loop: select into a fresh buffer, breed the rest of
/// it, swap it in and rescan for the fittest chromosome.
#[derive(Debug, Clone, Default)]
pub struct SequentialOrchestrator;

impl SequentialOrchestrator {
    pub fn new() -> Self {
        Self
    }
}

impl Orchestrator for SequentialOrchestrator {
    fn run<E>(
        &self,
        mut population: Population,
        evaluator: &E,
        options: &EngineOptions,
        rng: &mut RandomNumberGenerator,
    ) -> Result<EvolutionResult>
    where
        E: Evaluator + ?Sized,
    {
        let started = Instant::now();
        let selection = ElitistSelection::from_options(options);
        let breeder = Breeder::from_options(options);
        let elite_count = selection.elite_count();
        let offspring = population.len().saturating_sub(elite_count);

        let mut next = Vec::with_capacity(population.len());
        let mut generation = 0;

        while !should_stop(&population, generation, options) {
            let generation_started = Instant::now();

            selection.select_into(&mut population, &mut next)?;
            breeder.breed_into(
                population.chromosomes(),
                elite_count,
                offspring,
                rng,
                evaluator,
                &mut next,
            )?;
            population.swap_generation(&mut next)?;

            generation += 1;
            GenerationRecord::new(generation, generation_started.elapsed(), &population)
                .report(options.get_log_level(), &population);
        }

        Ok(EvolutionResult::from_population(
            population,
            generation,
            started.elapsed(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chromosome::{Fitness, Gene};

    fn leading_true(genes: &[Gene]) -> Fitness {
        genes.iter().take_while(|g| **g).count()
    }

    fn initial(options: &EngineOptions, rng: &mut RandomNumberGenerator) -> Population {
        let mut population = Population::random(
            options.get_population_size(),
            options.get_chromosome_length(),
            rng,
        )
        .unwrap();
        population.score(&leading_true).unwrap();
        population
    }

    #[test]
    fn test_sequential_finds_solution() {
        let options = EngineOptions::new(100, 10, 0.2);
        let mut rng = RandomNumberGenerator::from_seed(1);
        let population = initial(&options, &mut rng);

        let result = SequentialOrchestrator::new()
            .run(population, &leading_true, &options, &mut rng)
            .unwrap();

        assert!(result.solved);
        assert_eq!(result.fitness, 10);
        assert_eq!(result.chromosome.genes(), &[true; 10]);
    }

    #[test]
    fn test_generation_cap() {
        let options = EngineOptions::builder()
            .population_size(10)
            .chromosome_length(200)
            .selection_ratio(0.2)
            .max_generations(3)
            .build();
        let mut rng = RandomNumberGenerator::from_seed(1);
        let population = initial(&options, &mut rng);

        let result = SequentialOrchestrator::new()
            .run(population, &leading_true, &options, &mut rng)
            .unwrap();

        assert!(!result.solved);
        assert_eq!(result.generations, 3);
    }

    #[test]
    fn test_solved_initial_population_runs_no_generation() {
        let options = EngineOptions::new(10, 1, 0.2);
        let mut rng = RandomNumberGenerator::from_seed(3);
        let chromosomes = (0..10)
            .map(|i| crate::chromosome::Chromosome::new(vec![i == 4]))
            .collect();
        let mut population = Population::from_chromosomes(chromosomes, 1).unwrap();
        population.score(&leading_true).unwrap();

        let result = SequentialOrchestrator::new()
            .run(population, &leading_true, &options, &mut rng)
            .unwrap();

        assert!(result.solved);
        assert_eq!(result.generations, 0);
    }
}
