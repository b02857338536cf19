use std::time::Instant;

use rayon::prelude::*;

use super::{partition::partition, should_stop, Orchestrator};
use crate::{
    breeding::Breeder,
    chromosome::{descending_fitness, Chromosome},
    error::Result,
    evolution::{
        options::EngineOptions, population::Population, progress::GenerationRecord,
        EvolutionResult, Evaluator,
    },
    rng::RandomNumberGenerator,
    selection::ElitistSelection,
};

/// Breeds the non-elite chunks on the rayon thread pool, forking and joining
/// the work every generation.
///
/// Uses the same partition and per-chunk seeding as [`super::PooledOrchestrator`];
/// only the thread lifecycle differs.
#[derive(Debug, Clone, Default)]
pub struct ScopedOrchestrator;

impl ScopedOrchestrator {
    pub fn new() -> Self {
        Self
    }
}

impl Orchestrator for ScopedOrchestrator {
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
        let chunks = partition(elite_count..population.len(), options.get_workers().resolve()?)?;

        let mut next = Vec::with_capacity(population.len());
        let mut generation = 0;

        while !should_stop(&population, generation, options) {
            let generation_started = Instant::now();

            selection.select_into(&mut population, &mut next)?;

            let rngs: Vec<RandomNumberGenerator> = chunks.iter().map(|_| rng.fork()).collect();
            let parents = population.chromosomes();
            let bred = chunks
                .par_iter()
                .zip(rngs.into_par_iter())
                .map(|(chunk, mut rng)| -> Result<Vec<Chromosome>> {
                    let mut children: Vec<Chromosome> = Vec::with_capacity(chunk.len());
                    breeder.breed_into(
                        parents,
                        elite_count,
                        chunk.len(),
                        &mut rng,
                        evaluator,
                        &mut children,
                    )?;
                    children.sort_by(descending_fitness);
                    Ok(children)
                })
                .collect::<Result<Vec<_>>>()?;

            for mut children in bred {
                next.append(&mut children);
            }
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
