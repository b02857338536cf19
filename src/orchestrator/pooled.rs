//! # PooledOrchestrator
//!
//! A fixed pool of worker threads lives for the whole search. The non-elite
//! range `[E, N)` is partitioned once and every worker owns one chunk of it for
//! its lifetime. Each generation:
//!
//! 1. the coordinator (the calling thread) sorts the previous generation, copies
//!    the elites into the next buffer and rearms the `finished` barrier;
//! 2. it opens the next round of the release gate with `Signal::Continue`;
//! 3. every worker breeds its chunk from the previous generation, mutates and
//!    rescores it, sorts it locally, signals `finished` and waits for the
//!    following round;
//! 4. the coordinator waits on `finished`, appends the chunks after the elites,
//!    swaps the buffer in and checks for a solution.
//!
//! When the search ends the coordinator opens one last round with
//! `Signal::Stop`, and joins every worker before returning.
//!
//! Workers read the previous generation through a shared read lock and write
//! only their own chunk slot, so no two threads ever touch the same
//! chromosomes within a round. The coordinator takes the write lock only while
//! every worker is parked at the gate.
//!
//! A worker that finishes its chunk keeps waiting even if a peer's chunk
//! already holds a solution; the solution is noticed at the generation
//! boundary, so up to one generation of work can be wasted.

use std::ops::Range;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread;
use std::time::Instant;

use tracing::{debug, error};

use super::{partition::partition, should_stop, Orchestrator};
use crate::{
    breeding::Breeder,
    chromosome::{descending_fitness, Chromosome},
    error::{GeneticError, Result},
    evolution::{
        options::EngineOptions, population::Population, progress::GenerationRecord,
        EvolutionResult, Evaluator,
    },
    rng::RandomNumberGenerator,
    selection::ElitistSelection,
    sync::{Barrier, ReleaseGate, Signal},
};

/// Persistent worker-pool orchestrator. The worker count comes from
/// [`EngineOptions::get_workers`].
#[derive(Debug, Clone, Default)]
pub struct PooledOrchestrator;

impl PooledOrchestrator {
    pub fn new() -> Self {
        Self
    }
}

/// State shared between the coordinator and its workers for one search.
struct Shared<'a, E: ?Sized> {
    current: RwLock<Population>,
    slots: Vec<Mutex<Vec<Chromosome>>>,
    finished: Barrier,
    gate: ReleaseGate,
    failure: Mutex<Option<GeneticError>>,
    breeder: Breeder,
    evaluator: &'a E,
    elite_count: usize,
}

impl<'a, E> Shared<'a, E>
where
    E: Evaluator + ?Sized,
{
    fn read_current(&self) -> RwLockReadGuard<'_, Population> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_current(&self) -> RwLockWriteGuard<'_, Population> {
        self.current.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn slot(&self, worker: usize) -> MutexGuard<'_, Vec<Chromosome>> {
        self.slots[worker]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Keeps the first failure; later ones are consequences of it.
    fn record_failure(&self, failure: GeneticError) {
        let mut slot = self.failure.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            *slot = Some(failure);
        }
    }

    fn take_failure(&self) -> Option<GeneticError> {
        self.failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Breeds `len` children for `worker`'s slot from the previous generation.
    fn breed_chunk(
        &self,
        worker: usize,
        len: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<()> {
        let current = self.read_current();
        let mut slot = self.slot(worker);
        slot.clear();

        self.breeder.breed_into(
            current.chromosomes(),
            self.elite_count,
            len,
            rng,
            self.evaluator,
            &mut slot,
        )?;
        slot.sort_by(descending_fitness);
        Ok(())
    }

    /// Worker body: one iteration per opened round until `Signal::Stop`.
    fn work(&self, worker: usize, chunk: Range<usize>, mut rng: RandomNumberGenerator) {
        let _poison = PoisonOnPanic(&self.finished);
        let mut round = 1;

        debug!(worker, start = chunk.start, end = chunk.end, "worker started");

        while self.gate.wait_for(round) == Signal::Continue {
            // an empty chunk still takes part in both rendezvous
            if !chunk.is_empty() {
                if let Err(failure) = self.breed_chunk(worker, chunk.len(), &mut rng) {
                    self.record_failure(failure);
                }
            }

            if let Err(violation) = self.finished.done() {
                self.record_failure(violation.into());
                break;
            }
            round += 1;
        }

        debug!(worker, rounds = round - 1, "worker stopped");
    }

    /// Coordinator body. Returns the number of completed generations.
    fn coordinate(&self, workers: usize, options: &EngineOptions) -> Result<usize> {
        let selection = ElitistSelection::new(self.elite_count);
        let mut next = Vec::with_capacity(self.read_current().len());
        let mut generation = 0;

        loop {
            if should_stop(&self.read_current(), generation, options) {
                break;
            }
            let generation_started = Instant::now();

            selection.select_into(&mut self.write_current(), &mut next)?;

            self.finished.reset(workers)?;
            self.gate.open(Signal::Continue);
            self.finished.wait()?;

            if let Some(failure) = self.take_failure() {
                return Err(failure);
            }

            for worker in 0..self.slots.len() {
                next.append(&mut self.slot(worker));
            }

            let mut current = self.write_current();
            current.swap_generation(&mut next)?;

            generation += 1;
            GenerationRecord::new(generation, generation_started.elapsed(), &current)
                .report(options.get_log_level(), &current);
        }

        self.gate.open(Signal::Stop);
        Ok(generation)
    }
}

/// Releases every worker with `Signal::Stop` when the coordinator leaves,
/// whether it returns normally, fails or unwinds.
struct StopOnDrop<'a>(&'a ReleaseGate);

impl Drop for StopOnDrop<'_> {
    fn drop(&mut self) {
        self.0.open(Signal::Stop);
    }
}

/// Poisons the barrier if a worker unwinds, so the coordinator is not left
/// waiting for a signal that will never come.
struct PoisonOnPanic<'a>(&'a Barrier);

impl Drop for PoisonOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.poison();
        }
    }
}

impl Orchestrator for PooledOrchestrator {
    fn run<E>(
        &self,
        population: Population,
        evaluator: &E,
        options: &EngineOptions,
        rng: &mut RandomNumberGenerator,
    ) -> Result<EvolutionResult>
    where
        E: Evaluator + ?Sized,
    {
        let started = Instant::now();
        let workers = options.get_workers().resolve()?;
        let elite_count = options.elite_count();
        let chunks = partition(elite_count..population.len(), workers)?;
        let rngs: Vec<RandomNumberGenerator> = (0..workers).map(|_| rng.fork()).collect();

        debug!(workers, elite_count, population = population.len(), "starting worker pool");

        let shared = Shared {
            current: RwLock::new(population),
            slots: (0..workers).map(|_| Mutex::new(Vec::new())).collect(),
            finished: Barrier::new(workers),
            gate: ReleaseGate::new(),
            failure: Mutex::new(None),
            breeder: Breeder::from_options(options),
            evaluator,
            elite_count,
        };

        let generations = thread::scope(|scope| {
            let shared = &shared;
            let mut handles = Vec::with_capacity(workers);

            let coordinated = {
                let _stop = StopOnDrop(&shared.gate);
                let spawned = chunks
                    .into_iter()
                    .zip(rngs)
                    .enumerate()
                    .try_for_each(|(worker, (chunk, rng))| {
                        let handle = thread::Builder::new()
                            .name(format!("evolve-worker-{}", worker))
                            .spawn_scoped(scope, move || shared.work(worker, chunk, rng))?;
                        handles.push(handle);
                        Ok::<(), GeneticError>(())
                    });
                spawned.and_then(|()| shared.coordinate(workers, options))
            };

            let mut panicked = None;
            for (worker, handle) in handles.into_iter().enumerate() {
                if handle.join().is_err() {
                    error!(worker, "worker panicked");
                    panicked.get_or_insert(worker);
                }
            }

            match panicked {
                Some(worker) => Err(GeneticError::WorkerPanicked(format!(
                    "evolve-worker-{}",
                    worker
                ))),
                None => coordinated,
            }
        })?;

        let population = shared
            .current
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);

        Ok(EvolutionResult::from_population(
            population,
            generations,
            started.elapsed(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chromosome::{Fitness, Gene};
    use crate::evolution::options::WorkerCount;

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
    fn test_pooled_finds_solution() {
        let options = EngineOptions::builder()
            .population_size(100)
            .chromosome_length(10)
            .selection_ratio(0.2)
            .workers(WorkerCount::Fixed(4))
            .build();
        let mut rng = RandomNumberGenerator::from_seed(5);
        let population = initial(&options, &mut rng);

        let result = PooledOrchestrator::new()
            .run(population, &leading_true, &options, &mut rng)
            .unwrap();

        assert!(result.solved);
        assert_eq!(result.chromosome.genes(), &[true; 10]);
    }

    #[test]
    fn test_more_workers_than_offspring() {
        let options = EngineOptions::builder()
            .population_size(6)
            .chromosome_length(4)
            .selection_ratio(0.5)
            .workers(WorkerCount::Fixed(8))
            .max_generations(25)
            .build();
        let mut rng = RandomNumberGenerator::from_seed(8);
        let population = initial(&options, &mut rng);

        let result = PooledOrchestrator::new()
            .run(population, &leading_true, &options, &mut rng)
            .unwrap();

        assert!(result.generations <= 25);
        assert_eq!(result.chromosome.len(), 4);
    }

    #[test]
    fn test_evaluator_violation_stops_the_pool() {
        let options = EngineOptions::builder()
            .population_size(20)
            .chromosome_length(8)
            .selection_ratio(0.25)
            .workers(WorkerCount::Fixed(3))
            .build();
        let mut rng = RandomNumberGenerator::from_seed(2);
        let population = initial(&options, &mut rng);

        let result =
            PooledOrchestrator::new().run(population, &|_: &[Gene]| 99usize, &options, &mut rng);

        assert!(matches!(result, Err(GeneticError::FitnessCalculation(_))));
    }

    #[test]
    fn test_worker_panic_is_reported() {
        let options = EngineOptions::builder()
            .population_size(20)
            .chromosome_length(8)
            .selection_ratio(0.25)
            .workers(WorkerCount::Fixed(2))
            .build();
        let mut rng = RandomNumberGenerator::from_seed(2);
        let population = initial(&options, &mut rng);

        let exploding = |_: &[Gene]| -> Fitness { panic!("simulation crashed") };
        let result = PooledOrchestrator::new().run(population, &exploding, &options, &mut rng);

        assert!(matches!(result, Err(GeneticError::WorkerPanicked(_))));
    }
}
