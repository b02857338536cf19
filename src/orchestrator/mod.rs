//! # Orchestrators
//!
//! An `Orchestrator` drives the generational loop over an initial, already
//! scored population until the fittest chromosome survives the whole course
//! (or the optional generation cap is hit).
//!
//! - [`SequentialOrchestrator`] runs selection, crossover and mutation on the
//!   calling thread.
//! - [`PooledOrchestrator`] keeps a fixed pool of worker threads alive for the
//!   whole search, each bound to one chunk of the non-elite range and
//!   synchronized with the coordinator through a [`crate::sync::Barrier`] and
//!   a [`crate::sync::ReleaseGate`].
//! - [`ScopedOrchestrator`] breeds the same chunks on the rayon pool, forking
//!   and joining the work every generation.
pub mod partition;
pub mod pooled;
pub mod scoped;
pub mod sequential;

use std::fmt::Debug;

use crate::{
    error::Result,
    evolution::{options::EngineOptions, population::Population, EvolutionResult, Evaluator},
    rng::RandomNumberGenerator,
};

pub use pooled::PooledOrchestrator;
pub use scoped::ScopedOrchestrator;
pub use sequential::SequentialOrchestrator;

/// Drives a search from a scored initial population to its result.
pub trait Orchestrator: Debug + Send + Sync {
    /// Evolves `population` until a solution is found.
    ///
    /// ## Parameters
    ///
    /// - `population`: the initial generation, fully scored.
    /// - `evaluator`: the fitness function, borrowed for the whole search.
    /// - `options`: validated engine options.
    /// - `rng`: the source of randomness; parallel orchestrators derive one
    ///   seeded generator per chunk from it.
    ///
    /// ## Errors
    ///
    /// Fails on evaluator contract violations, barrier protocol violations and
    /// worker panics.
    fn run<E>(
        &self,
        population: Population,
        evaluator: &E,
        options: &EngineOptions,
        rng: &mut RandomNumberGenerator,
    ) -> Result<EvolutionResult>
    where
        E: Evaluator + ?Sized;
}

/// Termination check performed once per completed generation.
pub(crate) fn should_stop(
    population: &Population,
    generation: usize,
    options: &EngineOptions,
) -> bool {
    population.found_solution()
        || options
            .get_max_generations()
            .is_some_and(|max| generation >= max)
}
