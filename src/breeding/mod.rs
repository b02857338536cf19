//! # Breeding
//!
//! Crossover and mutation, plus the `Breeder` that chains them with rescoring.
//! Every orchestrator fills the non-elite part of the next generation through
//! [`Breeder::breed_into`]; they differ only in how that range is split up.
pub mod crossover;
pub mod mutation;

use crate::{
    chromosome::Chromosome,
    error::Result,
    evolution::{options::EngineOptions, Evaluator},
    rng::RandomNumberGenerator,
};

pub use crossover::{Crossover, SplitPolicy};
pub use mutation::{Mutation, MutationKind};

/// Crossover followed by mutation and rescoring.
#[derive(Debug, Clone, Default)]
pub struct Breeder {
    crossover: Crossover,
    mutation: Mutation,
}

impl Breeder {
    pub fn new(policy: SplitPolicy) -> Self {
        Self {
            crossover: Crossover::new(policy),
            mutation: Mutation::new(),
        }
    }

    pub fn from_options(options: &EngineOptions) -> Self {
        Self::new(options.get_split_policy())
    }

    /// Appends `count` children of `parents` to `out`, each mutated and scored.
    ///
    /// `parents` is the previous generation sorted best first; it is only read.
    ///
    /// ## Errors
    ///
    /// Fails if no parent pair can be drawn or the evaluator breaks its contract.
    pub fn breed_into<E>(
        &self,
        parents: &[Chromosome],
        elite_count: usize,
        count: usize,
        rng: &mut RandomNumberGenerator,
        evaluator: &E,
        out: &mut Vec<Chromosome>,
    ) -> Result<()>
    where
        E: Evaluator + ?Sized,
    {
        let start = out.len();
        self.crossover.fill(parents, elite_count, count, rng, out)?;

        for child in &mut out[start..] {
            self.mutation.mutate(child, rng);
            child.score(evaluator)?;
        }

        Ok(())
    }
}
