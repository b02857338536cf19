use crate::chromosome::{Fitness, Gene};

/// Scores a gene sequence.
///
/// Implementations must be pure and deterministic for fixed simulation
/// parameters, and return the number of leading genes the agent survives
/// (at most `genes.len()`). The engine borrows the evaluator read-only for
/// the whole search and calls it concurrently from worker threads.
///
/// Any `Fn(&[Gene]) -> Fitness + Send + Sync` closure is an evaluator.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, genes: &[Gene]) -> Fitness;
}

impl<F> Evaluator for F
where
    F: Fn(&[Gene]) -> Fitness + Send + Sync,
{
    fn evaluate(&self, genes: &[Gene]) -> Fitness {
        self(genes)
    }
}
