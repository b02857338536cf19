//! # Mutation
//!
//! Each bred chromosome gets one of three outcomes, chosen by fair coin flips
//! in priority order:
//!
//! 1. three heads: a sequential mutation flips a run of 2 to 5 consecutive
//!    genes starting at a random position, clipped at the end;
//! 2. otherwise two heads: a random mutation flips 5 positions drawn with
//!    replacement, so a repeated position cancels out;
//! 3. otherwise the chromosome is left untouched.

use crate::{chromosome::Chromosome, rng::RandomNumberGenerator};

pub const MIN_SEQUENCE: usize = 2;
pub const MAX_SEQUENCE: usize = 5;
pub const RANDOM_FLIPS: usize = 5;

/// The mutation that was drawn for one chromosome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    Sequential { start: usize, len: usize },
    Random { positions: [usize; RANDOM_FLIPS] },
    Unchanged,
}

#[derive(Debug, Clone, Default)]
pub struct Mutation;

impl Mutation {
    pub fn new() -> Self {
        Self
    }

    /// Draws the mutation for a chromosome of `length` genes.
    pub fn draw(&self, length: usize, rng: &mut RandomNumberGenerator) -> MutationKind {
        if length == 0 {
            return MutationKind::Unchanged;
        }

        if rng.heads() && rng.heads() && rng.heads() {
            MutationKind::Sequential {
                start: rng.gen_index(length),
                len: rng.gen_inclusive(MIN_SEQUENCE, MAX_SEQUENCE),
            }
        } else if rng.heads() && rng.heads() {
            MutationKind::Random {
                positions: std::array::from_fn(|_| rng.gen_index(length)),
            }
        } else {
            MutationKind::Unchanged
        }
    }

    /// Applies a previously drawn mutation.
    pub fn apply(&self, kind: &MutationKind, chromosome: &mut Chromosome) {
        match kind {
            MutationKind::Sequential { start, len } => {
                chromosome.flip_run(*start, *len);
            }
            MutationKind::Random { positions } => {
                for &position in positions {
                    chromosome.flip(position);
                }
            }
            MutationKind::Unchanged => {}
        }
    }

    /// Draws and applies a mutation, returning what was done.
    pub fn mutate(
        &self,
        chromosome: &mut Chromosome,
        rng: &mut RandomNumberGenerator,
    ) -> MutationKind {
        let kind = self.draw(chromosome.len(), rng);
        self.apply(&kind, chromosome);
        kind
    }
}
