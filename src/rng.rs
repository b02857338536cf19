//! # RandomNumberGenerator
//!
//! The `RandomNumberGenerator` struct is the explicit source of randomness that is
//! handed to every operator call. There is no process-wide generator: the
//! sequential orchestrator threads one handle through the whole search, and the
//! parallel orchestrators derive one independently seeded handle per chunk.
//!
//! ## Example
//!
//! ```rust
//! use flapgen::rng::{Face, RandomNumberGenerator};
//!
//! let mut rng = RandomNumberGenerator::from_seed(7);
//! let face = rng.flip();
//! assert!(face == Face::Heads || face == Face::Tails);
//!
//! let index = rng.gen_index(10);
//! assert!(index < 10);
//! ```

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Outcome of a fair coin flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Heads,
    Tails,
}

/// A wrapper around the `rand` crate's `StdRng` exposing the draws the
/// evolutionary operators need.
#[derive(Clone, Debug)]
pub struct RandomNumberGenerator {
    pub rng: StdRng,
}

impl RandomNumberGenerator {
    /// Creates a new `RandomNumberGenerator` instance seeded from the system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a new `RandomNumberGenerator` instance with a specific seed.
    ///
    /// This is useful for reproducible tests and benchmarks.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Flips a fair coin.
    pub fn flip(&mut self) -> Face {
        if self.rng.gen_bool(0.5) {
            Face::Heads
        } else {
            Face::Tails
        }
    }

    /// Returns `true` when a fair coin lands on heads.
    pub fn heads(&mut self) -> bool {
        self.flip() == Face::Heads
    }

    /// Draws an index uniformly from `[0, upper)`.
    ///
    /// `upper` must be positive.
    pub fn gen_index(&mut self, upper: usize) -> usize {
        self.rng.gen_range(0..upper)
    }

    /// Draws a value uniformly from the closed range `[low, high]`.
    pub fn gen_inclusive(&mut self, low: usize, high: usize) -> usize {
        self.rng.gen_range(low..=high)
    }

    /// Draws a seed for a derived generator.
    ///
    /// Used to give each worker its own reproducible stream.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.gen()
    }

    /// Derives an independent generator from this one.
    pub fn fork(&mut self) -> Self {
        Self::from_seed(self.next_seed())
    }
}

impl Default for RandomNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}
