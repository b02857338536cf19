//! # Crossover
//!
//! Single-point splicing of two parents into two children. The first parent is
//! drawn from the elites, the second from the whole previous generation, and the
//! two indices are always distinct.

use crate::{
    chromosome::Chromosome,
    error::{GeneticError, Result},
    rng::RandomNumberGenerator,
};

/// Where a splice cuts the parents.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitPolicy {
    /// Cut at `L / 2` for every pair.
    #[default]
    Midpoint,
    /// Cut at the leading parent's fitness. Data dependent: a parent with
    /// fitness 0 or L yields a child that is a plain copy of one parent.
    ParentFitness,
}

impl SplitPolicy {
    /// Split index used when `leading` contributes the head of the child.
    pub fn split_point(&self, leading: &Chromosome) -> usize {
        match self {
            SplitPolicy::Midpoint => leading.len() / 2,
            SplitPolicy::ParentFitness => leading.fitness().unwrap_or(0).min(leading.len()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Crossover {
    policy: SplitPolicy,
}

impl Crossover {
    pub fn new(policy: SplitPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> SplitPolicy {
        self.policy
    }

    /// Draws a parent pair: the first uniformly from `[0, elite_count)`, the
    /// second uniformly from `[0, population_len)`, redrawn until it differs.
    ///
    /// Requires `1 <= elite_count <= population_len` and `population_len >= 2`.
    pub fn draw_parents(
        &self,
        population_len: usize,
        elite_count: usize,
        rng: &mut RandomNumberGenerator,
    ) -> (usize, usize) {
        let first = rng.gen_index(elite_count);
        let mut second = rng.gen_index(population_len);
        while second == first {
            second = rng.gen_index(population_len);
        }
        (first, second)
    }

    /// Produces both children of a pair: `first`'s head with `second`'s tail,
    /// and the same splice with the parents swapped.
    pub fn cross(&self, first: &Chromosome, second: &Chromosome) -> (Chromosome, Chromosome) {
        (
            Chromosome::splice(first, second, self.policy.split_point(first)),
            Chromosome::splice(second, first, self.policy.split_point(second)),
        )
    }

    /// Appends exactly `count` unscored children bred from `parents` to `out`.
    ///
    /// `parents` must already be sorted best first so that its first
    /// `elite_count` entries are the elites. An odd `count` drops the second
    /// child of the last pair.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if no distinct parent pair can be drawn.
    pub fn fill(
        &self,
        parents: &[Chromosome],
        elite_count: usize,
        count: usize,
        rng: &mut RandomNumberGenerator,
        out: &mut Vec<Chromosome>,
    ) -> Result<()> {
        if count == 0 {
            return Ok(());
        }

        if parents.len() < 2 || elite_count == 0 || elite_count > parents.len() {
            return Err(GeneticError::Configuration(format!(
                "cannot draw distinct parents from {} chromosome(s) with {} elite(s)",
                parents.len(),
                elite_count
            )));
        }

        let target = out.len() + count;
        out.reserve(count + 1);
        while out.len() < target {
            let (first, second) = self.draw_parents(parents.len(), elite_count, rng);
            let (left, right) = self.cross(&parents[first], &parents[second]);
            out.push(left);
            out.push(right);
        }
        out.truncate(target);

        Ok(())
    }
}
