//! # Chromosome
//!
//! A `Chromosome` is a fixed-length sequence of jump decisions together with
//! its cached fitness. The cache is cleared by every gene-changing operation,
//! so a fitness value is only ever observed for the genes it was computed from.
//!
//! ## Example
//!
//! ```rust
//! use flapgen::chromosome::Chromosome;
//!
//! let mut chromosome = Chromosome::new(vec![true, true, false, true]);
//! let evaluator = |genes: &[bool]| genes.iter().take_while(|g| **g).count();
//!
//! assert_eq!(chromosome.score(&evaluator).unwrap(), 2);
//! chromosome.flip(2);
//! assert_eq!(chromosome.fitness(), None);
//! assert_eq!(chromosome.score(&evaluator).unwrap(), 4);
//! assert!(chromosome.is_solution());
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::ops::Range;

use crate::{
    error::{GeneticError, Result},
    evolution::Evaluator,
    rng::RandomNumberGenerator,
};

/// A single jump / no-jump decision at one time step.
pub type Gene = bool;

/// Number of consecutive genes survived, in `0..=length`.
pub type Fitness = usize;

/// Candidate solution: an ordered gene sequence plus its cached fitness.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chromosome {
    genes: Vec<Gene>,
    fitness: Option<Fitness>,
}

impl Chromosome {
    /// Creates an unscored chromosome from the given genes.
    pub fn new(genes: Vec<Gene>) -> Self {
        Self {
            genes,
            fitness: None,
        }
    }

    /// Creates an unscored chromosome where every gene is an independent fair coin flip.
    pub fn random(length: usize, rng: &mut RandomNumberGenerator) -> Self {
        Self::new((0..length).map(|_| rng.heads()).collect())
    }

    /// Builds a child from `first[..split]` followed by `second[split..]`.
    ///
    /// `split` is clamped to the chromosome length. The child is unscored.
    pub fn splice(first: &Chromosome, second: &Chromosome, split: usize) -> Chromosome {
        debug_assert_eq!(first.len(), second.len());
        let split = split.min(first.len());

        let mut genes = Vec::with_capacity(first.len());
        genes.extend_from_slice(&first.genes[..split]);
        genes.extend_from_slice(&second.genes[split..]);
        Chromosome::new(genes)
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// The cached fitness, or `None` if the genes changed since the last scoring.
    pub fn fitness(&self) -> Option<Fitness> {
        self.fitness
    }

    pub fn is_scored(&self) -> bool {
        self.fitness.is_some()
    }

    /// `true` when the chromosome survives every one of its steps.
    pub fn is_solution(&self) -> bool {
        self.fitness == Some(self.genes.len())
    }

    /// Inverts the gene at `index`.
    pub fn flip(&mut self, index: usize) {
        self.genes[index] = !self.genes[index];
        self.fitness = None;
    }

    /// Inverts `len` consecutive genes starting at `start`, stopping at the end
    /// of the chromosome. Returns the range actually flipped.
    pub fn flip_run(&mut self, start: usize, len: usize) -> Range<usize> {
        let end = start.saturating_add(len).min(self.genes.len());
        let start = start.min(end);
        for gene in &mut self.genes[start..end] {
            *gene = !*gene;
        }
        self.fitness = None;
        start..end
    }

    /// Computes and caches the fitness of the current genes.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::FitnessCalculation` if the evaluator reports more
    /// survived steps than the chromosome has genes.
    pub fn score<E>(&mut self, evaluator: &E) -> Result<Fitness>
    where
        E: Evaluator + ?Sized,
    {
        let fitness = evaluator.evaluate(&self.genes);
        if fitness > self.genes.len() {
            return Err(GeneticError::FitnessCalculation(format!(
                "evaluator returned {} for a chromosome of length {}",
                fitness,
                self.genes.len()
            )));
        }
        self.fitness = Some(fitness);
        Ok(fitness)
    }
}

/// Orders chromosomes best-first. Unscored chromosomes sort after every scored one.
pub fn descending_fitness(a: &Chromosome, b: &Chromosome) -> Ordering {
    b.fitness.cmp(&a.fitness)
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for gene in &self.genes {
            f.write_str(if *gene { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leading_true(genes: &[Gene]) -> Fitness {
        genes.iter().take_while(|g| **g).count()
    }

    #[test]
    fn test_random_has_requested_length() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let chromosome = Chromosome::random(37, &mut rng);
        assert_eq!(chromosome.len(), 37);
        assert!(!chromosome.is_scored());
    }

    #[test]
    fn test_splice_takes_halves() {
        let a = Chromosome::new(vec![true; 6]);
        let b = Chromosome::new(vec![false; 6]);

        let child = Chromosome::splice(&a, &b, 3);
        assert_eq!(child.genes(), &[true, true, true, false, false, false]);

        let child = Chromosome::splice(&b, &a, 3);
        assert_eq!(child.genes(), &[false, false, false, true, true, true]);
    }

    #[test]
    fn test_splice_degenerate_points() {
        let a = Chromosome::new(vec![true; 4]);
        let b = Chromosome::new(vec![false; 4]);

        assert_eq!(Chromosome::splice(&a, &b, 0).genes(), b.genes());
        assert_eq!(Chromosome::splice(&a, &b, 4).genes(), a.genes());
        assert_eq!(Chromosome::splice(&a, &b, 99).genes(), a.genes());
    }

    #[test]
    fn test_flip_run_clips_at_end() {
        let mut chromosome = Chromosome::new(vec![false; 5]);
        let flipped = chromosome.flip_run(3, 5);
        assert_eq!(flipped, 3..5);
        assert_eq!(chromosome.genes(), &[false, false, false, true, true]);
    }

    #[test]
    fn test_gene_change_clears_fitness() {
        let mut chromosome = Chromosome::new(vec![true, false]);
        chromosome.score(&leading_true).unwrap();
        assert_eq!(chromosome.fitness(), Some(1));

        chromosome.flip(1);
        assert_eq!(chromosome.fitness(), None);

        chromosome.score(&leading_true).unwrap();
        chromosome.flip_run(0, 2);
        assert_eq!(chromosome.fitness(), None);
    }

    #[test]
    fn test_score_rejects_out_of_range_fitness() {
        let mut chromosome = Chromosome::new(vec![true; 3]);
        let result = chromosome.score(&|_: &[Gene]| 4usize);
        assert!(matches!(result, Err(GeneticError::FitnessCalculation(_))));
        assert!(!chromosome.is_scored());
    }

    #[test]
    fn test_descending_fitness_puts_unscored_last() {
        let mut scored = Chromosome::new(vec![false, true]);
        scored.score(&leading_true).unwrap();
        let unscored = Chromosome::new(vec![true, true]);

        assert_eq!(descending_fitness(&scored, &unscored), Ordering::Less);
    }

    #[test]
    fn test_display() {
        let chromosome = Chromosome::new(vec![true, false, true]);
        assert_eq!(chromosome.to_string(), "101");
    }
}
