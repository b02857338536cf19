//! # Population
//!
//! The population store: exactly N chromosomes of length L plus the index of
//! the fittest one. Generations are never edited in place; the orchestrators
//! build the next generation in a separate buffer and hand it over with
//! [`Population::swap_generation`], which rescans for the fittest chromosome.

use std::mem;

use crate::{
    chromosome::{descending_fitness, Chromosome, Fitness},
    error::{GeneticError, Result},
    evolution::Evaluator,
    rng::RandomNumberGenerator,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Population {
    chromosomes: Vec<Chromosome>,
    chromosome_length: usize,
    fittest: usize,
}

impl Population {
    /// Creates `size` random chromosomes of `chromosome_length` genes.
    ///
    /// The population is unscored; call [`Population::score`] before reading
    /// any fitness.
    pub fn random(
        size: usize,
        chromosome_length: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Self> {
        let chromosomes = (0..size)
            .map(|_| Chromosome::random(chromosome_length, rng))
            .collect();
        Self::from_chromosomes(chromosomes, chromosome_length)
    }

    /// Wraps existing chromosomes, checking that all have `chromosome_length` genes.
    pub fn from_chromosomes(
        chromosomes: Vec<Chromosome>,
        chromosome_length: usize,
    ) -> Result<Self> {
        if chromosomes.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }
        check_lengths(&chromosomes, chromosome_length)?;

        let mut population = Self {
            chromosomes,
            chromosome_length,
            fittest: 0,
        };
        population.update_fittest();
        Ok(population)
    }

    /// Scores every chromosome whose genes changed since it was last scored,
    /// then recomputes the fittest index.
    pub fn score<E>(&mut self, evaluator: &E) -> Result<()>
    where
        E: Evaluator + ?Sized,
    {
        for chromosome in self.chromosomes.iter_mut().filter(|c| !c.is_scored()) {
            chromosome.score(evaluator)?;
        }
        self.update_fittest();
        Ok(())
    }

    /// Scores every chromosome again, discarding any cached fitness.
    pub fn rescore<E>(&mut self, evaluator: &E) -> Result<()>
    where
        E: Evaluator + ?Sized,
    {
        for chromosome in &mut self.chromosomes {
            chromosome.score(evaluator)?;
        }
        self.update_fittest();
        Ok(())
    }

    /// Stable sort, best first. Equal-fitness chromosomes keep their relative order.
    pub fn sort_by_fitness(&mut self) {
        self.chromosomes.sort_by(descending_fitness);
        self.update_fittest();
    }

    /// Replaces the current generation with `next` and leaves the previous
    /// generation's chromosomes in `next`, so the caller can reuse the allocation.
    ///
    /// # Errors
    ///
    /// Fails without swapping if `next` does not hold exactly N chromosomes of
    /// length L, or if any of them is unscored.
    pub fn swap_generation(&mut self, next: &mut Vec<Chromosome>) -> Result<()> {
        if next.len() != self.chromosomes.len() {
            return Err(GeneticError::Evolution(format!(
                "next generation holds {} chromosomes, expected {}",
                next.len(),
                self.chromosomes.len()
            )));
        }
        check_lengths(next, self.chromosome_length)?;
        if let Some(index) = next.iter().position(|c| !c.is_scored()) {
            return Err(GeneticError::Evolution(format!(
                "chromosome {} of the next generation was never scored",
                index
            )));
        }

        mem::swap(&mut self.chromosomes, next);
        self.update_fittest();
        Ok(())
    }

    /// Rescans for the best chromosome; ties go to the lowest index.
    fn update_fittest(&mut self) {
        let mut fittest = 0;
        for (index, chromosome) in self.chromosomes.iter().enumerate() {
            if chromosome.fitness() > self.chromosomes[fittest].fitness() {
                fittest = index;
            }
        }
        self.fittest = fittest;
    }

    /// `true` once the fittest chromosome survives the whole course.
    pub fn found_solution(&self) -> bool {
        self.fittest().is_solution()
    }

    pub fn fittest(&self) -> &Chromosome {
        &self.chromosomes[self.fittest]
    }

    pub fn fittest_index(&self) -> usize {
        self.fittest
    }

    pub fn best_fitness(&self) -> Option<Fitness> {
        self.fittest().fitness()
    }

    pub fn chromosomes(&self) -> &[Chromosome] {
        &self.chromosomes
    }

    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    pub fn chromosome_length(&self) -> usize {
        self.chromosome_length
    }
}

fn check_lengths(chromosomes: &[Chromosome], expected: usize) -> Result<()> {
    match chromosomes.iter().position(|c| c.len() != expected) {
        Some(index) => Err(GeneticError::Evolution(format!(
            "chromosome {} has {} genes, expected {}",
            index,
            chromosomes[index].len(),
            expected
        ))),
        None => Ok(()),
    }
}
