use crate::{
    chromosome::Chromosome,
    error::{GeneticError, Result},
    evolution::{options::EngineOptions, population::Population},
};

/// A selection strategy that carries the best individuals over unchanged.
///
/// The population is stable-sorted best first, so equal-fitness chromosomes
/// keep the order in which they were found, and the first `elite_count` are
/// copied, cached fitness included, into the next generation.
///
/// # Examples
///
/// ```
/// use flapgen::chromosome::Chromosome;
/// use flapgen::evolution::population::Population;
/// use flapgen::selection::ElitistSelection;
///
/// let evaluator = |genes: &[bool]| genes.iter().take_while(|g| **g).count();
/// let chromosomes = vec![
///     Chromosome::new(vec![true, false, false]),
///     Chromosome::new(vec![true, true, true]),
///     Chromosome::new(vec![false, false, false]),
/// ];
/// let mut population = Population::from_chromosomes(chromosomes, 3).unwrap();
/// population.score(&evaluator).unwrap();
///
/// let elites = ElitistSelection::new(2).select(&mut population).unwrap();
/// assert_eq!(elites[0].fitness(), Some(3));
/// assert_eq!(elites[1].fitness(), Some(1));
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElitistSelection {
    elite_count: usize,
}

impl ElitistSelection {
    pub fn new(elite_count: usize) -> Self {
        Self { elite_count }
    }

    pub fn from_options(options: &EngineOptions) -> Self {
        Self::new(options.elite_count())
    }

    pub fn elite_count(&self) -> usize {
        self.elite_count
    }

    /// Sorts `population` best first and writes its elites into `next`,
    /// replacing whatever `next` held.
    ///
    /// # Errors
    ///
    /// Returns an error if the elite count is zero or exceeds the population,
    /// or if an elite was never scored.
    pub fn select_into(
        &self,
        population: &mut Population,
        next: &mut Vec<Chromosome>,
    ) -> Result<()> {
        if self.elite_count == 0 {
            return Err(GeneticError::Configuration(
                "Elite count cannot be zero".to_string(),
            ));
        }

        if self.elite_count > population.len() {
            return Err(GeneticError::Configuration(format!(
                "Elite count ({}) exceeds population size ({})",
                self.elite_count,
                population.len()
            )));
        }

        population.sort_by_fitness();

        let elites = &population.chromosomes()[..self.elite_count];
        if let Some(index) = elites.iter().position(|c| !c.is_scored()) {
            return Err(GeneticError::Evolution(format!(
                "elite {} was selected before being scored",
                index
            )));
        }

        next.clear();
        next.extend_from_slice(elites);
        Ok(())
    }

    /// Convenience wrapper around [`ElitistSelection::select_into`].
    pub fn select(&self, population: &mut Population) -> Result<Vec<Chromosome>> {
        let mut elites = Vec::with_capacity(self.elite_count);
        self.select_into(population, &mut elites)?;
        Ok(elites)
    }
}
