use crate::{
    error::{GeneticError, Result},
    orchestrator::Orchestrator,
};

use super::{EvolutionLauncher, Evaluator};

/// Builder for [`EvolutionLauncher`].
///
/// ```rust
/// use flapgen::evolution::builder::EvolutionLauncherBuilder;
/// use flapgen::orchestrator::PooledOrchestrator;
///
/// let evaluator = |genes: &[bool]| genes.iter().take_while(|g| **g).count();
/// let launcher = EvolutionLauncherBuilder::new()
///     .with_orchestrator(PooledOrchestrator::new())
///     .with_evaluator(evaluator)
///     .build()
///     .unwrap();
/// ```
pub struct EvolutionLauncherBuilder<O, E>
where
    O: Orchestrator,
    E: Evaluator,
{
    orchestrator: Option<O>,
    evaluator: Option<E>,
}

impl<O, E> EvolutionLauncherBuilder<O, E>
where
    O: Orchestrator,
    E: Evaluator,
{
    pub fn new() -> Self {
        Self {
            orchestrator: None,
            evaluator: None,
        }
    }

    pub fn with_orchestrator(mut self, orchestrator: O) -> Self {
        self.orchestrator = Some(orchestrator);
        self
    }

    pub fn with_evaluator(mut self, evaluator: E) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    pub fn build(self) -> Result<EvolutionLauncher<O, E>> {
        let orchestrator = self.orchestrator.ok_or_else(|| {
            GeneticError::Configuration("Orchestrator not specified".to_string())
        })?;

        let evaluator = self
            .evaluator
            .ok_or_else(|| GeneticError::Configuration("Evaluator not specified".to_string()))?;

        Ok(EvolutionLauncher::new(orchestrator, evaluator))
    }
}

impl<O, E> Default for EvolutionLauncherBuilder<O, E>
where
    O: Orchestrator,
    E: Evaluator,
{
    fn default() -> Self {
        Self::new()
    }
}
