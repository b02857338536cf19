pub mod builder;
pub mod evaluator;
pub mod launcher;
pub mod options;
pub mod population;
pub mod progress;

pub use evaluator::Evaluator;
pub use launcher::{EvolutionLauncher, EvolutionResult};
pub use options::{EngineOptions, LogLevel, WorkerCount};
pub use population::Population;
