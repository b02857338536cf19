pub mod breeding;
pub mod caching;
pub mod chromosome;
pub mod error;
pub mod evolution;
pub mod flappy;
pub mod orchestrator;
pub mod rng;
pub mod selection;
pub mod sync;

// Re-export commonly used types for convenience
pub use chromosome::{Chromosome, Fitness, Gene};
pub use error::{BarrierError, GeneticError, OptionExt, Result, ResultExt};
