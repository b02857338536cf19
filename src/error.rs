//! # Error Types
//!
//! This module defines the error types for the search engine. Configuration
//! problems are reported before any thread is spawned, synchronization contract
//! violations abort the search, and evaluator failures end the run.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use flapgen::error::{GeneticError, Result};
//!
//! fn some_function() -> Result<()> {
//!     Ok(())
//! }
//!
//! fn caller() {
//!     match some_function() {
//!         Ok(_) => println!("Success!"),
//!         Err(e) => println!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use flapgen::error::{GeneticError, OptionExt};
//!
//! fn best_fitness(scores: &[usize]) -> flapgen::error::Result<usize> {
//!     scores.iter().max().cloned().ok_or_else_genetic(||
//!         GeneticError::EmptyPopulation
//!     )
//! }
//! ```

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Violations of the barrier protocol.
///
/// Any of these means the coordinator and its workers disagree about how many
/// participants are still outstanding, so the search cannot continue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BarrierError {
    /// `reset` was called while participants of the current round are still outstanding.
    #[error("cannot rearm barrier to {requested} while {remaining} participant(s) are outstanding")]
    ResetWhileDraining { remaining: usize, requested: usize },

    /// `done` was called more times than the barrier was armed for.
    #[error("barrier signalled done with no participants outstanding")]
    Underflow,

    /// A participant died before signalling, so the round can never complete.
    #[error("barrier poisoned by a failed participant")]
    Poisoned,
}

/// Represents errors that can occur while searching.
#[derive(Error, Debug)]
pub enum GeneticError {
    /// Error that occurs when an invalid configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// Error that occurs when the evaluator breaks its contract.
    #[error("Fitness calculation error: {0}")]
    FitnessCalculation(String),

    /// Error that occurs when the evolution process fails.
    #[error("Evolution error: {0}")]
    Evolution(String),

    /// Error that occurs when the barrier protocol is violated.
    #[error("Synchronization error: {0}")]
    Synchronization(#[from] BarrierError),

    /// Error that occurs when a worker thread terminated abnormally.
    #[error("Worker {0} panicked")]
    WorkerPanicked(String),

    /// Error that occurs when an I/O operation fails, e.g. spawning a thread.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for search operations.
pub type Result<T> = std::result::Result<T, GeneticError>;

/// Extension trait for Result to add context to errors.
///
/// ## Examples
///
/// ```rust
/// use flapgen::error::ResultExt;
///
/// fn parse_size(raw: &str) -> flapgen::error::Result<usize> {
///     raw.parse::<usize>().context("Failed to parse population size")
/// }
///
/// assert!(parse_size("oops").is_err());
/// ```
pub trait ResultExt<T, E> {
    /// Converts the error to a `GeneticError::Other` prefixed with `context`.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| GeneticError::Other(format!("{}: {}", context, e)))
    }
}

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, GeneticError>` using `err_fn`.
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError,
    {
        self.ok_or_else(err_fn)
    }
}
