//! # Caching Module
//!
//! Fitness caches for expensive evaluators. Elites are carried over with their
//! fitness already known, but crossover of near-identical parents keeps
//! producing chromosomes that were scored before; caching by gene sequence
//! skips re-running the simulation for those.
//!
//! ```rust
//! use flapgen::caching::CachingEvaluator;
//! use flapgen::evolution::Evaluator;
//!
//! let evaluator = |genes: &[bool]| genes.iter().take_while(|g| **g).count();
//! let cached = evaluator.with_global_cache();
//!
//! assert_eq!(cached.evaluate(&[true, false]), 1);
//! assert_eq!(cached.cache_size(), 1);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thread_local::ThreadLocal;

use crate::chromosome::{Fitness, Gene};
use crate::evolution::Evaluator;

type FitnessCache = HashMap<Vec<Gene>, Fitness>;

/// A wrapper around an evaluator that caches fitness values in a map shared
/// by all threads.
///
/// The lock is not held while the wrapped evaluator runs, so two threads may
/// occasionally score the same genes; both store the same value.
#[derive(Debug, Clone)]
pub struct CachedEvaluator<E> {
    evaluator: E,
    cache: Arc<Mutex<FitnessCache>>,
}

impl<E> CachedEvaluator<E>
where
    E: Evaluator,
{
    pub fn new(evaluator: E) -> Self {
        Self::with_cache(evaluator, HashMap::new())
    }

    /// Creates a cached evaluator with a pre-populated cache.
    pub fn with_cache(evaluator: E, cache: HashMap<Vec<Gene>, Fitness>) -> Self {
        Self {
            evaluator,
            cache: Arc::new(Mutex::new(cache)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FitnessCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a reference to the wrapped evaluator.
    pub fn inner(&self) -> &E {
        &self.evaluator
    }

    pub fn cache_size(&self) -> usize {
        self.lock().len()
    }

    pub fn clear_cache(&self) {
        self.lock().clear();
    }

    /// Returns a copy of the cache.
    pub fn get_cache(&self) -> HashMap<Vec<Gene>, Fitness> {
        self.lock().clone()
    }
}

impl<E> Evaluator for CachedEvaluator<E>
where
    E: Evaluator,
{
    fn evaluate(&self, genes: &[Gene]) -> Fitness {
        if let Some(fitness) = self.lock().get(genes).copied() {
            return fitness;
        }

        let fitness = self.evaluator.evaluate(genes);
        self.lock().insert(genes.to_vec(), fitness);
        fitness
    }
}

/// A wrapper around an evaluator that keeps one cache per thread, so pool
/// workers never contend on a lock.
#[derive(Debug, Clone)]
pub struct ThreadLocalCachedEvaluator<E> {
    evaluator: E,
    cache: Arc<ThreadLocal<RefCell<FitnessCache>>>,
}

impl<E> ThreadLocalCachedEvaluator<E>
where
    E: Evaluator,
{
    pub fn new(evaluator: E) -> Self {
        Self {
            evaluator,
            cache: Arc::new(ThreadLocal::new()),
        }
    }

    fn local(&self) -> &RefCell<FitnessCache> {
        self.cache.get_or_default()
    }

    pub fn inner(&self) -> &E {
        &self.evaluator
    }

    /// Clears the cache of the current thread.
    pub fn clear_cache(&self) {
        self.local().borrow_mut().clear();
    }

    /// Number of cached values for the current thread.
    pub fn cache_size(&self) -> usize {
        self.local().borrow().len()
    }
}

impl<E> Evaluator for ThreadLocalCachedEvaluator<E>
where
    E: Evaluator,
{
    fn evaluate(&self, genes: &[Gene]) -> Fitness {
        let local = self.local();
        let cached = local.borrow().get(genes).copied();
        if let Some(fitness) = cached {
            return fitness;
        }

        let fitness = self.evaluator.evaluate(genes);
        local.borrow_mut().insert(genes.to_vec(), fitness);
        fitness
    }
}

/// Wraps an evaluator with one of the caches above.
pub trait CachingEvaluator: Evaluator + Sized + Clone {
    /// Wraps this evaluator with a mutex-protected cache shared by all threads.
    fn with_global_cache(&self) -> CachedEvaluator<Self> {
        CachedEvaluator::new(self.clone())
    }

    /// Wraps this evaluator with a per-thread cache.
    fn with_thread_local_cache(&self) -> ThreadLocalCachedEvaluator<Self> {
        ThreadLocalCachedEvaluator::new(self.clone())
    }
}

impl<E> CachingEvaluator for E where E: Evaluator + Clone {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone)]
    struct CountingEvaluator {
        evaluations: Arc<AtomicUsize>,
    }

    impl CountingEvaluator {
        fn new() -> Self {
            Self {
                evaluations: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn get_evaluations(&self) -> usize {
            self.evaluations.load(Ordering::SeqCst)
        }
    }

    impl Evaluator for CountingEvaluator {
        fn evaluate(&self, genes: &[Gene]) -> Fitness {
            self.evaluations.fetch_add(1, Ordering::SeqCst);
            genes.iter().take_while(|g| **g).count()
        }
    }

    #[test]
    fn test_cached_evaluator() {
        let evaluator = CountingEvaluator::new();
        let cached = CachedEvaluator::new(evaluator.clone());

        assert_eq!(cached.evaluate(&[true, false, true]), 1);
        assert_eq!(evaluator.get_evaluations(), 1);

        assert_eq!(cached.evaluate(&[true, false, true]), 1);
        assert_eq!(evaluator.get_evaluations(), 1);

        assert_eq!(cached.evaluate(&[true, true, true]), 3);
        assert_eq!(evaluator.get_evaluations(), 2);
        assert_eq!(cached.cache_size(), 2);

        cached.clear_cache();
        assert_eq!(cached.cache_size(), 0);

        cached.evaluate(&[true, false, true]);
        assert_eq!(evaluator.get_evaluations(), 3);
    }

    #[test]
    fn test_thread_local_cached_evaluator() {
        let evaluator = CountingEvaluator::new();
        let cached = evaluator.with_thread_local_cache();

        cached.evaluate(&[true, true]);
        cached.evaluate(&[true, true]);
        assert_eq!(evaluator.get_evaluations(), 1);
        assert_eq!(cached.cache_size(), 1);

        // another thread starts with an empty cache
        std::thread::scope(|s| {
            s.spawn(|| {
                assert_eq!(cached.cache_size(), 0);
                cached.evaluate(&[true, true]);
            });
        });
        assert_eq!(evaluator.get_evaluations(), 2);

        cached.clear_cache();
        assert_eq!(cached.cache_size(), 0);
    }

    #[test]
    fn test_with_cache() {
        let evaluator = CountingEvaluator::new();
        let mut cache = HashMap::new();
        cache.insert(vec![false, false], 2);

        let cached = CachedEvaluator::with_cache(evaluator.clone(), cache);

        assert_eq!(cached.evaluate(&[false, false]), 2);
        assert_eq!(evaluator.get_evaluations(), 0);
        assert_eq!(cached.get_cache().len(), 1);
    }
}
