//! # Barrier
//!
//! Two rendezvous primitives used by the pooled orchestrator.
//!
//! [`Barrier`] is a reusable countdown: it is armed with the number of
//! participants, each participant calls [`Barrier::done`] once, and
//! [`Barrier::wait`] blocks until the count reaches zero. It moves through
//!
//! ```text
//! Armed(n) --done--> Draining(k) --done--> Empty --reset(m)--> Armed(m)
//! ```
//!
//! and may only be rearmed when it is `Empty`, or when it is still fully armed
//! with the same count. Anything else would lose a participant's signal and is
//! reported as [`BarrierError::ResetWhileDraining`].
//!
//! [`ReleaseGate`] is the opposite direction: a single coordinator opens
//! numbered rounds, each carrying a [`Signal`], and any number of participants
//! block until the round they expect has been opened. Because a participant
//! asks for a specific round, opening before a participant arrives is never a
//! lost wake-up, and shutdown is an explicit `Signal::Stop` rather than the
//! absence of a future round.
//!
//! ```rust
//! use flapgen::sync::Barrier;
//!
//! let barrier = Barrier::new(3);
//! barrier.done().unwrap();
//! barrier.done().unwrap();
//! barrier.done().unwrap();
//! barrier.wait().unwrap();
//!
//! barrier.reset(3).unwrap();
//! assert_eq!(barrier.remaining(), 3);
//! ```

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use tracing::error;

use crate::error::BarrierError;

/// Observable state of a [`Barrier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierState {
    /// Armed with this many participants, none of which has signalled yet.
    Armed(usize),
    /// Some participants signalled; this many are still outstanding.
    Draining(usize),
    Empty,
    Poisoned,
}

#[derive(Debug)]
struct Counter {
    armed: usize,
    remaining: usize,
    poisoned: bool,
}

/// Reusable countdown barrier. See the module documentation.
#[derive(Debug)]
pub struct Barrier {
    counter: Mutex<Counter>,
    drained: Condvar,
}

impl Barrier {
    pub fn new(count: usize) -> Self {
        Self {
            counter: Mutex::new(Counter {
                armed: count,
                remaining: count,
                poisoned: false,
            }),
            drained: Condvar::new(),
        }
    }

    // No code panics while holding the lock, so a poisoned mutex still guards
    // a consistent counter.
    fn lock(&self) -> MutexGuard<'_, Counter> {
        self.counter.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Signals that one participant finished. The last one wakes every waiter.
    pub fn done(&self) -> Result<(), BarrierError> {
        let mut counter = self.lock();
        if counter.poisoned {
            return Err(BarrierError::Poisoned);
        }
        if counter.remaining == 0 {
            error!("barrier signalled with nobody outstanding");
            return Err(BarrierError::Underflow);
        }

        counter.remaining -= 1;
        let drained = counter.remaining == 0;
        drop(counter);

        if drained {
            self.drained.notify_all();
        }
        Ok(())
    }

    /// Blocks until every participant has signalled.
    ///
    /// Returns immediately if the barrier is already empty.
    pub fn wait(&self) -> Result<(), BarrierError> {
        let counter = self.lock();
        let counter = self
            .drained
            .wait_while(counter, |c| c.remaining > 0 && !c.poisoned)
            .unwrap_or_else(PoisonError::into_inner);

        if counter.poisoned {
            Err(BarrierError::Poisoned)
        } else {
            Ok(())
        }
    }

    /// Rearms the barrier for `count` participants.
    ///
    /// Legal when the barrier is empty, or when exactly `count` participants
    /// are still outstanding (rearming to the same count is a no-op).
    pub fn reset(&self, count: usize) -> Result<(), BarrierError> {
        let mut counter = self.lock();
        if counter.poisoned {
            return Err(BarrierError::Poisoned);
        }
        if counter.remaining != 0 && counter.remaining != count {
            error!(
                remaining = counter.remaining,
                requested = count,
                "barrier rearmed while draining"
            );
            return Err(BarrierError::ResetWhileDraining {
                remaining: counter.remaining,
                requested: count,
            });
        }

        counter.armed = count;
        counter.remaining = count;
        Ok(())
    }

    /// Marks the barrier as permanently broken and wakes every waiter.
    ///
    /// Used when a participant dies and will never signal.
    pub fn poison(&self) {
        self.lock().poisoned = true;
        self.drained.notify_all();
    }

    /// Participants still outstanding. May be stale by the time it returns.
    pub fn remaining(&self) -> usize {
        self.lock().remaining
    }

    pub fn state(&self) -> BarrierState {
        let counter = self.lock();
        if counter.poisoned {
            BarrierState::Poisoned
        } else if counter.remaining == 0 {
            BarrierState::Empty
        } else if counter.remaining == counter.armed {
            BarrierState::Armed(counter.remaining)
        } else {
            BarrierState::Draining(counter.remaining)
        }
    }
}

/// Message delivered with every opened round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Continue,
    Stop,
}

#[derive(Debug)]
struct Round {
    number: u64,
    signal: Signal,
}

/// Coordinator-to-participants release with an explicit continue/stop tag.
#[derive(Debug)]
pub struct ReleaseGate {
    round: Mutex<Round>,
    opened: Condvar,
}

impl ReleaseGate {
    /// A gate with no round opened yet.
    pub fn new() -> Self {
        Self {
            round: Mutex::new(Round {
                number: 0,
                signal: Signal::Continue,
            }),
            opened: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Round> {
        self.round.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens the next round with `signal` and returns its number.
    ///
    /// `Stop` is final: once sent, later calls change nothing and return the
    /// round that carried it.
    pub fn open(&self, signal: Signal) -> u64 {
        let mut round = self.lock();
        if round.signal == Signal::Stop {
            return round.number;
        }

        round.number += 1;
        round.signal = signal;
        let number = round.number;
        drop(round);

        self.opened.notify_all();
        number
    }

    /// Blocks until round `number` is opened (or the gate is stopped) and
    /// returns the signal it carried.
    pub fn wait_for(&self, number: u64) -> Signal {
        let round = self.lock();
        let round = self
            .opened
            .wait_while(round, |r| r.number < number && r.signal != Signal::Stop)
            .unwrap_or_else(PoisonError::into_inner);
        round.signal
    }

    pub fn is_stopped(&self) -> bool {
        self.lock().signal == Signal::Stop
    }

    /// Number of the most recently opened round.
    pub fn round(&self) -> u64 {
        self.lock().number
    }
}

impl Default for ReleaseGate {
    fn default() -> Self {
        Self::new()
    }
}
