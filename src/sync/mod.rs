pub mod barrier;

pub use barrier::{Barrier, BarrierState, ReleaseGate, Signal};
