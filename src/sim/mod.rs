//! Event-driven signal propagation.
//!
//! This module provides the evaluation engine for the circuit graph.
//!
//! ## Delta-cycle rounds
//!
//! Propagation runs in rounds over a worklist of pending gates. Each
//! round:
//!
//! 1. evaluates every pending gate against the pin values as they stood
//!    at the round start
//! 2. applies all output changes at once
//! 3. copies changed outputs into downstream input pins and queues the
//!    affected gates for the next round
//!
//! Because writes land together, the result of a round does not depend
//! on the order gates were evaluated in; ordering (topological rank,
//! then creation serial) only fixes the order of reported changes.
//!
//! Rounds repeat until no gate's output changes (quiescence) or the
//! round bound is hit, which is reported as an oscillation. Source
//! gates (`Input`, `Const`) are never re-evaluated; their outputs are
//! authoritative.

mod scheduler;
mod simulator;

pub use scheduler::{Scheduler, SettleOutcome, SettleReport};
pub use simulator::{EngineState, Simulator, SimulatorConfig};

/// Maximum propagation rounds per stimulus before an oscillation is
/// reported.
pub const DEFAULT_MAX_ROUNDS: usize = 1000;
