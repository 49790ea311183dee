//! Circuit graph representation and topology analysis.
//!
//! This module provides the mutable gate/wire graph the engine
//! simulates. The [`Circuit`] struct owns all gates and wires and
//! enforces the wiring invariants; [`Topology`] derives the evaluation
//! order the scheduler uses.

mod graph;
mod topology;
mod types;

pub use graph::{Circuit, Gate, Wire};
pub use topology::Topology;
pub use types::*;
