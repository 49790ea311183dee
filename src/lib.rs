//! # Logicsim Core
//!
//! An event-driven digital logic circuit simulator.
//!
//! This library provides:
//! - A mutable gate/wire circuit graph with a strict wiring contract
//! - Three-valued signals (`0`, `1`, `x`) with Kleene evaluation
//! - Delta-cycle propagation to quiescence with oscillation detection
//! - A serializable netlist boundary for hosting frontends
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`signal`] - The three-valued logic level
//! - [`gates`] - Gate kinds and their pure evaluation functions
//! - [`circuit`] - Circuit graph representation and topology analysis
//! - [`sim`] - Scheduler and the [`Simulator`] facade
//! - [`netlist`] - Structure import/export (JSON for concrete hosts)
//! - [`bench`] - Stimulus-line stream processing (CLI only)
//!
//! ## Usage
//!
//! ### Library
//!
//! ```
//! use logicsim_core::{Circuit, GateKind, PinId, Signal, Simulator};
//!
//! let mut sim = Simulator::new(Circuit::new());
//! let a = sim.add_gate(GateKind::Input, 0)?;
//! let b = sim.add_gate(GateKind::Input, 0)?;
//! let and = sim.add_gate(GateKind::And, 2)?;
//! sim.connect(PinId::output(a), PinId::input(and, 0))?;
//! sim.connect(PinId::output(b), PinId::input(and, 1))?;
//!
//! sim.set_input(a, Signal::High)?;
//! sim.set_input(b, Signal::High)?;
//! assert_eq!(sim.observe(and)?, Signal::High);
//! # Ok::<(), logicsim_core::SimError>(())
//! ```
//!
//! ### Native CLI
//!
//! ```bash
//! logicsim circuit.json --set 0=1 --set 1=0
//! printf '0=1 1=0\n0=1 1=1\n' | logicsim circuit.json
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmLogicSim } from 'logicsim_core';
//!
//! const sim = new WasmLogicSim(netlistJson);
//! sim.set_input(0, "1");
//! console.log(sim.read_outputs());
//! ```
//!
//! ## Simulation Method
//!
//! Propagation is organized in synchronous delta-cycle rounds. Each
//! round evaluates every pending gate against the pin values as of the
//! round start, commits all output changes at once, and queues the
//! gates downstream of a change for the next round. Rounds repeat until
//! no output changes (quiescence) or the configured round bound is hit,
//! which is reported as an oscillation. Feedback loops are therefore
//! legal wiring: stable ones (latches) settle, unstable ones are caught
//! by the bound instead of hanging the engine.

pub mod circuit;
pub mod error;
pub mod gates;
pub mod netlist;
pub mod signal;
pub mod sim;

#[cfg(feature = "cli")]
pub mod bench;

// Re-export main types for convenience
pub use circuit::{Circuit, GateId, PinDirection, PinId, WireId};
pub use error::{Result, SimError};
pub use gates::GateKind;
pub use netlist::Netlist;
pub use signal::Signal;
pub use sim::{
    EngineState, SettleOutcome, SettleReport, Simulator, SimulatorConfig, DEFAULT_MAX_ROUNDS,
};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmLogicSim;
