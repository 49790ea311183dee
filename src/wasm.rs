//! WASM bindings for Logicsim Core.
//!
//! This module provides JavaScript-friendly bindings for use in web
//! browsers, where a canvas frontend translates gestures into netlist
//! edits and reads back settled signal values.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmLogicSim } from 'logicsim_core';
//!
//! await init();
//!
//! const netlist = JSON.stringify({
//!   gates: [
//!     { id: 0, kind: "input", arity: 0 },
//!     { id: 1, kind: "not", arity: 1 },
//!     { id: 2, kind: "output", arity: 1 },
//!   ],
//!   wires: [
//!     { source: { gate: 0, index: 0 }, sink: { gate: 1, index: 0 } },
//!     { source: { gate: 1, index: 0 }, sink: { gate: 2, index: 0 } },
//!   ],
//! });
//!
//! const sim = new WasmLogicSim(netlist);
//! sim.set_input(0, "1");
//! console.log(sim.read_outputs()); // "2=0"
//! ```

use std::collections::HashMap;

use wasm_bindgen::prelude::*;

use crate::circuit::GateId;
use crate::error::SimError;
use crate::gates::GateKind;
use crate::netlist::Netlist;
use crate::sim::{Simulator, SimulatorConfig, DEFAULT_MAX_ROUNDS};
use crate::signal::Signal;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// WASM-compatible logic circuit simulator.
///
/// This struct wraps the native [`Simulator`] and addresses gates by
/// their netlist ids, so a JavaScript host never handles raw keys.
/// Oscillation is reported through the `oscillating` / `last_rounds`
/// getters instead of an exception, so poking an unstable circuit does
/// not break the host's update loop.
#[wasm_bindgen]
pub struct WasmLogicSim {
    simulator: Simulator,
    /// Netlist id of every gate.
    gates: HashMap<usize, GateId>,
    /// `Output` probes in record order, as (netlist id, gate).
    outputs: Vec<(usize, GateId)>,
    /// Rounds used by the most recent settle.
    last_rounds: usize,
    /// Whether the most recent settle hit the round bound.
    oscillating: bool,
}

#[wasm_bindgen]
impl WasmLogicSim {
    /// Create a new simulator from a JSON netlist.
    ///
    /// # Arguments
    /// * `netlist_json` - The circuit structure as JSON gate/wire records
    ///
    /// # Returns
    /// A settled `WasmLogicSim` instance, or an error if the netlist is
    /// invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(netlist_json: &str) -> Result<WasmLogicSim, JsValue> {
        Self::with_config(netlist_json, DEFAULT_MAX_ROUNDS)
    }

    /// Create a new simulator with a custom propagation round bound.
    ///
    /// # Arguments
    /// * `netlist_json` - The circuit structure as JSON gate/wire records
    /// * `max_rounds` - Maximum propagation rounds per stimulus
    #[wasm_bindgen]
    pub fn with_config(netlist_json: &str, max_rounds: usize) -> Result<WasmLogicSim, JsValue> {
        let netlist =
            Netlist::from_json(netlist_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let (circuit, imported) = netlist
            .import()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let gates = netlist
            .gates
            .iter()
            .zip(&imported)
            .map(|(record, &id)| (record.id, id))
            .collect();
        let outputs = netlist
            .gates
            .iter()
            .zip(&imported)
            .filter(|(record, _)| record.kind == GateKind::Output)
            .map(|(record, &id)| (record.id, id))
            .collect();

        let config = SimulatorConfig::new().with_max_rounds(max_rounds);
        let mut sim = WasmLogicSim {
            simulator: Simulator::with_config(circuit, config),
            gates,
            outputs,
            last_rounds: 0,
            oscillating: false,
        };
        let result = sim.simulator.settle().map(|r| r.rounds);
        sim.record(result)?;
        Ok(sim)
    }

    /// Drive an external input gate and settle.
    ///
    /// # Arguments
    /// * `id` - Netlist id of an `input` gate
    /// * `value` - The level: `"0"`, `"1"` or `"x"`
    #[wasm_bindgen]
    pub fn set_input(&mut self, id: usize, value: &str) -> Result<(), JsValue> {
        let gate = self.lookup(id)?;
        let signal = Signal::from_str(value)
            .ok_or_else(|| JsValue::from_str(&format!("bad level '{value}' (use 0, 1 or x)")))?;
        let result = self.simulator.set_input(gate, signal).map(|r| r.rounds);
        self.record(result)
    }

    /// The settled level of any gate, by netlist id.
    ///
    /// # Returns
    /// `"0"`, `"1"` or `"x"`.
    #[wasm_bindgen]
    pub fn get_output(&self, id: usize) -> Result<String, JsValue> {
        let gate = self.lookup(id)?;
        let value = self
            .simulator
            .observe(gate)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(value.to_string())
    }

    /// All settled `output` probes as one `ID=VALUE` line, in netlist
    /// order.
    #[wasm_bindgen]
    pub fn read_outputs(&self) -> String {
        let mut line = String::new();
        for &(id, gate) in &self.outputs {
            if !line.is_empty() {
                line.push(' ');
            }
            let value = self
                .simulator
                .observe(gate)
                .map(|v| v.to_string())
                .unwrap_or_else(|_| Signal::Unknown.to_string());
            line.push_str(&format!("{id}={value}"));
        }
        line
    }

    /// Number of gates in the circuit.
    #[wasm_bindgen(getter)]
    pub fn gate_count(&self) -> usize {
        self.simulator.circuit().gate_count()
    }

    /// Rounds used by the most recent settle.
    #[wasm_bindgen(getter)]
    pub fn last_rounds(&self) -> usize {
        self.last_rounds
    }

    /// Whether the most recent settle hit the round bound.
    #[wasm_bindgen(getter)]
    pub fn oscillating(&self) -> bool {
        self.oscillating
    }

    /// The configured round bound.
    #[wasm_bindgen(getter)]
    pub fn max_rounds(&self) -> usize {
        self.simulator.max_rounds()
    }

    fn lookup(&self, id: usize) -> Result<GateId, JsValue> {
        self.gates
            .get(&id)
            .copied()
            .ok_or_else(|| JsValue::from_str(&format!("no gate with id {id}")))
    }

    /// Fold a settle result into the oscillation getters. Only
    /// oscillation is absorbed; other errors surface to the host.
    fn record(&mut self, result: crate::error::Result<usize>) -> Result<(), JsValue> {
        match result {
            Ok(rounds) => {
                self.last_rounds = rounds;
                self.oscillating = false;
                Ok(())
            }
            Err(SimError::Oscillation { rounds }) => {
                self.last_rounds = rounds;
                self.oscillating = true;
                Ok(())
            }
            Err(e) => Err(JsValue::from_str(&e.to_string())),
        }
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Get the default propagation round bound.
#[wasm_bindgen]
pub fn default_max_rounds() -> usize {
    DEFAULT_MAX_ROUNDS
}
