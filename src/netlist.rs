//! Netlist import/export boundary.
//!
//! A [`Netlist`] is the serializable description of a circuit's
//! structure: a list of gate records and a list of wire records. It
//! carries no signal state. Export then import reproduces the graph up
//! to id renaming, and exporting the reimported circuit reproduces the
//! records exactly.
//!
//! The records are plain serde data, so a host may pick any format;
//! [`Netlist::to_json`] / [`Netlist::from_json`] cover the common JSON
//! case used by the CLI and WASM frontends.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::circuit::{Circuit, Gate, GateId, PinDirection, PinId};
use crate::error::{Result, SimError};
use crate::gates::GateKind;

/// One gate in a netlist.
///
/// Exported ids are dense ordinals in creation order; import accepts
/// any set of distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateRecord {
    /// Id the netlist's wires (and its host) address this gate by.
    pub id: usize,
    /// The gate function.
    pub kind: GateKind,
    /// Number of input pins.
    pub arity: usize,
}

/// One end of a wire record: a gate id plus a pin index on that gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PinRecord {
    /// Netlist id of the gate.
    pub gate: usize,
    /// Pin position; output pins are always index 0.
    pub index: usize,
}

/// One wire: an output pin driving an input pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRecord {
    /// The driving output pin.
    pub source: PinRecord,
    /// The driven input pin.
    pub sink: PinRecord,
}

/// A serializable description of a circuit's structure.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Netlist {
    /// Gate records, in creation order when exported.
    pub gates: Vec<GateRecord>,
    /// Wire records, in canonical order when exported.
    pub wires: Vec<WireRecord>,
}

impl Netlist {
    /// Export the structure of a circuit.
    ///
    /// Gates are numbered 0.. in creation order; wires are sorted by
    /// (source gate, sink gate, sink pin), so structurally equal
    /// circuits export equal netlists regardless of edit history.
    pub fn export(circuit: &Circuit) -> Self {
        let mut order: Vec<(GateId, &Gate)> = circuit.gates().collect();
        order.sort_by_key(|(_, gate)| gate.serial());

        let ordinals: HashMap<GateId, usize> = order
            .iter()
            .enumerate()
            .map(|(ordinal, (id, _))| (*id, ordinal))
            .collect();

        let gates = order
            .iter()
            .enumerate()
            .map(|(ordinal, (_, gate))| GateRecord {
                id: ordinal,
                kind: gate.kind,
                arity: gate.arity(),
            })
            .collect();

        let mut wires: Vec<WireRecord> = circuit
            .wires()
            .map(|(_, wire)| WireRecord {
                source: PinRecord {
                    gate: ordinals[&wire.source.gate],
                    index: wire.source.index,
                },
                sink: PinRecord {
                    gate: ordinals[&wire.sink.gate],
                    index: wire.sink.index,
                },
            })
            .collect();
        // Sink pins are unique (one driver each), so this order is total.
        wires.sort_by_key(|wire| (wire.source.gate, wire.sink));

        Self { gates, wires }
    }

    /// Build a circuit from the records.
    ///
    /// # Returns
    /// The circuit plus the new [`GateId`] of each gate record, in
    /// record order, for host addressing. Fails with
    /// [`SimError::InvalidNetlist`] on duplicate gate ids or wires
    /// referencing unknown gates; illegal arities and wiring surface as
    /// the usual graph errors.
    pub fn import(&self) -> Result<(Circuit, Vec<GateId>)> {
        let mut circuit = Circuit::new();
        let mut by_id: HashMap<usize, GateId> = HashMap::with_capacity(self.gates.len());
        let mut ids = Vec::with_capacity(self.gates.len());

        for record in &self.gates {
            let id = circuit.add_gate(record.kind, record.arity)?;
            if by_id.insert(record.id, id).is_some() {
                return Err(SimError::invalid_netlist(format!(
                    "duplicate gate id {}",
                    record.id
                )));
            }
            ids.push(id);
        }

        for record in &self.wires {
            let source = self.resolve(&by_id, record.source.gate)?;
            let sink = self.resolve(&by_id, record.sink.gate)?;
            circuit.connect(
                PinId {
                    gate: source,
                    direction: PinDirection::Output,
                    index: record.source.index,
                },
                PinId::input(sink, record.sink.index),
            )?;
        }

        Ok((circuit, ids))
    }

    fn resolve(&self, by_id: &HashMap<usize, GateId>, id: usize) -> Result<GateId> {
        by_id.get(&id).copied().ok_or_else(|| {
            SimError::invalid_netlist(format!("wire references unknown gate id {id}"))
        })
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|source| SimError::JsonError { source })
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| SimError::JsonError { source })
    }
}

/// Read a JSON netlist file.
#[cfg(feature = "cli")]
pub fn read_file(path: &std::path::Path) -> Result<Netlist> {
    let content = std::fs::read_to_string(path).map_err(|e| SimError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    Netlist::from_json(&content)
}
