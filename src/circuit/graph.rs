//! Circuit graph structure and mutation operations.
//!
//! The [`Circuit`] owns every gate and wire. Mutation operations follow
//! a validate-then-commit discipline: all arguments are checked before
//! anything is touched, so a failed call leaves the graph exactly as it
//! was. Two invariants hold between operations:
//!
//! - no wire references a removed gate or an out-of-range pin
//! - every input pin mirrors the current output value of its driving
//!   wire's source, or holds `Unknown` when undriven

use slotmap::SlotMap;
use tracing::debug;

use crate::error::{Result, SimError};
use crate::gates::GateKind;
use crate::signal::Signal;

use super::types::{GateId, PinDirection, PinId, WireId};

/// A single gate instance: kind, pin state, and wiring.
#[derive(Debug, Clone)]
pub struct Gate {
    /// The gate function this instance computes.
    pub kind: GateKind,
    /// Current value of each input pin.
    pub(crate) inputs: Box<[Signal]>,
    /// The wire driving each input pin, if any.
    pub(crate) drivers: Box<[Option<WireId>]>,
    /// Current value of the output pin.
    pub(crate) output: Signal,
    /// Wires fanning out from the output pin.
    pub(crate) fanout: Vec<WireId>,
    /// Creation stamp, used for deterministic ordering.
    pub(crate) serial: u64,
}

impl Gate {
    /// Declared input arity.
    pub fn arity(&self) -> usize {
        self.inputs.len()
    }

    /// Current input pin values, in pin order.
    pub fn inputs(&self) -> &[Signal] {
        &self.inputs
    }

    /// Current value of one input pin.
    pub fn input(&self, index: usize) -> Option<Signal> {
        self.inputs.get(index).copied()
    }

    /// Current output pin value.
    pub fn output(&self) -> Signal {
        self.output
    }

    /// Wires leaving the output pin.
    pub fn fanout(&self) -> &[WireId] {
        &self.fanout
    }

    /// How many input pins currently have a driving wire.
    pub fn driven_inputs(&self) -> usize {
        self.drivers.iter().flatten().count()
    }

    /// Creation stamp; earlier gates have smaller serials.
    pub fn serial(&self) -> u64 {
        self.serial
    }
}

/// A connection from one output pin to one input pin.
///
/// Fan-out is expressed as several wires leaving the same output pin;
/// an input pin accepts at most one wire.
#[derive(Debug, Clone, Copy)]
pub struct Wire {
    /// The driving output pin.
    pub source: PinId,
    /// The driven input pin.
    pub sink: PinId,
}

/// A mutable gate-level circuit graph.
#[derive(Debug, Default)]
pub struct Circuit {
    gates: SlotMap<GateId, Gate>,
    wires: SlotMap<WireId, Wire>,
    /// Gates whose inputs changed since the last propagation drain.
    dirty: Vec<GateId>,
    /// Monotonic counter backing [`Gate::serial`].
    next_serial: u64,
}

impl Circuit {
    /// Create an empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of gates in the graph.
    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// Number of wires in the graph.
    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    /// Add a gate of the given kind with the given input arity.
    ///
    /// The new gate's output starts at the kind's initial level (see
    /// [`GateKind::initial_output`]) and the gate is queued for its
    /// first evaluation.
    ///
    /// # Returns
    /// The id of the new gate, or [`SimError::UnsupportedArity`] if the
    /// kind does not allow `arity` inputs.
    pub fn add_gate(&mut self, kind: GateKind, arity: usize) -> Result<GateId> {
        if !kind.supports_arity(arity) {
            return Err(SimError::UnsupportedArity { kind, arity });
        }

        let serial = self.next_serial;
        self.next_serial += 1;

        let id = self.gates.insert(Gate {
            kind,
            inputs: vec![Signal::Unknown; arity].into_boxed_slice(),
            drivers: vec![None; arity].into_boxed_slice(),
            output: kind.initial_output(),
            fanout: Vec::new(),
            serial,
        });
        self.dirty.push(id);
        debug!(%id, %kind, arity, "gate added");
        Ok(id)
    }

    /// Remove a gate and every wire attached to it.
    ///
    /// Input pins downstream of the removed gate become undriven
    /// (`Unknown`) and their gates are queued for evaluation.
    pub fn remove_gate(&mut self, id: GateId) -> Result<()> {
        let gate = self
            .gates
            .get(id)
            .ok_or(SimError::GateNotFound { id })?;

        // Snapshot attached wires, then cascade through disconnect so
        // sink pins are reset exactly as for a manual unwire. A
        // self-loop wire shows up on both sides, hence the dedup.
        let mut attached: Vec<WireId> = gate.fanout.clone();
        attached.extend(gate.drivers.iter().flatten());
        attached.sort_unstable();
        attached.dedup();
        for wire in attached {
            self.disconnect(wire)?;
        }

        self.gates.remove(id);
        // The dead gate may have been re-queued by its own disconnects.
        self.dirty.retain(|&g| g != id);
        debug!(%id, "gate removed");
        Ok(())
    }

    /// Connect an output pin to an input pin with a new wire.
    ///
    /// The sink pin immediately takes on the source's current output
    /// value and the sink gate is queued for evaluation. On any error
    /// the graph is left untouched.
    ///
    /// # Returns
    /// The id of the new wire. Fails with [`SimError::GateNotFound`] or
    /// [`SimError::PinNotFound`] for dangling references,
    /// [`SimError::TypeMismatch`] if the pin directions are wrong, and
    /// [`SimError::AlreadyDriven`] if the sink already has a driver.
    pub fn connect(&mut self, source: PinId, sink: PinId) -> Result<WireId> {
        let source_gate = self
            .gates
            .get(source.gate)
            .ok_or(SimError::GateNotFound { id: source.gate })?;
        let sink_gate = self
            .gates
            .get(sink.gate)
            .ok_or(SimError::GateNotFound { id: sink.gate })?;

        if source.direction != PinDirection::Output {
            return Err(SimError::type_mismatch(format!(
                "wire source {source} is not an output pin"
            )));
        }
        if sink.direction != PinDirection::Input {
            return Err(SimError::type_mismatch(format!(
                "wire sink {sink} is not an input pin"
            )));
        }
        if !source_gate.kind.has_output() || source.index != 0 {
            return Err(SimError::PinNotFound { pin: source });
        }
        if sink.index >= sink_gate.arity() {
            return Err(SimError::PinNotFound { pin: sink });
        }
        if let Some(wire) = sink_gate.drivers[sink.index] {
            return Err(SimError::AlreadyDriven { sink, wire });
        }

        let value = source_gate.output;
        let id = self.wires.insert(Wire { source, sink });
        self.gates[source.gate].fanout.push(id);
        let sink_gate = &mut self.gates[sink.gate];
        sink_gate.drivers[sink.index] = Some(id);
        sink_gate.inputs[sink.index] = value;
        self.dirty.push(sink.gate);
        debug!(%id, %source, %sink, "wire connected");
        Ok(id)
    }

    /// Remove a wire. The sink pin becomes undriven (`Unknown`) and its
    /// gate is queued for evaluation.
    pub fn disconnect(&mut self, id: WireId) -> Result<()> {
        let wire = self
            .wires
            .remove(id)
            .ok_or(SimError::WireNotFound { id })?;

        if let Some(gate) = self.gates.get_mut(wire.source.gate) {
            gate.fanout.retain(|&w| w != id);
        }
        if let Some(gate) = self.gates.get_mut(wire.sink.gate) {
            gate.drivers[wire.sink.index] = None;
            gate.inputs[wire.sink.index] = Signal::Unknown;
            self.dirty.push(wire.sink.gate);
        }
        debug!(%id, "wire disconnected");
        Ok(())
    }

    /// Look up a gate.
    pub fn gate(&self, id: GateId) -> Option<&Gate> {
        self.gates.get(id)
    }

    /// Look up a wire.
    pub fn wire(&self, id: WireId) -> Option<&Wire> {
        self.wires.get(id)
    }

    /// Iterate over all gates with their ids, in storage order.
    pub fn gates(&self) -> impl Iterator<Item = (GateId, &Gate)> {
        self.gates.iter()
    }

    /// Iterate over all wires with their ids, in storage order.
    pub fn wires(&self) -> impl Iterator<Item = (WireId, &Wire)> {
        self.wires.iter()
    }

    /// Gates driven by `id`'s output, one entry per fanout wire.
    pub fn sinks_of(&self, id: GateId) -> impl Iterator<Item = GateId> + '_ {
        self.gates.get(id).into_iter().flat_map(move |gate| {
            gate.fanout
                .iter()
                .filter_map(move |&w| self.wires.get(w).map(|wire| wire.sink.gate))
        })
    }

    /// Current value at a pin.
    pub fn get_value(&self, pin: PinId) -> Result<Signal> {
        let gate = self
            .gates
            .get(pin.gate)
            .ok_or(SimError::GateNotFound { id: pin.gate })?;
        match pin.direction {
            PinDirection::Input => gate.input(pin.index).ok_or(SimError::PinNotFound { pin }),
            PinDirection::Output => {
                if gate.kind.has_output() && pin.index == 0 {
                    Ok(gate.output)
                } else {
                    Err(SimError::PinNotFound { pin })
                }
            }
        }
    }

    /// The externally meaningful level of a gate: an `Output` probe
    /// reads its input pin, every other kind reads its output pin.
    pub fn observe(&self, id: GateId) -> Result<Signal> {
        let gate = self.gates.get(id).ok_or(SimError::GateNotFound { id })?;
        Ok(match gate.kind {
            GateKind::Output => gate.inputs[0],
            _ => gate.output,
        })
    }

    /// Ids of all `Input` gates, in creation order.
    pub fn external_inputs(&self) -> Vec<GateId> {
        self.gates_of_kind(|kind| kind == GateKind::Input)
    }

    /// Ids of all `Output` probe gates, in creation order.
    pub fn external_outputs(&self) -> Vec<GateId> {
        self.gates_of_kind(|kind| kind == GateKind::Output)
    }

    fn gates_of_kind(&self, select: impl Fn(GateKind) -> bool) -> Vec<GateId> {
        let mut ids: Vec<GateId> = self
            .gates
            .iter()
            .filter(|(_, gate)| select(gate.kind))
            .map(|(id, _)| id)
            .collect();
        ids.sort_by_key(|&id| self.gates[id].serial);
        ids
    }

    /// Write a new output value and mirror it into every fanout sink
    /// pin. The sink gates are appended to `touched`.
    pub(crate) fn apply_output(&mut self, id: GateId, value: Signal, touched: &mut Vec<GateId>) {
        let Some(gate) = self.gates.get_mut(id) else {
            return;
        };
        gate.output = value;
        let fanout = gate.fanout.clone();
        for wire_id in fanout {
            let wire = self.wires[wire_id];
            let sink_gate = &mut self.gates[wire.sink.gate];
            sink_gate.inputs[wire.sink.index] = value;
            touched.push(wire.sink.gate);
        }
    }

    /// Impose a new output level on a source gate and queue the sinks it
    /// feeds. A no-op when the level is unchanged.
    pub(crate) fn drive_output(&mut self, id: GateId, value: Signal) {
        if self.gates.get(id).map(|g| g.output) == Some(value) {
            return;
        }
        let mut touched = Vec::new();
        self.apply_output(id, value, &mut touched);
        self.dirty.append(&mut touched);
    }

    /// Drain the queue of gates awaiting evaluation.
    pub(crate) fn take_dirty(&mut self) -> Vec<GateId> {
        std::mem::take(&mut self.dirty)
    }

    /// Queue every gate for evaluation.
    pub(crate) fn mark_all_dirty(&mut self) {
        let ids: Vec<GateId> = self.gates.keys().collect();
        self.dirty.extend(ids);
    }
}
