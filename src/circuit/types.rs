//! Core identifier types for the circuit graph.

use std::fmt;

use slotmap::{new_key_type, Key};

new_key_type! {
    /// A unique identifier for a gate in the circuit.
    pub struct GateId;
}

new_key_type! {
    /// A unique identifier for a wire in the circuit.
    pub struct WireId;
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{:?}", self.data())
    }
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{:?}", self.data())
    }
}

/// Which side of a gate a pin sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinDirection {
    /// A pin that receives its value from a driving wire.
    Input,
    /// A pin that drives downstream wires.
    Output,
}

/// Address of a single pin: one terminal of one gate.
///
/// Input pins are numbered `0..arity`; every gate kind that drives a
/// value has a single output pin at index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PinId {
    /// The owning gate.
    pub gate: GateId,
    /// Input or output side.
    pub direction: PinDirection,
    /// Position among the gate's pins on that side.
    pub index: usize,
}

impl PinId {
    /// Address the `index`-th input pin of `gate`.
    pub fn input(gate: GateId, index: usize) -> Self {
        Self {
            gate,
            direction: PinDirection::Input,
            index,
        }
    }

    /// Address the output pin of `gate`.
    pub fn output(gate: GateId) -> Self {
        Self {
            gate,
            direction: PinDirection::Output,
            index: 0,
        }
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            PinDirection::Input => write!(f, "{}.in{}", self.gate, self.index),
            PinDirection::Output => write!(f, "{}.out", self.gate),
        }
    }
}
