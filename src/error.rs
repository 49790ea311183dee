//! Error types for the logic simulation engine.
//!
//! This module provides a unified error type [`SimError`] that covers
//! all error conditions that can occur during graph editing, signal
//! propagation, and netlist import/export.

use thiserror::Error;

use crate::circuit::{GateId, PinId, WireId};
use crate::gates::GateKind;

/// Result type alias using [`SimError`].
pub type Result<T> = std::result::Result<T, SimError>;

/// Unified error type for all simulation operations.
#[derive(Error, Debug)]
pub enum SimError {
    // ============ Gate Evaluation Errors ============
    /// Input count does not match the gate's arity
    #[error("{kind} gate expects {expected} input(s), got {got}")]
    ArityMismatch {
        kind: GateKind,
        expected: usize,
        got: usize,
    },

    /// Arity is outside what the gate kind allows
    #[error("{kind} gate cannot have {arity} input(s)")]
    UnsupportedArity { kind: GateKind, arity: usize },

    // ============ Graph Errors ============
    /// Gate not found in circuit
    #[error("Gate {id} not found in circuit")]
    GateNotFound { id: GateId },

    /// Wire not found in circuit
    #[error("Wire {id} not found in circuit")]
    WireNotFound { id: WireId },

    /// Pin reference does not exist on the gate
    #[error("Pin {pin} does not exist")]
    PinNotFound { pin: PinId },

    /// Input pin already has a driving wire
    #[error("Pin {sink} is already driven by wire {wire}")]
    AlreadyDriven { sink: PinId, wire: WireId },

    /// Wrong pin direction or gate kind for the requested operation
    #[error("Type mismatch: {message}")]
    TypeMismatch { message: String },

    // ============ Propagation Errors ============
    /// Propagation hit the round bound with work still pending
    #[error("Propagation did not settle after {rounds} rounds (circuit is oscillating)")]
    Oscillation { rounds: usize },

    /// Mutation attempted while a propagation is in flight
    #[error("Engine is busy propagating; cannot {operation}")]
    Busy { operation: String },

    // ============ Netlist Errors ============
    /// Netlist records are inconsistent
    #[error("Invalid netlist: {message}")]
    InvalidNetlist { message: String },

    /// Netlist JSON could not be serialized or parsed
    #[error("Netlist JSON error: {source}")]
    JsonError {
        #[source]
        source: serde_json::Error,
    },

    // ============ I/O Errors ============
    /// Error reading a netlist file
    #[error("Failed to read circuit file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed or unreadable stimulus line
    #[error("Stimulus error at line {line}: {message}")]
    StimulusError { line: usize, message: String },

    /// Error writing a response line
    #[error("Output write error: {message}")]
    OutputWriteError { message: String },
}

impl SimError {
    /// Create a type mismatch error
    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::TypeMismatch {
            message: message.into(),
        }
    }

    /// Create an oscillation error
    pub fn oscillation(rounds: usize) -> Self {
        Self::Oscillation { rounds }
    }

    /// Create a busy error
    pub fn busy(operation: impl Into<String>) -> Self {
        Self::Busy {
            operation: operation.into(),
        }
    }

    /// Create an invalid netlist error
    pub fn invalid_netlist(message: impl Into<String>) -> Self {
        Self::InvalidNetlist {
            message: message.into(),
        }
    }

    /// Create a stimulus error
    pub fn stimulus(line: usize, message: impl Into<String>) -> Self {
        Self::StimulusError {
            line,
            message: message.into(),
        }
    }
}
