//! Main simulator interface.

use tracing::debug;

use crate::circuit::{Circuit, GateId, PinId, Topology, WireId};
use crate::error::{Result, SimError};
use crate::gates::GateKind;
use crate::signal::Signal;

use super::scheduler::{Scheduler, SettleOutcome, SettleReport};
use super::DEFAULT_MAX_ROUNDS;

/// Configuration for the simulator.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Maximum propagation rounds per stimulus.
    pub max_rounds: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

impl SimulatorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the round bound.
    ///
    /// The bound only matters for circuits with feedback: combinational
    /// logic settles in at most its depth in rounds. A lower bound
    /// surfaces oscillations sooner at the cost of rejecting deep
    /// feedback that would have stabilized.
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }
}

/// Where the engine is in its settle cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No propagation in flight; values are consistent and observable.
    Quiescent,
    /// A propagation pass is running.
    Propagating,
}

/// The main simulation engine.
///
/// Owns a [`Circuit`] and follows a settle-then-observe contract: every
/// mutating call (graph edit or stimulus) propagates to quiescence
/// before returning, so queries between calls always see consistent
/// values. If the settle triggered by an edit hits the round bound the
/// edit stays committed and the call fails with
/// [`SimError::Oscillation`]; the unfinished work stays queued and is
/// reported again by every later settle until the circuit is fixed.
pub struct Simulator {
    /// The circuit being simulated.
    circuit: Circuit,
    /// Worklist propagation engine.
    scheduler: Scheduler,
    /// Settle cycle state.
    state: EngineState,
    /// Host callback fired once per settle.
    on_settled: Option<Box<dyn FnMut(&SettleReport)>>,
}

impl Simulator {
    /// Create a simulator owning the given circuit, with default
    /// configuration.
    ///
    /// The whole graph is queued for evaluation; call
    /// [`settle`](Self::settle) once to bring the initial state up.
    pub fn new(circuit: Circuit) -> Self {
        Self::with_config(circuit, SimulatorConfig::default())
    }

    /// Create a simulator with a custom configuration.
    pub fn with_config(mut circuit: Circuit, config: SimulatorConfig) -> Self {
        // Queue everything so the first settle evaluates the whole
        // graph, whatever state the circuit arrived in.
        circuit.mark_all_dirty();
        Self {
            circuit,
            scheduler: Scheduler::with_config(config.max_rounds),
            state: EngineState::Quiescent,
            on_settled: None,
        }
    }

    /// Run queued propagation work until the circuit is quiescent.
    ///
    /// # Returns
    /// The [`SettleReport`] on quiescence. Fails with
    /// [`SimError::Oscillation`] if the round bound is hit first; the
    /// pending work stays queued, so any later settle resumes it.
    pub fn settle(&mut self) -> Result<SettleReport> {
        self.state = EngineState::Propagating;
        let result = self.scheduler.settle(&mut self.circuit);
        self.state = EngineState::Quiescent;

        let report = result?;
        if let Some(callback) = self.on_settled.as_mut() {
            callback(&report);
        }
        match report.outcome {
            SettleOutcome::Quiescent => Ok(report),
            SettleOutcome::Oscillating => Err(SimError::oscillation(report.rounds)),
        }
    }

    /// Add a gate and settle.
    ///
    /// # Arguments
    /// * `kind` - The gate function
    /// * `arity` - Number of input pins
    pub fn add_gate(&mut self, kind: GateKind, arity: usize) -> Result<GateId> {
        self.check_idle("add a gate")?;
        let id = self.circuit.add_gate(kind, arity)?;
        self.settle()?;
        Ok(id)
    }

    /// Remove a gate, cascading its wires, and settle.
    pub fn remove_gate(&mut self, id: GateId) -> Result<SettleReport> {
        self.check_idle("remove a gate")?;
        self.circuit.remove_gate(id)?;
        self.settle()
    }

    /// Connect an output pin to an input pin and settle.
    pub fn connect(&mut self, source: PinId, sink: PinId) -> Result<WireId> {
        self.check_idle("connect a wire")?;
        let id = self.circuit.connect(source, sink)?;
        self.settle()?;
        Ok(id)
    }

    /// Remove a wire and settle.
    pub fn disconnect(&mut self, id: WireId) -> Result<SettleReport> {
        self.check_idle("disconnect a wire")?;
        self.circuit.disconnect(id)?;
        self.settle()
    }

    /// Drive an external input gate to a new level and settle.
    ///
    /// # Arguments
    /// * `id` - An `Input` gate
    /// * `value` - The level to impose
    ///
    /// # Returns
    /// The settle report for the propagation this stimulus caused.
    /// Fails with [`SimError::TypeMismatch`] if `id` is not an `Input`.
    pub fn set_input(&mut self, id: GateId, value: Signal) -> Result<SettleReport> {
        self.check_idle("set an input")?;
        let kind = self
            .circuit
            .gate(id)
            .map(|gate| gate.kind)
            .ok_or(SimError::GateNotFound { id })?;
        if kind != GateKind::Input {
            return Err(SimError::type_mismatch(format!(
                "{id} is a {kind} gate, not an INPUT"
            )));
        }
        debug!(%id, %value, "stimulus");
        self.circuit.drive_output(id, value);
        self.settle()
    }

    /// Current value at a pin.
    pub fn get_value(&self, pin: PinId) -> Result<Signal> {
        self.circuit.get_value(pin)
    }

    /// The externally meaningful level of a gate: an `Output` probe
    /// reads its input pin, every other kind its output pin.
    pub fn observe(&self, id: GateId) -> Result<Signal> {
        self.circuit.observe(id)
    }

    /// Get a reference to the circuit.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Current settle cycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// The configured round bound.
    pub fn max_rounds(&self) -> usize {
        self.scheduler.max_rounds()
    }

    /// Whether the graph currently contains a feedback cycle.
    pub fn has_feedback(&self) -> bool {
        Topology::analyze(&self.circuit).is_cyclic()
    }

    /// Register a callback fired once per settle, after the outcome is
    /// known. Replaces any previously registered callback.
    pub fn on_settled(&mut self, callback: impl FnMut(&SettleReport) + 'static) {
        self.on_settled = Some(Box::new(callback));
    }

    fn check_idle(&self, operation: &str) -> Result<()> {
        if self.state == EngineState::Propagating {
            return Err(SimError::busy(operation));
        }
        Ok(())
    }
}
