//! Stimulus stream processing for the CLI frontend.
//!
//! Binds a [`Simulator`] to the netlist ids its host addresses it by
//! and drives it from text stimulus lines. Each line carries
//! whitespace-separated `ID=VALUE` tokens (`0=1 3=x`); the bench
//! applies them in order, settles, and emits one line of settled
//! external outputs in the same `ID=VALUE` shape.

use std::collections::HashMap;
use std::fmt;
use std::io::{self, BufRead, Write};

use crate::circuit::GateId;
use crate::error::{Result, SimError};
use crate::gates::GateKind;
use crate::netlist::Netlist;
use crate::sim::{Simulator, SimulatorConfig};
use crate::signal::Signal;

/// One parsed `ID=VALUE` stimulus token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stimulus {
    /// Netlist id of the target `Input` gate.
    pub id: usize,
    /// The level to impose.
    pub value: Signal,
}

/// Parse one `ID=VALUE` token from stimulus line `line`.
pub fn parse_stimulus(token: &str, line: usize) -> Result<Stimulus> {
    let (id, value) = token
        .split_once('=')
        .ok_or_else(|| SimError::stimulus(line, format!("expected ID=VALUE, got '{token}'")))?;
    let id = id
        .trim()
        .parse::<usize>()
        .map_err(|_| SimError::stimulus(line, format!("bad gate id '{id}'")))?;
    let value = Signal::from_str(value.trim())
        .ok_or_else(|| SimError::stimulus(line, format!("bad level '{value}' (use 0, 1 or x)")))?;
    Ok(Stimulus { id, value })
}

/// A simulator plus the netlist-id addressing of its host boundary.
pub struct Bench {
    simulator: Simulator,
    /// Netlist id of every gate.
    gates: HashMap<usize, GateId>,
    /// `Output` probes in record order, as (netlist id, gate).
    outputs: Vec<(usize, GateId)>,
}

impl fmt::Debug for Bench {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bench")
            .field("gates", &self.gates)
            .field("outputs", &self.outputs)
            .finish_non_exhaustive()
    }
}

impl Bench {
    /// Import a netlist and settle the initial state.
    pub fn new(netlist: &Netlist, config: SimulatorConfig) -> Result<Self> {
        let (circuit, imported) = netlist.import()?;
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

        let mut simulator = Simulator::with_config(circuit, config);
        simulator.settle()?;
        Ok(Self {
            simulator,
            gates,
            outputs,
        })
    }

    /// Apply every stimulus on `line`, settling after each, and format
    /// the settled external outputs.
    pub fn apply_line(&mut self, line: &str, line_no: usize) -> Result<String> {
        for token in line.split_whitespace() {
            let stimulus = parse_stimulus(token, line_no)?;
            let gate = *self.gates.get(&stimulus.id).ok_or_else(|| {
                SimError::stimulus(line_no, format!("no gate with id {}", stimulus.id))
            })?;
            self.simulator.set_input(gate, stimulus.value)?;
        }
        self.read_outputs()
    }

    /// The settled `Output` probes as an `ID=VALUE` line, in netlist
    /// order.
    pub fn read_outputs(&self) -> Result<String> {
        let mut line = String::new();
        for &(id, gate) in &self.outputs {
            if !line.is_empty() {
                line.push(' ');
            }
            let value = self.simulator.observe(gate)?;
            line.push_str(&format!("{id}={value}"));
        }
        Ok(line)
    }

    /// Process stimulus lines from `reader`, writing one output line
    /// per stimulus line to `writer`. Blank lines and `#` comments are
    /// skipped. Stops at EOF or on the first error.
    pub fn run(&mut self, reader: impl BufRead, mut writer: impl Write) -> Result<()> {
        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line = line.map_err(|e| SimError::stimulus(line_no, e.to_string()))?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let outputs = self.apply_line(line, line_no)?;
            writeln!(writer, "{outputs}").map_err(|e| SimError::OutputWriteError {
                message: e.to_string(),
            })?;
        }
        writer.flush().map_err(|e| SimError::OutputWriteError {
            message: e.to_string(),
        })
    }

    /// The underlying simulator.
    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }
}

/// Process stimulus lines from stdin to stdout using the given bench.
pub fn process_stream(bench: &mut Bench) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    bench.run(stdin.lock(), stdout.lock())
}
