//! Worklist propagation to quiescence.

use std::collections::HashSet;

use tracing::{debug, trace, warn};

use crate::circuit::{Circuit, GateId, Topology};
use crate::error::Result;
use crate::signal::Signal;

use super::DEFAULT_MAX_ROUNDS;

/// How a settle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    /// Every gate output is consistent with its inputs.
    Quiescent,
    /// The round bound was hit with work still pending.
    Oscillating,
}

/// Summary of one propagation run.
#[derive(Debug, Clone)]
pub struct SettleReport {
    /// How the run ended.
    pub outcome: SettleOutcome,
    /// Number of rounds executed.
    pub rounds: usize,
    /// Gates whose output changed, in first-change order.
    pub changed: Vec<GateId>,
}

/// The propagation engine.
///
/// Owns the pending-gate set between runs: when a settle aborts at the
/// round bound, the unfinished work stays queued, so the next stimulus
/// resumes (and re-reports) the oscillation instead of hiding it.
#[derive(Debug)]
pub struct Scheduler {
    pending: HashSet<GateId>,
    max_rounds: usize,
}

impl Scheduler {
    /// Create a scheduler with the default round bound.
    pub fn new() -> Self {
        Self::with_config(DEFAULT_MAX_ROUNDS)
    }

    /// Create a scheduler with a custom round bound.
    pub fn with_config(max_rounds: usize) -> Self {
        Self {
            pending: HashSet::new(),
            max_rounds,
        }
    }

    /// The configured round bound.
    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    /// Whether unfinished propagation work is queued.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Run pending work to quiescence or to the round bound.
    ///
    /// Drains the circuit's dirty queue into the pending set first, so
    /// edits made since the last run are picked up.
    ///
    /// # Returns
    /// A [`SettleReport`]; an `Oscillating` outcome means the bound was
    /// hit and the pending set was left armed.
    pub fn settle(&mut self, circuit: &mut Circuit) -> Result<SettleReport> {
        self.pending.extend(circuit.take_dirty());

        if self.pending.is_empty() {
            return Ok(SettleReport {
                outcome: SettleOutcome::Quiescent,
                rounds: 0,
                changed: Vec::new(),
            });
        }

        // Ranks are recomputed per run; edits since the last settle may
        // have reshaped the graph.
        let topology = Topology::analyze(circuit);

        let mut changed: Vec<GateId> = Vec::new();
        let mut changed_seen: HashSet<GateId> = HashSet::new();

        for round in 0..self.max_rounds {
            if self.pending.is_empty() {
                debug!(rounds = round, changed = changed.len(), "propagation quiescent");
                return Ok(SettleReport {
                    outcome: SettleOutcome::Quiescent,
                    rounds: round,
                    changed,
                });
            }

            // Evaluate the whole round against round-start values.
            let mut batch: Vec<GateId> = self.pending.drain().collect();
            batch.sort_by_key(|&id| {
                let serial = circuit.gate(id).map(|g| g.serial()).unwrap_or(u64::MAX);
                (topology.rank(id), serial)
            });

            let mut updates: Vec<(GateId, Signal)> = Vec::new();
            for id in batch {
                let Some(gate) = circuit.gate(id) else {
                    continue;
                };
                if gate.kind.is_source() {
                    continue;
                }
                let value = gate.kind.evaluate(gate.inputs())?;
                if value != gate.output() {
                    updates.push((id, value));
                }
            }

            // Commit all changes at once, then queue the gates they feed.
            let mut touched: Vec<GateId> = Vec::new();
            for &(id, value) in &updates {
                circuit.apply_output(id, value, &mut touched);
                if changed_seen.insert(id) {
                    changed.push(id);
                }
                trace!(gate = %id, value = %value, round, "output changed");
            }
            self.pending.extend(touched);
        }

        if self.pending.is_empty() {
            // The final round consumed the last of the work.
            return Ok(SettleReport {
                outcome: SettleOutcome::Quiescent,
                rounds: self.max_rounds,
                changed,
            });
        }

        warn!(
            rounds = self.max_rounds,
            pending = self.pending.len(),
            "propagation hit the round bound"
        );
        Ok(SettleReport {
            outcome: SettleOutcome::Oscillating,
            rounds: self.max_rounds,
            changed,
        })
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::PinId;
    use crate::gates::GateKind;

    fn two_not_loop() -> Circuit {
        let mut circuit = Circuit::new();
        let a = circuit.add_gate(GateKind::Not, 1).unwrap();
        let b = circuit.add_gate(GateKind::Not, 1).unwrap();
        circuit
            .connect(PinId::output(a), PinId::input(b, 0))
            .unwrap();
        circuit
            .connect(PinId::output(b), PinId::input(a, 0))
            .unwrap();
        circuit
    }

    #[test]
    fn test_settle_with_no_work() {
        let mut circuit = Circuit::new();
        let mut scheduler = Scheduler::new();
        let report = scheduler.settle(&mut circuit).unwrap();
        assert_eq!(report.outcome, SettleOutcome::Quiescent);
        assert_eq!(report.rounds, 0);
        assert!(report.changed.is_empty());
    }

    #[test]
    fn test_default_scheduler_carries_the_standard_bound() {
        let mut scheduler = Scheduler::default();
        assert_eq!(scheduler.max_rounds(), DEFAULT_MAX_ROUNDS);

        // An acyclic circuit must come to rest under a default scheduler
        let mut circuit = Circuit::new();
        let input = circuit.add_gate(GateKind::Input, 0).unwrap();
        let n = circuit.add_gate(GateKind::Not, 1).unwrap();
        circuit
            .connect(PinId::output(input), PinId::input(n, 0))
            .unwrap();

        let report = scheduler.settle(&mut circuit).unwrap();
        assert_eq!(report.outcome, SettleOutcome::Quiescent);
    }

    #[test]
    fn test_single_gate_settles() {
        let mut circuit = Circuit::new();
        let zero = circuit.add_gate(GateKind::Const(Signal::Low), 0).unwrap();
        let n = circuit.add_gate(GateKind::Not, 1).unwrap();
        circuit
            .connect(PinId::output(zero), PinId::input(n, 0))
            .unwrap();

        let mut scheduler = Scheduler::new();
        let report = scheduler.settle(&mut circuit).unwrap();
        assert_eq!(report.outcome, SettleOutcome::Quiescent);
        assert_eq!(circuit.observe(n).unwrap(), Signal::High);
        assert!(report.changed.contains(&n));
    }

    #[test]
    fn test_chain_settles_within_depth_rounds() {
        let mut circuit = Circuit::new();
        let input = circuit.add_gate(GateKind::Input, 0).unwrap();
        let mut prev = input;
        let mut last = input;
        for _ in 0..8 {
            let gate = circuit.add_gate(GateKind::And, 2).unwrap();
            circuit
                .connect(PinId::output(prev), PinId::input(gate, 0))
                .unwrap();
            circuit
                .connect(PinId::output(prev), PinId::input(gate, 1))
                .unwrap();
            prev = gate;
            last = gate;
        }

        let mut scheduler = Scheduler::new();
        scheduler.settle(&mut circuit).unwrap();

        circuit.drive_output(input, Signal::High);
        let report = scheduler.settle(&mut circuit).unwrap();
        assert_eq!(report.outcome, SettleOutcome::Quiescent);
        // One round per stage of the chain
        assert!(report.rounds <= 8);
        assert_eq!(circuit.observe(last).unwrap(), Signal::High);
    }

    #[test]
    fn test_two_not_loop_oscillates() {
        let mut circuit = two_not_loop();
        let mut scheduler = Scheduler::with_config(64);
        let report = scheduler.settle(&mut circuit).unwrap();
        assert_eq!(report.outcome, SettleOutcome::Oscillating);
        assert_eq!(report.rounds, 64);
        assert!(scheduler.has_pending());
    }

    #[test]
    fn test_oscillation_rearms_for_the_next_run() {
        let mut circuit = two_not_loop();
        let mut scheduler = Scheduler::with_config(16);
        let first = scheduler.settle(&mut circuit).unwrap();
        assert_eq!(first.outcome, SettleOutcome::Oscillating);

        // No new stimulus; the retained pending set keeps reporting
        let second = scheduler.settle(&mut circuit).unwrap();
        assert_eq!(second.outcome, SettleOutcome::Oscillating);
        assert!(scheduler.has_pending());
    }

    #[test]
    fn test_changed_lists_gates_once_in_creation_order() {
        let mut circuit = Circuit::new();
        let input = circuit.add_gate(GateKind::Input, 0).unwrap();
        let n1 = circuit.add_gate(GateKind::Not, 1).unwrap();
        let n2 = circuit.add_gate(GateKind::Not, 1).unwrap();
        let n3 = circuit.add_gate(GateKind::Not, 1).unwrap();
        for &n in &[n1, n2, n3] {
            circuit
                .connect(PinId::output(input), PinId::input(n, 0))
                .unwrap();
        }

        let mut scheduler = Scheduler::new();
        scheduler.settle(&mut circuit).unwrap();

        circuit.drive_output(input, Signal::High);
        let report = scheduler.settle(&mut circuit).unwrap();
        assert_eq!(report.changed, vec![n1, n2, n3]);

        // Identical stimulus sequences produce identical reports
        circuit.drive_output(input, Signal::Low);
        let report = scheduler.settle(&mut circuit).unwrap();
        assert_eq!(report.changed, vec![n1, n2, n3]);
    }

    #[test]
    fn test_sources_are_not_reevaluated() {
        let mut circuit = Circuit::new();
        let input = circuit.add_gate(GateKind::Input, 0).unwrap();
        circuit.drive_output(input, Signal::High);

        let mut scheduler = Scheduler::new();
        scheduler.settle(&mut circuit).unwrap();
        // An Input's imposed level survives settling
        assert_eq!(circuit.observe(input).unwrap(), Signal::High);
    }
}
