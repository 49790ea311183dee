//! Evaluation-order analysis of the circuit graph.
//!
//! Ranks every gate by topological depth so propagation rounds can
//! process gates in a stable upstream-first order, and flags graphs
//! that contain feedback cycles. Gates on a cycle get no natural depth;
//! they all rank after the acyclic part and fall back to creation-order
//! arbitration.

use std::collections::VecDeque;

use slotmap::SecondaryMap;

use super::graph::Circuit;
use super::types::GateId;

/// Depth ranks and cycle status for one snapshot of the graph.
#[derive(Debug, Default)]
pub struct Topology {
    ranks: SecondaryMap<GateId, usize>,
    cyclic: bool,
}

impl Topology {
    /// Analyze the current graph.
    ///
    /// Runs Kahn's algorithm over gates, with wires as the edges. A gate
    /// with no driven inputs has rank 0; every other acyclic gate ranks
    /// one past its deepest driver. Any gate left unvisited sits on a
    /// feedback cycle.
    pub fn analyze(circuit: &Circuit) -> Self {
        let mut indegree: SecondaryMap<GateId, usize> = SecondaryMap::new();
        let mut ranks: SecondaryMap<GateId, usize> = SecondaryMap::new();
        let mut queue: VecDeque<GateId> = VecDeque::new();

        for (id, gate) in circuit.gates() {
            let degree = gate.driven_inputs();
            indegree.insert(id, degree);
            if degree == 0 {
                ranks.insert(id, 0);
                queue.push_back(id);
            }
        }

        let mut visited = 0usize;
        while let Some(id) = queue.pop_front() {
            visited += 1;
            let next_rank = ranks[id] + 1;
            let sinks: Vec<GateId> = circuit.sinks_of(id).collect();
            for sink in sinks {
                let rank = ranks.get(sink).copied().unwrap_or(0).max(next_rank);
                ranks.insert(sink, rank);
                let degree = indegree[sink] - 1;
                indegree.insert(sink, degree);
                if degree == 0 {
                    queue.push_back(sink);
                }
            }
        }

        let cyclic = visited < circuit.gate_count();
        if cyclic {
            // Unvisited gates sit on (or behind) a cycle. Those already
            // relaxed keep their depth; anything never reached parks one
            // rank past everything ranked so far.
            let base = ranks.values().copied().max().unwrap_or(0) + 1;
            for (id, _) in circuit.gates() {
                if !ranks.contains_key(id) {
                    ranks.insert(id, base);
                }
            }
        }

        Self { ranks, cyclic }
    }

    /// Topological depth of a gate.
    pub fn rank(&self, id: GateId) -> usize {
        self.ranks.get(id).copied().unwrap_or(0)
    }

    /// Whether the graph contains at least one feedback cycle.
    pub fn is_cyclic(&self) -> bool {
        self.cyclic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::PinId;
    use crate::gates::GateKind;

    #[test]
    fn test_chain_ranks_by_depth() {
        let mut circuit = Circuit::new();
        let input = circuit.add_gate(GateKind::Input, 0).unwrap();
        let n1 = circuit.add_gate(GateKind::Not, 1).unwrap();
        let n2 = circuit.add_gate(GateKind::Not, 1).unwrap();
        circuit
            .connect(PinId::output(input), PinId::input(n1, 0))
            .unwrap();
        circuit
            .connect(PinId::output(n1), PinId::input(n2, 0))
            .unwrap();

        let topology = Topology::analyze(&circuit);
        assert!(!topology.is_cyclic());
        assert_eq!(topology.rank(input), 0);
        assert_eq!(topology.rank(n1), 1);
        assert_eq!(topology.rank(n2), 2);
    }

    #[test]
    fn test_diamond_ranks_past_deepest_driver() {
        let mut circuit = Circuit::new();
        let input = circuit.add_gate(GateKind::Input, 0).unwrap();
        let n = circuit.add_gate(GateKind::Not, 1).unwrap();
        let and = circuit.add_gate(GateKind::And, 2).unwrap();
        circuit
            .connect(PinId::output(input), PinId::input(n, 0))
            .unwrap();
        circuit
            .connect(PinId::output(input), PinId::input(and, 0))
            .unwrap();
        circuit
            .connect(PinId::output(n), PinId::input(and, 1))
            .unwrap();

        let topology = Topology::analyze(&circuit);
        // The AND ranks past the NOT, not just past the input
        assert_eq!(topology.rank(and), 2);
    }

    #[test]
    fn test_cycle_is_flagged() {
        let mut circuit = Circuit::new();
        let a = circuit.add_gate(GateKind::Not, 1).unwrap();
        let b = circuit.add_gate(GateKind::Not, 1).unwrap();
        circuit
            .connect(PinId::output(a), PinId::input(b, 0))
            .unwrap();
        circuit
            .connect(PinId::output(b), PinId::input(a, 0))
            .unwrap();

        let topology = Topology::analyze(&circuit);
        assert!(topology.is_cyclic());
        // Cycle members share a rank and are told apart by serial
        assert_eq!(topology.rank(a), topology.rank(b));
    }

    #[test]
    fn test_cycle_ranks_after_acyclic_part() {
        let mut circuit = Circuit::new();
        let input = circuit.add_gate(GateKind::Input, 0).unwrap();
        let buffer = circuit.add_gate(GateKind::Buffer, 1).unwrap();
        let a = circuit.add_gate(GateKind::Nor, 2).unwrap();
        let b = circuit.add_gate(GateKind::Nor, 2).unwrap();
        circuit
            .connect(PinId::output(input), PinId::input(buffer, 0))
            .unwrap();
        circuit
            .connect(PinId::output(buffer), PinId::input(a, 0))
            .unwrap();
        circuit
            .connect(PinId::output(a), PinId::input(b, 0))
            .unwrap();
        circuit
            .connect(PinId::output(b), PinId::input(a, 1))
            .unwrap();
        circuit
            .connect(PinId::output(buffer), PinId::input(b, 1))
            .unwrap();

        let topology = Topology::analyze(&circuit);
        assert!(topology.is_cyclic());
        assert!(topology.rank(a) > topology.rank(buffer));
        assert!(topology.rank(b) > topology.rank(buffer));
    }
}
