// Licensed under the Apache License, Version 2.0. You may obtain a copy of
// this license in the LICENSE.txt file in the root directory of this source
// tree or at http://www.apache.org/licenses/LICENSE-2.0.
//
// Any modifications or derivative works of this code must retain this
// notice, and modified files need to carry a notice indicating that they
// have been altered from the originals.

//! Scheduler: front-layer maintenance and greedy execution of ready
//! gates over the full DAG.

use std::collections::BTreeSet;

use qroute_circuit::{CircuitSchedule, CouplingGraph, Mapping, Op};

use crate::dag::{Dag, GateId};

/// Mutable scheduling state for one routing pass. `front_layer` is a
/// `BTreeSet` rather than an insertion-order set: sorted-by-gate-id
/// iteration is the deterministic order this engine commits to.
pub struct Scheduler<'a> {
    schedule: &'a CircuitSchedule,
    dag: &'a Dag,
    front_layer: BTreeSet<GateId>,
    remaining_preds: Vec<usize>,
    pub decay: Vec<f64>,
    pub depth: Vec<u32>,
}

impl<'a> Scheduler<'a> {
    pub fn new(schedule: &'a CircuitSchedule, dag: &'a Dag) -> Self {
        let num_gates = dag.num_gates();
        let num_qubits = schedule.num_qubits as usize;
        let mut front_layer = BTreeSet::new();
        let mut remaining_preds = vec![0usize; num_gates];
        for g in 0..num_gates {
            let count = dag.predecessors_full(g).len();
            remaining_preds[g] = count;
            if count == 0 {
                front_layer.insert(g);
            }
        }
        Scheduler {
            schedule,
            dag,
            front_layer,
            remaining_preds,
            decay: vec![1.0; num_qubits],
            depth: vec![0; num_qubits],
        }
    }

    pub fn front_layer(&self) -> &BTreeSet<GateId> {
        &self.front_layer
    }

    pub fn is_done(&self) -> bool {
        self.front_layer.is_empty()
    }

    /// Executes every currently routable gate in the front layer, advances
    /// the front layer past them, and resets decay if anything executed.
    /// Returns `true` iff at least one gate executed.
    pub fn drain_ready(
        &mut self,
        mapping: &Mapping,
        coupling: &CouplingGraph,
        emitted_ops: &mut Vec<Op>,
    ) -> bool {
        let candidates: Vec<GateId> = self.front_layer.iter().copied().collect();
        let mut executed = Vec::new();

        for g in candidates {
            let gate = &self.schedule.gates[g];
            if gate.reads.len() == 1 {
                let p = mapping.phys_of(gate.reads[0]);
                self.depth[p as usize] += 1;
                emitted_ops.push(Op::Gate1(p));
                executed.push(g);
            } else {
                let pa = mapping.phys_of(gate.reads[0]);
                let pb = mapping.phys_of(gate.reads[1]);
                if coupling.is_edge(pa, pb) {
                    let new_depth = self.depth[pa as usize].max(self.depth[pb as usize]) + 1;
                    self.depth[pa as usize] = new_depth;
                    self.depth[pb as usize] = new_depth;
                    emitted_ops.push(Op::Gate2(pa, pb));
                    executed.push(g);
                }
            }
        }

        if executed.is_empty() {
            return false;
        }

        for &g in &executed {
            self.front_layer.remove(&g);
            for &succ in self.dag.successors_full(g) {
                self.remaining_preds[succ] -= 1;
                if self.remaining_preds[succ] == 0 {
                    self.front_layer.insert(succ);
                }
            }
        }
        self.decay.fill(1.0);
        true
    }

    /// Applies a chosen swap: updates the mapping, depth, and decay, and
    /// counts it. Does not touch the front layer —
    /// a swap never directly executes a gate, it only changes which gates
    /// become executable on the next `drain_ready`.
    pub fn apply_swap(&mut self, mapping: &mut Mapping, a: u32, b: u32) {
        mapping.swap(a, b);
        let new_depth = self.depth[a as usize].max(self.depth[b as usize]) + 1;
        self.depth[a as usize] = new_depth;
        self.depth[b as usize] = new_depth;
        self.decay[a as usize] += 0.001;
        self.decay[b as usize] += 0.001;
    }
}
