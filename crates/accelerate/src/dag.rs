// Licensed under the Apache License, Version 2.0. You may obtain a copy of
// this license in the LICENSE.txt file in the root directory of this source
// tree or at http://www.apache.org/licenses/LICENSE-2.0.
//
// Any modifications or derivative works of this code must retain this
// notice, and modified files need to carry a notice indicating that they
// have been altered from the originals.

//! DAG Builder: full dependency DAG and its two-qubit collapse.

use hashbrown::{HashMap, HashSet};
use std::collections::VecDeque;

use qroute_circuit::gate::LogicalQubit;
use qroute_circuit::{CircuitSchedule, RouteResult};

/// A gate id in schedule order, same space as [`qroute_circuit::gate::Gate::id`].
pub type GateId = usize;

/// The dependency graph built from a [`CircuitSchedule`]: the full RAW/WAR/
/// WAW(/RAR) DAG, and its collapse onto two-qubit nodes only.
///
/// Immutable after construction; shared by reference across the driver's
/// multiple passes.
#[derive(Debug, Clone)]
pub struct Dag {
    num_gates: usize,
    predecessors_full: Vec<Vec<GateId>>,
    successors_full: Vec<Vec<GateId>>,
    two_qubit_ids: Vec<GateId>,
    successors_2q: HashMap<GateId, Vec<GateId>>,
    predecessors_2q: HashMap<GateId, Vec<GateId>>,
}

static EMPTY: [GateId; 0] = [];

impl Dag {
    /// Builds the full dependency DAG and the collapsed two-qubit DAG for
    /// `schedule`: per-qubit `latest_writer`/`active_readers`/
    /// `read_since_writer`, RAW/RAR/WAW/WAR edges in that order per gate.
    pub fn build(
        schedule: &CircuitSchedule,
        enforce_rar: bool,
        transitive_reduction_2q: bool,
    ) -> RouteResult<Self> {
        let num_gates = schedule.gates.len();
        let num_qubits = schedule.num_qubits as usize;
        let mut predecessors_full: Vec<HashSet<GateId>> = vec![HashSet::new(); num_gates];
        let mut successors_full: Vec<HashSet<GateId>> = vec![HashSet::new(); num_gates];

        let mut latest_writer: Vec<Option<GateId>> = vec![None; num_qubits];
        let mut active_readers: Vec<HashSet<GateId>> = vec![HashSet::new(); num_qubits];
        let mut read_since_writer: Vec<bool> = vec![false; num_qubits];

        let mut add_edge = |u: GateId, v: GateId, pred: &mut [HashSet<GateId>], succ: &mut [HashSet<GateId>]| {
            if u != v {
                succ[u].insert(v);
                pred[v].insert(u);
            }
        };

        for gate in &schedule.gates {
            let node = gate.id;
            let write_qubits: &[LogicalQubit] = &gate.writes;
            let read_qubits: Vec<LogicalQubit> = gate
                .reads
                .iter()
                .copied()
                .filter(|q| !write_qubits.contains(q))
                .collect();

            for &q in &read_qubits {
                let qi = q as usize;
                if let Some(writer) = latest_writer[qi] {
                    add_edge(writer, node, &mut predecessors_full, &mut successors_full);
                }
                if enforce_rar {
                    for &reader in &active_readers[qi] {
                        add_edge(reader, node, &mut predecessors_full, &mut successors_full);
                    }
                    active_readers[qi].clear();
                }
                active_readers[qi].insert(node);
                read_since_writer[qi] = true;
            }

            for &q in write_qubits {
                let qi = q as usize;
                if let Some(writer) = latest_writer[qi] {
                    if !read_since_writer[qi] {
                        add_edge(writer, node, &mut predecessors_full, &mut successors_full);
                    }
                }
                for &reader in &active_readers[qi] {
                    add_edge(reader, node, &mut predecessors_full, &mut successors_full);
                }
                active_readers[qi].clear();
                latest_writer[qi] = Some(node);
                read_since_writer[qi] = false;
            }
        }

        let predecessors_full: Vec<Vec<GateId>> = predecessors_full
            .into_iter()
            .map(|s| sorted_vec(s))
            .collect();
        let successors_full: Vec<Vec<GateId>> =
            successors_full.into_iter().map(|s| sorted_vec(s)).collect();

        let two_qubit_ids: Vec<GateId> = schedule
            .gates
            .iter()
            .filter(|g| g.is_two_qubit())
            .map(|g| g.id)
            .collect();
        let two_qubit_set: HashSet<GateId> = two_qubit_ids.iter().copied().collect();

        let (mut successors_2q, mut predecessors_2q) =
            collapse_to_two_qubit(&two_qubit_ids, &two_qubit_set, &successors_full);

        if transitive_reduction_2q {
            transitive_reduce(&two_qubit_ids, &mut successors_2q);
            predecessors_2q = transpose(&two_qubit_ids, &successors_2q);
        }

        Ok(Dag {
            num_gates,
            predecessors_full,
            successors_full,
            two_qubit_ids,
            successors_2q,
            predecessors_2q,
        })
    }

    pub fn num_gates(&self) -> usize {
        self.num_gates
    }

    pub fn predecessors_full(&self, g: GateId) -> &[GateId] {
        &self.predecessors_full[g]
    }

    pub fn successors_full(&self, g: GateId) -> &[GateId] {
        &self.successors_full[g]
    }

    pub fn two_qubit_ids(&self) -> &[GateId] {
        &self.two_qubit_ids
    }

    pub fn successors_2q(&self, g: GateId) -> &[GateId] {
        self.successors_2q.get(&g).map(Vec::as_slice).unwrap_or(&EMPTY)
    }

    pub fn predecessors_2q(&self, g: GateId) -> &[GateId] {
        self.predecessors_2q
            .get(&g)
            .map(Vec::as_slice)
            .unwrap_or(&EMPTY)
    }

    /// A view of the same dependency information with every edge reversed,
    /// used by the driver's backward passes: even passes schedule forward,
    /// odd passes schedule over this reversed view.
    pub fn reversed(&self) -> Dag {
        Dag {
            num_gates: self.num_gates,
            predecessors_full: self.successors_full.clone(),
            successors_full: self.predecessors_full.clone(),
            two_qubit_ids: self.two_qubit_ids.clone(),
            successors_2q: self.predecessors_2q.clone(),
            predecessors_2q: self.successors_2q.clone(),
        }
    }
}

fn sorted_vec(set: HashSet<GateId>) -> Vec<GateId> {
    let mut v: Vec<GateId> = set.into_iter().collect();
    v.sort_unstable();
    v
}

/// Collapses the full DAG onto two-qubit nodes only: for each two-qubit
/// node, BFS forward through the full DAG and keep the first two-qubit
/// descendant found on each branch.
fn collapse_to_two_qubit(
    two_qubit_ids: &[GateId],
    two_qubit_set: &HashSet<GateId>,
    successors_full: &[Vec<GateId>],
) -> (HashMap<GateId, Vec<GateId>>, HashMap<GateId, Vec<GateId>>) {
    let mut successors_2q: HashMap<GateId, Vec<GateId>> = HashMap::new();
    let mut predecessors_2q: HashMap<GateId, Vec<GateId>> = HashMap::new();

    for &n in two_qubit_ids {
        let mut queue: VecDeque<GateId> = successors_full[n].iter().copied().collect();
        let mut visited: HashSet<GateId> = HashSet::new();
        let mut found: HashSet<GateId> = HashSet::new();
        while let Some(x) = queue.pop_front() {
            if !visited.insert(x) {
                continue;
            }
            if two_qubit_set.contains(&x) {
                found.insert(x);
            } else {
                queue.extend(successors_full[x].iter().copied());
            }
        }
        if !found.is_empty() {
            let succs = sorted_vec(found);
            for &s in &succs {
                predecessors_2q.entry(s).or_default().push(n);
            }
            successors_2q.insert(n, succs);
        }
    }
    for preds in predecessors_2q.values_mut() {
        preds.sort_unstable();
    }
    (successors_2q, predecessors_2q)
}

/// Transitive reduction of the 2q-DAG: process nodes in reverse topological
/// order (schedule order reversed — a valid topological order restricted to
/// a subset stays topological), dropping any edge whose target is already
/// reachable through a kept edge.
fn transitive_reduce(two_qubit_ids: &[GateId], successors_2q: &mut HashMap<GateId, Vec<GateId>>) {
    let mut reachable: HashMap<GateId, HashSet<GateId>> = HashMap::new();
    for &u in two_qubit_ids.iter().rev() {
        let succs = successors_2q.get(&u).cloned().unwrap_or_default();
        let mut kept = Vec::new();
        let mut acc: HashSet<GateId> = HashSet::new();
        let empty = HashSet::new();
        let already = reachable.get(&u).unwrap_or(&empty);
        for v in succs {
            if already.contains(&v) || acc.contains(&v) {
                continue;
            }
            kept.push(v);
            acc.insert(v);
            if let Some(dv) = reachable.get(&v) {
                acc.extend(dv.iter().copied());
            }
        }
        kept.sort_unstable();
        if kept.is_empty() {
            successors_2q.remove(&u);
        } else {
            successors_2q.insert(u, kept);
        }
        reachable.insert(u, acc);
    }
}

fn transpose(
    two_qubit_ids: &[GateId],
    successors_2q: &HashMap<GateId, Vec<GateId>>,
) -> HashMap<GateId, Vec<GateId>> {
    let mut predecessors_2q: HashMap<GateId, Vec<GateId>> = HashMap::new();
    for &u in two_qubit_ids {
        if let Some(succs) = successors_2q.get(&u) {
            for &v in succs {
                predecessors_2q.entry(v).or_default().push(u);
            }
        }
    }
    for preds in predecessors_2q.values_mut() {
        preds.sort_unstable();
    }
    predecessors_2q
}
