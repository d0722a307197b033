// Licensed under the Apache License, Version 2.0. You may obtain a copy of
// this license in the LICENSE.txt file in the root directory of this source
// tree or at http://www.apache.org/licenses/LICENSE-2.0.
//
// Any modifications or derivative works of this code must retain this
// notice, and modified files need to carry a notice indicating that they
// have been altered from the originals.

//! Closure Counter: transitive descendant counts over the 2q-DAG.

use hashbrown::HashMap;

use crate::bitset::Bitset;
use crate::dag::{Dag, GateId};

/// `closure[n]` = number of two-qubit descendants of `n` in the 2q-DAG.
///
/// Computed once per DAG by reverse-topological bitset propagation: the full
/// descendant bitset is only kept around long enough for a node's direct
/// predecessors to fold it into their own, then freed, so `|N2|` in the tens
/// of thousands doesn't force an `O(|N2|^2)` bitset to live all at once.
#[derive(Debug, Clone)]
pub struct ClosureCounts {
    closure: HashMap<GateId, usize>,
}

impl ClosureCounts {
    pub fn compute(dag: &Dag) -> Self {
        let ids = dag.two_qubit_ids();
        let n = ids.len();
        let mut compact: HashMap<GateId, usize> = HashMap::with_capacity(n);
        for (i, &id) in ids.iter().enumerate() {
            compact.insert(id, i);
        }

        // How many predecessors of each node still need to read its
        // descendant bitset before it can be freed.
        let mut remaining_consumers: Vec<usize> = ids
            .iter()
            .map(|&id| dag.predecessors_2q(id).len())
            .collect();
        let mut desc: Vec<Option<Bitset>> = (0..n).map(|_| None).collect();
        let mut closure: HashMap<GateId, usize> = HashMap::with_capacity(n);

        // Schedule order is a topological order of the full DAG, and the 2q
        // node subset inherits it; reversing it gives reverse-topological
        // order without a second traversal.
        for (rev_pos, &id) in ids.iter().enumerate().rev() {
            let mut acc = Bitset::new(n.max(1));
            for &succ_id in dag.successors_2q(id) {
                let succ_idx = compact[&succ_id];
                acc.set(succ_idx);
                if let Some(succ_desc) = &desc[succ_idx] {
                    acc.union_with(succ_desc);
                }
                remaining_consumers[succ_idx] -= 1;
                if remaining_consumers[succ_idx] == 0 {
                    desc[succ_idx] = None;
                }
            }
            closure.insert(id, acc.count_ones());
            desc[rev_pos] = Some(acc);
        }

        ClosureCounts { closure }
    }

    pub fn get(&self, gate: GateId) -> usize {
        self.closure.get(&gate).copied().unwrap_or(0)
    }
}
