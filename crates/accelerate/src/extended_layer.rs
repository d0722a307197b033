// Licensed under the Apache License, Version 2.0. You may obtain a copy of
// this license in the LICENSE.txt file in the root directory of this source
// tree or at http://www.apache.org/licenses/LICENSE-2.0.
//
// Any modifications or derivative works of this code must retain this
// notice, and modified files need to carry a notice indicating that they
// have been altered from the originals.

//! Extended-Layer Builder: bounded BFS lookahead beyond the front layer.

use hashbrown::HashMap;
use std::collections::{BTreeSet, VecDeque};

use crate::dag::{Dag, GateId};

/// The bounded lookahead frontier beyond the front layer, plus each node's
/// BFS hop count from the front. Front-layer nodes themselves are never
/// included.
#[derive(Debug, Clone)]
pub struct ExtendedLayer {
    pub extended: Vec<GateId>,
    pub level: HashMap<GateId, u32>,
}

impl ExtendedLayer {
    /// BFS from `front_layer` along `dag`'s two-qubit successor edges,
    /// stopping once `size_bound` nodes have been collected. `dag` may be
    /// the primary 2q-DAG or a RAR-included restricted variant built
    /// specifically for lookahead.
    pub fn build(front_layer: &BTreeSet<GateId>, dag: &Dag, size_bound: usize) -> Self {
        let mut extended = Vec::new();
        let mut level: HashMap<GateId, u32> = HashMap::new();
        let mut visited: HashMap<GateId, ()> = HashMap::new();
        let mut queue: VecDeque<(GateId, u32)> = VecDeque::new();

        for &g in front_layer {
            visited.insert(g, ());
            queue.push_back((g, 0));
        }

        while let Some((node, dist)) = queue.pop_front() {
            if extended.len() >= size_bound {
                break;
            }
            for &succ in dag.successors_2q(node) {
                if visited.contains_key(&succ) {
                    continue;
                }
                visited.insert(succ, ());
                let succ_level = dist + 1;
                level.insert(succ, succ_level);
                extended.push(succ);
                if extended.len() >= size_bound {
                    break;
                }
                queue.push_back((succ, succ_level));
            }
        }

        ExtendedLayer { extended, level }
    }

    pub fn is_empty(&self) -> bool {
        self.extended.is_empty()
    }

    pub fn level_of(&self, gate: GateId) -> u32 {
        self.level.get(&gate).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qroute_circuit::gate::Gate;
    use qroute_circuit::CircuitSchedule;
    use smallvec::smallvec;

    #[test]
    fn bfs_levels_increase_with_distance() {
        let gates = vec![
            Gate::new(0, smallvec![0, 1], smallvec![0, 1]),
            Gate::new(1, smallvec![1, 2], smallvec![1, 2]),
            Gate::new(2, smallvec![2, 3], smallvec![2, 3]),
        ];
        let schedule = CircuitSchedule::new(4, gates).unwrap();
        let dag = Dag::build(&schedule, true, true).unwrap();

        let mut front = BTreeSet::new();
        front.insert(0);
        let extended = ExtendedLayer::build(&front, &dag, 10);
        assert_eq!(extended.extended, vec![1, 2]);
        assert_eq!(extended.level_of(1), 1);
        assert_eq!(extended.level_of(2), 2);
    }

    #[test]
    fn size_bound_truncates() {
        let gates = vec![
            Gate::new(0, smallvec![0, 1], smallvec![0, 1]),
            Gate::new(1, smallvec![1, 2], smallvec![1, 2]),
            Gate::new(2, smallvec![2, 3], smallvec![2, 3]),
        ];
        let schedule = CircuitSchedule::new(4, gates).unwrap();
        let dag = Dag::build(&schedule, true, true).unwrap();
        let mut front = BTreeSet::new();
        front.insert(0);
        let extended = ExtendedLayer::build(&front, &dag, 1);
        assert_eq!(extended.extended.len(), 1);
    }
}
