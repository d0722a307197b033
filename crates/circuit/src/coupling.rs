// Licensed under the Apache License, Version 2.0. You may obtain a copy of
// this license in the LICENSE.txt file in the root directory of this source
// tree or at http://www.apache.org/licenses/LICENSE-2.0.
//
// Any modifications or derivative works of this code must retain this
// notice, and modified files need to carry a notice indicating that they
// have been altered from the originals.

//! The hardware coupling graph: adjacency, edge tests, and all-pairs BFS
//! distance.

use rustworkx_core::petgraph::prelude::*;
use rustworkx_core::petgraph::visit::EdgeRef;
use std::collections::VecDeque;

use crate::error::{RouteError, RouteResult};
use crate::gate::PhysicalQubit;

/// Undirected adjacency over `{0..num_qubits-1}`, plus a `petgraph` view built
/// once from the same neighbor table and reused for every edge test in the
/// swap-scoring hot loop.
#[derive(Debug, Clone)]
pub struct CouplingGraph {
    num_qubits: u32,
    neighbors: Vec<Vec<PhysicalQubit>>,
    graph: UnGraph<(), ()>,
}

impl CouplingGraph {
    /// Builds the graph from an undirected edge list. Edges are symmetrized
    /// and de-duplicated; self-loops and out-of-range qubits are rejected.
    pub fn new(num_qubits: u32, edges: &[(PhysicalQubit, PhysicalQubit)]) -> RouteResult<Self> {
        let mut neighbors: Vec<Vec<PhysicalQubit>> = vec![Vec::new(); num_qubits as usize];
        let mut graph = UnGraph::<(), ()>::with_capacity(num_qubits as usize, edges.len());
        for i in 0..num_qubits {
            graph.add_node(());
            let _ = i;
        }
        for &(a, b) in edges {
            if a >= num_qubits {
                return Err(RouteError::QubitOutOfRange {
                    qubit: a,
                    num_qubits,
                });
            }
            if b >= num_qubits {
                return Err(RouteError::QubitOutOfRange {
                    qubit: b,
                    num_qubits,
                });
            }
            if a == b {
                return Err(RouteError::SelfLoop(a));
            }
            if !neighbors[a as usize].contains(&b) {
                neighbors[a as usize].push(b);
                neighbors[b as usize].push(a);
                graph.add_edge(NodeIndex::new(a as usize), NodeIndex::new(b as usize), ());
            }
        }
        for row in &mut neighbors {
            row.sort_unstable();
        }
        Ok(CouplingGraph {
            num_qubits,
            neighbors,
            graph,
        })
    }

    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    pub fn neighbors(&self, p: PhysicalQubit) -> &[PhysicalQubit] {
        &self.neighbors[p as usize]
    }

    pub fn is_edge(&self, a: PhysicalQubit, b: PhysicalQubit) -> bool {
        self.neighbors[a as usize].binary_search(&b).is_ok()
    }

    /// Petgraph view, used by [`crate::coupling::CouplingGraph::distance_matrix`]
    /// and available to callers that need `EdgeRef`-based iteration.
    pub fn petgraph(&self) -> &UnGraph<(), ()> {
        &self.graph
    }

    /// All-pairs BFS hop count. Fails with
    /// [`RouteError::DisconnectedCoupling`] if the graph is not connected —
    /// routing across disconnected components is impossible.
    pub fn distance_matrix(&self) -> RouteResult<DistanceMatrix> {
        let n = self.num_qubits as usize;
        let mut dist = vec![vec![u32::MAX; n]; n];
        for start in 0..n {
            dist[start][start] = 0;
            let mut queue = VecDeque::new();
            queue.push_back(start as u32);
            while let Some(current) = queue.pop_front() {
                let current_dist = dist[start][current as usize];
                for &neighbor in self.neighbors(current) {
                    if dist[start][neighbor as usize] == u32::MAX {
                        dist[start][neighbor as usize] = current_dist + 1;
                        queue.push_back(neighbor);
                    }
                }
            }
            for target in 0..n {
                if dist[start][target] == u32::MAX {
                    return Err(RouteError::DisconnectedCoupling {
                        a: start as u32,
                        b: target as u32,
                    });
                }
            }
        }
        Ok(DistanceMatrix { dist })
    }

    /// BFS shortest path between two physical qubits, as a sequence of
    /// physical qubits from `from` to `to` inclusive. Shares the underlying
    /// `petgraph` graph with [`CouplingGraph::distance_matrix`] rather than
    /// rebuilding it.
    pub fn shortest_path(&self, from: PhysicalQubit, to: PhysicalQubit) -> Vec<PhysicalQubit> {
        let mut predecessor = vec![None; self.num_qubits as usize];
        let mut queue = VecDeque::new();
        queue.push_back(from);
        predecessor[from as usize] = Some(from);
        'bfs: while let Some(current) = queue.pop_front() {
            if current == to {
                break 'bfs;
            }
            for edge in self.graph.edges(NodeIndex::new(current as usize)) {
                let neighbor = edge.target().index() as u32;
                if predecessor[neighbor as usize].is_none() {
                    predecessor[neighbor as usize] = Some(current);
                    queue.push_back(neighbor);
                }
            }
        }
        let mut path = vec![to];
        let mut cursor = to;
        while cursor != from {
            cursor = predecessor[cursor as usize].expect("coupling graph is connected");
            path.push(cursor);
        }
        path.reverse();
        path
    }
}

/// `dist[p][q]` = BFS hop count between physical qubits `p` and `q`.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    dist: Vec<Vec<u32>>,
}

impl DistanceMatrix {
    pub fn get(&self, p: PhysicalQubit, q: PhysicalQubit) -> u32 {
        self.dist[p as usize][q as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(n: u32) -> CouplingGraph {
        let edges: Vec<_> = (0..n - 1).map(|i| (i, i + 1)).collect();
        CouplingGraph::new(n, &edges).unwrap()
    }

    #[test]
    fn rejects_self_loop() {
        let err = CouplingGraph::new(2, &[(0, 0)]).unwrap_err();
        assert!(matches!(err, RouteError::SelfLoop(0)));
    }

    #[test]
    fn rejects_out_of_range_edge() {
        let err = CouplingGraph::new(2, &[(0, 5)]).unwrap_err();
        assert!(matches!(err, RouteError::QubitOutOfRange { qubit: 5, .. }));
    }

    #[test]
    fn linear_chain_distances() {
        let graph = chain(4);
        let dist = graph.distance_matrix().unwrap();
        assert_eq!(dist.get(0, 3), 3);
        assert_eq!(dist.get(1, 2), 1);
        assert_eq!(dist.get(2, 2), 0);
    }

    #[test]
    fn disconnected_graph_fails() {
        let graph = CouplingGraph::new(4, &[(0, 1), (2, 3)]).unwrap();
        assert!(graph.distance_matrix().is_err());
    }

    #[test]
    fn shortest_path_matches_distance() {
        let graph = chain(5);
        let dist = graph.distance_matrix().unwrap();
        let path = graph.shortest_path(0, 4);
        assert_eq!(path.first(), Some(&0));
        assert_eq!(path.last(), Some(&4));
        assert_eq!(path.len() as u32 - 1, dist.get(0, 4));
    }
}
