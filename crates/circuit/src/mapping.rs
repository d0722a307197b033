// Licensed under the Apache License, Version 2.0. You may obtain a copy of
// this license in the LICENSE.txt file in the root directory of this source
// tree or at http://www.apache.org/licenses/LICENSE-2.0.
//
// Any modifications or derivative works of this code must retain this
// notice, and modified files need to carry a notice indicating that they
// have been altered from the originals.

//! Bidirectional logical/physical mapping.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

use crate::error::{RouteError, RouteResult};
use crate::gate::{LogicalQubit, PhysicalQubit};

/// `L2P[l] = p`, `P2L[p] = l`. The invariant `P2L[L2P[l]] == l` holds for
/// every assigned logical qubit after every operation below; `swap` is the
/// only mutator and maintains it in O(1) by construction.
#[derive(Debug, Clone)]
pub struct Mapping {
    l2p: Vec<PhysicalQubit>,
    p2l: Vec<LogicalQubit>,
}

impl Mapping {
    /// Identity mapping: logical qubit `l` sits at physical qubit `l`.
    pub fn init_trivial(num_qubits: u32) -> Self {
        let ids: Vec<u32> = (0..num_qubits).collect();
        Mapping {
            l2p: ids.clone(),
            p2l: ids,
        }
    }

    /// A uniformly random permutation, seeded for determinism.
    pub fn init_random(num_qubits: u32, seed: u64) -> Self {
        let mut rng = Pcg64Mcg::seed_from_u64(seed);
        let mut l2p: Vec<PhysicalQubit> = (0..num_qubits).collect();
        l2p.shuffle(&mut rng);
        let mut p2l = vec![0; num_qubits as usize];
        for (l, &p) in l2p.iter().enumerate() {
            p2l[p as usize] = l as u32;
        }
        Mapping { l2p, p2l }
    }

    /// An externally supplied mapping, e.g. from a layout tool outside this
    /// engine's scope. Every logical qubit in `0..num_qubits` must appear
    /// exactly once.
    pub fn init_from(num_qubits: u32, pairs: &[(LogicalQubit, PhysicalQubit)]) -> RouteResult<Self> {
        let mut l2p = vec![u32::MAX; num_qubits as usize];
        let mut p2l = vec![u32::MAX; num_qubits as usize];
        for &(l, p) in pairs {
            l2p[l as usize] = p;
            p2l[p as usize] = l;
        }
        for l in 0..num_qubits {
            if l2p[l as usize] == u32::MAX {
                return Err(RouteError::IncompleteInitialMapping(l));
            }
        }
        Ok(Mapping { l2p, p2l })
    }

    pub fn phys_of(&self, l: LogicalQubit) -> PhysicalQubit {
        self.l2p[l as usize]
    }

    pub fn log_of(&self, p: PhysicalQubit) -> Option<LogicalQubit> {
        let l = self.p2l[p as usize];
        if l == u32::MAX {
            None
        } else {
            Some(l)
        }
    }

    /// Exchanges the logical qubits currently sitting at physical qubits `a`
    /// and `b`. O(1): updates the two `P2L` slots and the (at most two)
    /// corresponding `L2P` slots.
    pub fn swap(&mut self, a: PhysicalQubit, b: PhysicalQubit) {
        self.p2l.swap(a as usize, b as usize);
        if self.p2l[a as usize] != u32::MAX {
            self.l2p[self.p2l[a as usize] as usize] = a;
        }
        if self.p2l[b as usize] != u32::MAX {
            self.l2p[self.p2l[b as usize] as usize] = b;
        }
    }

    /// Debug-only check of the `P2L[L2P[l]] == l` invariant. A no-op in
    /// release builds.
    #[cfg(debug_assertions)]
    pub fn assert_invariant(&self) -> RouteResult<()> {
        for l in 0..self.l2p.len() as u32 {
            let p = self.l2p[l as usize];
            if self.p2l[p as usize] != l {
                return Err(RouteError::MappingInvariant(l));
            }
        }
        Ok(())
    }

    #[cfg(not(debug_assertions))]
    pub fn assert_invariant(&self) -> RouteResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trivial_is_identity() {
        let m = Mapping::init_trivial(4);
        for q in 0..4 {
            assert_eq!(m.phys_of(q), q);
            assert_eq!(m.log_of(q), Some(q));
        }
    }

    #[test]
    fn swap_exchanges_and_preserves_invariant() {
        let mut m = Mapping::init_trivial(4);
        m.swap(1, 2);
        assert_eq!(m.phys_of(1), 2);
        assert_eq!(m.phys_of(2), 1);
        assert_eq!(m.log_of(1), Some(2));
        assert_eq!(m.log_of(2), Some(1));
        m.assert_invariant().unwrap();
    }

    #[test]
    fn random_mapping_is_deterministic_for_seed() {
        let a = Mapping::init_random(8, 42);
        let b = Mapping::init_random(8, 42);
        assert_eq!(a.l2p, b.l2p);
    }

    #[test]
    fn init_from_rejects_missing_assignment() {
        let err = Mapping::init_from(3, &[(0, 0), (1, 1)]).unwrap_err();
        assert!(matches!(err, RouteError::IncompleteInitialMapping(2)));
    }

    #[test]
    fn init_from_builds_inverse() {
        let m = Mapping::init_from(3, &[(0, 2), (1, 0), (2, 1)]).unwrap();
        assert_eq!(m.phys_of(0), 2);
        assert_eq!(m.log_of(2), Some(0));
        m.assert_invariant().unwrap();
    }
}
