// Licensed under the Apache License, Version 2.0. You may obtain a copy of
// this license in the LICENSE.txt file in the root directory of this source
// tree or at http://www.apache.org/licenses/LICENSE-2.0.
//
// Any modifications or derivative works of this code must retain this
// notice, and modified files need to carry a notice indicating that they
// have been altered from the originals.

//! The emitted output stream and the final routing result.

use crate::gate::PhysicalQubit;

/// One emitted operation, already expressed in physical-qubit terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// A single-qubit gate, executed at the given physical qubit.
    Gate1(PhysicalQubit),
    /// A two-qubit gate between two adjacent physical qubits.
    Gate2(PhysicalQubit, PhysicalQubit),
    /// A synthetic SWAP inserted by the router.
    Swap(PhysicalQubit, PhysicalQubit),
}

/// The complete output of one routing invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingResult {
    pub swaps_inserted: usize,
    pub depth: u32,
    pub emitted_ops: Vec<Op>,
}

impl RoutingResult {
    /// Number of `Op::Swap` entries in `emitted_ops`, used in tests to check
    /// that `swaps_inserted` matches the emitted stream.
    pub fn count_emitted_swaps(&self) -> usize {
        self.emitted_ops
            .iter()
            .filter(|op| matches!(op, Op::Swap(_, _)))
            .count()
    }
}
