// Licensed under the Apache License, Version 2.0. You may obtain a copy of
// this license in the LICENSE.txt file in the root directory of this source
// tree or at http://www.apache.org/licenses/LICENSE-2.0.
//
// Any modifications or derivative works of this code must retain this
// notice, and modified files need to carry a notice indicating that they
// have been altered from the originals.

//! The logical circuit: gates in schedule order with explicit read/write sets.

use smallvec::SmallVec;

use crate::error::{RouteError, RouteResult};

/// A logical qubit index. Consecutive from 0.
pub type LogicalQubit = u32;

/// A physical qubit index. Consecutive from 0.
pub type PhysicalQubit = u32;

/// Small inline storage for a gate's qubit operands: almost always 1 or 2,
/// never more in this model — gate arity is capped at 2.
pub type QubitSet = SmallVec<[LogicalQubit; 2]>;

/// One gate in the schedule, with an explicit read set and write set.
///
/// `writes` must be supplied by the caller even when it equals `reads` for a
/// unitary gate — the write-set-defaults-to-reads shortcut some circuit
/// representations take is rejected here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gate {
    /// Identifier in schedule order. Dense, starting from 0.
    pub id: usize,
    pub reads: QubitSet,
    pub writes: QubitSet,
}

impl Gate {
    pub fn new(id: usize, reads: QubitSet, writes: QubitSet) -> Self {
        Gate { id, reads, writes }
    }

    /// A two-qubit gate requires its operands to be adjacent on the coupling
    /// graph at execution time.
    pub fn is_two_qubit(&self) -> bool {
        self.reads.len() == 2
    }
}

/// The full circuit, gates in execution (schedule) order.
#[derive(Debug, Clone)]
pub struct CircuitSchedule {
    pub num_qubits: u32,
    pub gates: Vec<Gate>,
}

impl CircuitSchedule {
    /// Validates gate arity and qubit ranges up front, so every later stage
    /// (DAG construction, scheduling) can assume well-formed input.
    pub fn new(num_qubits: u32, gates: Vec<Gate>) -> RouteResult<Self> {
        for gate in &gates {
            let arity = gate.reads.len();
            if arity == 0 || arity > 2 {
                return Err(RouteError::InvalidSchedule {
                    gate: gate.id,
                    reason: format!("reads has cardinality {arity}, expected 1 or 2"),
                });
            }
            if gate.writes.is_empty() {
                return Err(RouteError::InvalidSchedule {
                    gate: gate.id,
                    reason: "writes must be supplied explicitly, even when equal to reads"
                        .to_string(),
                });
            }
            for &q in gate.reads.iter().chain(gate.writes.iter()) {
                if q >= num_qubits {
                    return Err(RouteError::QubitOutOfRange {
                        qubit: q,
                        num_qubits,
                    });
                }
            }
        }
        Ok(CircuitSchedule { num_qubits, gates })
    }
}
