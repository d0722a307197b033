// Licensed under the Apache License, Version 2.0. You may obtain a copy of
// this license in the LICENSE.txt file in the root directory of this source
// tree or at http://www.apache.org/licenses/LICENSE-2.0.
//
// Any modifications or derivative works of this code must retain this
// notice, and modified files need to carry a notice indicating that they
// have been altered from the originals.

//! Error types for the routing engine.

use thiserror::Error;

/// Unified error type for the routing engine.
///
/// Every error is returned by value; nothing inside the engine retries or
/// swallows a failure. A routing invocation is all-or-nothing: callers
/// either get a complete [`crate::op::RoutingResult`] or one of these
/// variants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// A gate's `reads`/`writes` arity was not 1 or 2, or `writes` was
    /// omitted where the caller must supply it explicitly.
    #[error("invalid schedule at gate {gate}: {reason}")]
    InvalidSchedule { gate: usize, reason: String },

    /// A qubit index referenced by a gate or coupling edge is `>= num_qubits`.
    #[error("qubit {qubit} out of range (num_qubits = {num_qubits})")]
    QubitOutOfRange { qubit: u32, num_qubits: u32 },

    /// A two-qubit gate's operands have no path between them on the coupling
    /// graph (the coupling graph is disconnected).
    #[error("gate {gate} is unroutable: no path between physical qubits {a} and {b}")]
    UnroutableGate { gate: usize, a: u32, b: u32 },

    /// `RoutingConfig::heuristic` named something other than `decay`,
    /// `max_focus`, `more_executed`, or `closure`.
    #[error("unknown heuristic: {0}")]
    UnknownHeuristic(String),

    /// `RoutingConfig::initial_mapping` named something other than `trivial`,
    /// `random`, or `external`.
    #[error("unknown initial-mapping method: {0}")]
    UnknownMappingMethod(String),

    /// `num_iter < 1`.
    #[error("num_iter must be >= 1, got {0}")]
    InvalidIterationCount(i64),

    /// The coupling graph has a self-loop.
    #[error("coupling graph has a self-loop at qubit {0}")]
    SelfLoop(u32),

    /// The coupling graph is not connected; a distance matrix cannot be
    /// built for it.
    #[error("coupling graph is disconnected: qubit {a} cannot reach qubit {b}")]
    DisconnectedCoupling { a: u32, b: u32 },

    /// `initial_mapping = external` was requested but no (or an incomplete)
    /// `InitialMapping` was supplied.
    #[error("external initial mapping is missing an assignment for logical qubit {0}")]
    IncompleteInitialMapping(u32),

    /// Debug-only internal invariant violation: `P2L[L2P[l]] != l`. Should
    /// never occur; surfaced as an error rather than a panic so a caller
    /// fuzzing the engine gets a clean failure instead of an abort.
    #[error("internal invariant violated: mapping is not a bijection at logical qubit {0}")]
    MappingInvariant(u32),
}

/// Result type alias for routing-engine operations.
pub type RouteResult<T> = std::result::Result<T, RouteError>;
