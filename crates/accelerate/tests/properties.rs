// Licensed under the Apache License, Version 2.0. You may obtain a copy of
// this license in the LICENSE.txt file in the root directory of this source
// tree or at http://www.apache.org/licenses/LICENSE-2.0.
//
// Any modifications or derivative works of this code must retain this
// notice, and modified files need to carry a notice indicating that they
// have been altered from the originals.

//! Property-based tests for the routing engine's determinism and
//! output-completeness laws.

use proptest::prelude::*;
use smallvec::smallvec;

use qroute_accelerate::{route, RoutingConfig};
use qroute_circuit::gate::Gate;
use qroute_circuit::{CircuitSchedule, CouplingGraph};

#[derive(Debug, Clone)]
enum GateOp {
    Single(u32),
    Two(u32, u32),
}

fn arb_gate_op(num_qubits: u32) -> impl Strategy<Value = GateOp> {
    if num_qubits < 2 {
        (0..num_qubits).prop_map(GateOp::Single).boxed()
    } else {
        prop_oneof![
            (0..num_qubits).prop_map(GateOp::Single),
            (0..num_qubits, 0..num_qubits)
                .prop_filter("operands must differ", |(a, b)| a != b)
                .prop_map(|(a, b)| GateOp::Two(a, b)),
        ]
        .boxed()
    }
}

/// A linear coupling graph (`0-1-2-...-n-1`) with a schedule of 1-12 gates
/// over it, plus a seed for the engine's deterministic RNG.
fn arb_case() -> impl Strategy<Value = (CircuitSchedule, CouplingGraph, u64)> {
    (2_u32..=6).prop_flat_map(|num_qubits| {
        (
            Just(num_qubits),
            prop::collection::vec(arb_gate_op(num_qubits), 1..=12),
            0_u64..1000,
        )
            .prop_map(|(num_qubits, ops, seed)| {
                let edges: Vec<_> = (0..num_qubits - 1).map(|i| (i, i + 1)).collect();
                let coupling = CouplingGraph::new(num_qubits, &edges).unwrap();
                let gates = ops
                    .into_iter()
                    .enumerate()
                    .map(|(id, op)| match op {
                        GateOp::Single(q) => Gate::new(id, smallvec![q], smallvec![q]),
                        GateOp::Two(a, b) => Gate::new(id, smallvec![a, b], smallvec![a, b]),
                    })
                    .collect();
                let schedule = CircuitSchedule::new(num_qubits, gates).unwrap();
                (schedule, coupling, seed)
            })
    })
}

proptest! {
    /// Running the engine twice with the same config and seed produces
    /// byte-for-byte identical output.
    #[test]
    fn routing_is_deterministic((schedule, coupling, seed) in arb_case()) {
        let config = RoutingConfig::new("decay", "trivial", None, 2, true, true, seed).unwrap();
        let a = route(&schedule, &coupling, &config).unwrap();
        let b = route(&schedule, &coupling, &config).unwrap();
        prop_assert_eq!(a, b);
    }

    /// `swaps_inserted` always matches the number of `Op::Swap` entries
    /// actually emitted.
    #[test]
    fn swap_count_matches_emitted_stream((schedule, coupling, seed) in arb_case()) {
        let config = RoutingConfig::new("closure", "trivial", None, 1, true, true, seed).unwrap();
        let result = route(&schedule, &coupling, &config).unwrap();
        prop_assert_eq!(result.swaps_inserted, result.count_emitted_swaps());
    }

    /// Every gate in the schedule is eventually emitted exactly once, as
    /// either a `Gate1` or a `Gate2` (no gate is dropped or duplicated).
    #[test]
    fn every_gate_is_emitted_exactly_once((schedule, coupling, seed) in arb_case()) {
        let config = RoutingConfig::new("max_focus", "trivial", None, 1, true, true, seed).unwrap();
        let result = route(&schedule, &coupling, &config).unwrap();
        let emitted_gates = result
            .emitted_ops
            .iter()
            .filter(|op| !matches!(op, qroute_circuit::Op::Swap(_, _)))
            .count();
        prop_assert_eq!(emitted_gates, schedule.gates.len());
    }

    /// All four heuristics route every schedule to completion without error,
    /// regardless of which one is selected.
    #[test]
    fn all_heuristics_complete((schedule, coupling, seed) in arb_case()) {
        for name in ["decay", "max_focus", "more_executed", "closure"] {
            let config = RoutingConfig::new(name, "trivial", None, 1, true, true, seed).unwrap();
            let result = route(&schedule, &coupling, &config).unwrap();
            prop_assert_eq!(result.count_emitted_swaps(), result.swaps_inserted);
        }
    }
}
