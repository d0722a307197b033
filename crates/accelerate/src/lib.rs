// Licensed under the Apache License, Version 2.0. You may obtain a copy of
// this license in the LICENSE.txt file in the root directory of this source
// tree or at http://www.apache.org/licenses/LICENSE-2.0.
//
// Any modifications or derivative works of this code must retain this
// notice, and modified files need to carry a notice indicating that they
// have been altered from the originals.

//! Routing algorithm built on top of `qroute_circuit`'s data model: DAG
//! construction, closure counting, front/extended-layer scheduling,
//! swap-candidate scoring, and the driver that ties them together into
//! full routing passes.

pub mod bitset;
pub mod closure;
pub mod dag;
pub mod driver;
pub mod extended_layer;
pub mod heuristic;
pub mod scheduler;

pub use closure::ClosureCounts;
pub use dag::{Dag, GateId};
pub use driver::{InitialMappingMethod, RouterDriver, RoutingConfig};
pub use extended_layer::ExtendedLayer;
pub use heuristic::Heuristic;
pub use scheduler::Scheduler;

use qroute_circuit::{CircuitSchedule, CouplingGraph, RouteResult, RoutingResult};

/// Routes `schedule` over `coupling` under `config`. The single entry point
/// a caller needs; everything else in this crate is the machinery behind it.
pub fn route(
    schedule: &CircuitSchedule,
    coupling: &CouplingGraph,
    config: &RoutingConfig,
) -> RouteResult<RoutingResult> {
    RouterDriver::route(schedule, coupling, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qroute_circuit::gate::Gate;
    use smallvec::smallvec;

    #[test]
    fn route_entry_point_matches_driver() {
        let coupling = CouplingGraph::new(3, &[(0, 1), (1, 2)]).unwrap();
        let gates = vec![Gate::new(0, smallvec![0, 2], smallvec![0, 2])];
        let schedule = CircuitSchedule::new(3, gates).unwrap();
        let config = RoutingConfig::new("closure", "trivial", None, 2, true, true, 3).unwrap();
        let result = route(&schedule, &coupling, &config).unwrap();
        assert_eq!(result.count_emitted_swaps(), result.swaps_inserted);
    }
}
