// Licensed under the Apache License, Version 2.0. You may obtain a copy of
// this license in the LICENSE.txt file in the root directory of this source
// tree or at http://www.apache.org/licenses/LICENSE-2.0.
//
// Any modifications or derivative works of this code must retain this
// notice, and modified files need to carry a notice indicating that they
// have been altered from the originals.

//! Router Driver: configuration, bidirectional passes, and best-of
//! selection.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

use qroute_circuit::gate::PhysicalQubit;
use qroute_circuit::{CircuitSchedule, CouplingGraph, Mapping, Op, RouteError, RouteResult, RoutingResult};

use crate::closure::ClosureCounts;
use crate::dag::Dag;
use crate::extended_layer::ExtendedLayer;
use crate::heuristic::{active_physical_qubits, choose_best_swap, Heuristic};
use crate::scheduler::Scheduler;

/// The `closure` heuristic widens its lookahead window to 5x the active
/// physical-qubit count; the other three heuristics use the count as-is.
const CLOSURE_EXTENDED_SET_MULTIPLIER: usize = 5;

/// How the starting mapping for each pass is produced.
#[derive(Debug, Clone)]
pub enum InitialMappingMethod {
    Trivial,
    Random,
    External(Vec<(u32, PhysicalQubit)>),
}

impl InitialMappingMethod {
    pub fn parse(name: &str, external_pairs: Option<Vec<(u32, PhysicalQubit)>>) -> RouteResult<Self> {
        match name {
            "trivial" => Ok(InitialMappingMethod::Trivial),
            "random" => Ok(InitialMappingMethod::Random),
            "external" => Ok(InitialMappingMethod::External(external_pairs.unwrap_or_default())),
            other => Err(RouteError::UnknownMappingMethod(other.to_string())),
        }
    }
}

/// Routing engine configuration. Validated once at construction rather than
/// deep inside the hot loop.
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    pub heuristic: Heuristic,
    pub initial_mapping: InitialMappingMethod,
    pub num_iter: i64,
    pub enforce_rar: bool,
    pub transitive_reduction: bool,
    pub rng_seed: u64,
}

impl RoutingConfig {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        heuristic: &str,
        initial_mapping: &str,
        external_pairs: Option<Vec<(u32, PhysicalQubit)>>,
        num_iter: i64,
        enforce_rar: bool,
        transitive_reduction: bool,
        rng_seed: u64,
    ) -> RouteResult<Self> {
        let config = RoutingConfig {
            heuristic: Heuristic::parse(heuristic)?,
            initial_mapping: InitialMappingMethod::parse(initial_mapping, external_pairs)?,
            num_iter,
            enforce_rar,
            transitive_reduction,
            rng_seed,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> RouteResult<()> {
        if self.num_iter < 1 {
            return Err(RouteError::InvalidIterationCount(self.num_iter));
        }
        Ok(())
    }

    fn build_initial_mapping(&self, num_qubits: u32) -> RouteResult<Mapping> {
        match &self.initial_mapping {
            InitialMappingMethod::Trivial => Ok(Mapping::init_trivial(num_qubits)),
            InitialMappingMethod::Random => Ok(Mapping::init_random(num_qubits, self.rng_seed)),
            InitialMappingMethod::External(pairs) => Mapping::init_from(num_qubits, pairs),
        }
    }
}

/// Orchestrates the full routing pipeline: builds the DAG and closure counts
/// once, runs `2*(num_iter-1)+1` passes alternating direction, and keeps the
/// best result by `(swaps_inserted, depth)`.
pub struct RouterDriver;

impl RouterDriver {
    pub fn route(
        schedule: &CircuitSchedule,
        coupling: &CouplingGraph,
        config: &RoutingConfig,
    ) -> RouteResult<RoutingResult> {
        config.validate()?;
        let dist = coupling.distance_matrix()?;

        let dag_fwd = Dag::build(schedule, config.enforce_rar, config.transitive_reduction)?;
        let dag_bwd = dag_fwd.reversed();

        // Only the `closure` heuristic's weight term wants RAR-respecting
        // lookahead when the primary DAG does not enforce RAR itself; the
        // other three heuristics look ahead over the same DAG used for
        // front-layer scheduling.
        let (lookahead_fwd, lookahead_bwd) = match config.heuristic {
            Heuristic::Closure if !config.enforce_rar => {
                let fwd = Dag::build(schedule, true, config.transitive_reduction)?;
                let bwd = fwd.reversed();
                (fwd, bwd)
            }
            _ => (dag_fwd.clone(), dag_bwd.clone()),
        };

        let closure_fwd = ClosureCounts::compute(&lookahead_fwd);
        let closure_bwd = ClosureCounts::compute(&lookahead_bwd);

        let mut rng = Pcg64Mcg::seed_from_u64(config.rng_seed);
        let total_passes = (2 * (config.num_iter - 1) + 1) as usize;

        let mut best: Option<RoutingResult> = None;
        for pass in 0..total_passes {
            let forward = pass % 2 == 0;
            let (dag, lookahead, closure) = if forward {
                (&dag_fwd, &lookahead_fwd, &closure_fwd)
            } else {
                (&dag_bwd, &lookahead_bwd, &closure_bwd)
            };

            let result = run_pass(
                schedule, dag, lookahead, coupling, &dist, config, closure, &mut rng, !forward,
            )?;
            tracing::info!(pass, forward, swaps = result.swaps_inserted, depth = result.depth, "routing pass complete");

            let better = match &best {
                None => true,
                Some(current) => {
                    (result.swaps_inserted, result.depth) < (current.swaps_inserted, current.depth)
                }
            };
            if better {
                best = Some(result);
            }
        }

        Ok(best.expect("total_passes is always >= 1"))
    }
}

#[allow(clippy::too_many_arguments)]
fn run_pass(
    schedule: &CircuitSchedule,
    dag: &Dag,
    lookahead: &Dag,
    coupling: &CouplingGraph,
    dist: &qroute_circuit::DistanceMatrix,
    config: &RoutingConfig,
    closure: &ClosureCounts,
    rng: &mut Pcg64Mcg,
    reverse_output: bool,
) -> RouteResult<RoutingResult> {
    let mut mapping = config.build_initial_mapping(schedule.num_qubits)?;
    let mut scheduler = Scheduler::new(schedule, dag);
    let mut emitted_ops: Vec<Op> = Vec::new();
    let mut swaps_inserted = 0usize;

    while !scheduler.is_done() {
        while scheduler.drain_ready(&mapping, coupling, &mut emitted_ops) {}
        if scheduler.is_done() {
            break;
        }

        let active_count = active_physical_qubits(scheduler.front_layer(), schedule, &mapping).len();
        let extended_size = if config.heuristic == Heuristic::Closure {
            active_count * CLOSURE_EXTENDED_SET_MULTIPLIER
        } else {
            active_count
        };
        let extended = ExtendedLayer::build(scheduler.front_layer(), lookahead, extended_size);
        let swap = choose_best_swap(
            config.heuristic,
            scheduler.front_layer(),
            &extended,
            schedule,
            &mapping,
            coupling,
            dist,
            &scheduler.decay,
            closure,
            rng,
        );
        scheduler.apply_swap(&mut mapping, swap.0, swap.1);
        emitted_ops.push(Op::Swap(swap.0, swap.1));
        swaps_inserted += 1;
        tracing::debug!(a = swap.0, b = swap.1, "swap inserted");
        mapping.assert_invariant()?;
    }

    if reverse_output {
        emitted_ops.reverse();
    }

    let depth = scheduler.depth.iter().copied().max().unwrap_or(0);
    Ok(RoutingResult {
        swaps_inserted,
        depth,
        emitted_ops,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use qroute_circuit::gate::Gate;
    use smallvec::smallvec;

    fn base_config(num_iter: i64) -> RoutingConfig {
        RoutingConfig::new("decay", "trivial", None, num_iter, true, true, 7).unwrap()
    }

    #[test]
    fn rejects_zero_iterations() {
        let err = RoutingConfig::new("decay", "trivial", None, 0, true, true, 1).unwrap_err();
        assert!(matches!(err, RouteError::InvalidIterationCount(0)));
    }

    #[test]
    fn rejects_unknown_heuristic_name() {
        let err = RoutingConfig::new("bogus", "trivial", None, 1, true, true, 1).unwrap_err();
        assert!(matches!(err, RouteError::UnknownHeuristic(_)));
    }

    // S1: linear chain 0-1-2-3, CX(0,3). Distance 3 under the trivial
    // mapping, so exactly 2 SWAPs are required.
    #[test]
    fn scenario_linear_chain_needs_two_swaps() {
        let coupling = CouplingGraph::new(4, &[(0, 1), (1, 2), (2, 3)]).unwrap();
        let gates = vec![Gate::new(0, smallvec![0, 3], smallvec![0, 3])];
        let schedule = CircuitSchedule::new(4, gates).unwrap();
        let config = base_config(1);
        let result = RouterDriver::route(&schedule, &coupling, &config).unwrap();
        assert_eq!(result.swaps_inserted, 2);
        assert_eq!(result.count_emitted_swaps(), 2);
    }

    // S2: K5 coupling, CX(0,1); CX(2,3); CX(1,4). Every pair is adjacent, so
    // no SWAPs are needed; depth is 2 because CX(1,4) must follow CX(0,1) on
    // the shared physical qubit 1.
    #[test]
    fn scenario_fully_connected_needs_no_swaps() {
        let edges = [(0, 1), (0, 2), (0, 3), (0, 4), (1, 2), (1, 3), (1, 4), (2, 3), (2, 4), (3, 4)];
        let coupling = CouplingGraph::new(5, &edges).unwrap();
        let gates = vec![
            Gate::new(0, smallvec![0, 1], smallvec![0, 1]),
            Gate::new(1, smallvec![2, 3], smallvec![2, 3]),
            Gate::new(2, smallvec![1, 4], smallvec![1, 4]),
        ];
        let schedule = CircuitSchedule::new(5, gates).unwrap();
        let config = base_config(1);
        let result = RouterDriver::route(&schedule, &coupling, &config).unwrap();
        assert_eq!(result.swaps_inserted, 0);
        assert_eq!(result.count_emitted_swaps(), 0);
        assert_eq!(result.depth, 2);
    }

    // S3: chain 0-1-2, CX(0,1); CX(1,2); CX(0,2). The first two gates execute
    // immediately; the third needs exactly 1 SWAP.
    #[test]
    fn scenario_chain_of_two_qubit_gates_needs_one_swap() {
        let coupling = CouplingGraph::new(3, &[(0, 1), (1, 2)]).unwrap();
        let gates = vec![
            Gate::new(0, smallvec![0, 1], smallvec![0, 1]),
            Gate::new(1, smallvec![1, 2], smallvec![1, 2]),
            Gate::new(2, smallvec![0, 2], smallvec![0, 2]),
        ];
        let schedule = CircuitSchedule::new(3, gates).unwrap();
        let config = base_config(1);
        let result = RouterDriver::route(&schedule, &coupling, &config).unwrap();
        assert_eq!(result.swaps_inserted, 1);
        assert_eq!(result.count_emitted_swaps(), 1);
    }

    // S4: coupling 0-1, CX(0,1); H(0); H(0); CX(0,1). Both qubits are always
    // adjacent, so no SWAPs are needed under either `enforce_rar` setting;
    // depth is 4 regardless of how the two H(0) gates are ordered.
    #[test]
    fn scenario_rar_flag_does_not_change_swaps_or_depth() {
        let coupling = CouplingGraph::new(2, &[(0, 1)]).unwrap();
        for enforce_rar in [true, false] {
            let gates = vec![
                Gate::new(0, smallvec![0, 1], smallvec![0, 1]),
                Gate::new(1, smallvec![0], smallvec![0]),
                Gate::new(2, smallvec![0], smallvec![0]),
                Gate::new(3, smallvec![0, 1], smallvec![0, 1]),
            ];
            let schedule = CircuitSchedule::new(2, gates).unwrap();
            let config = RoutingConfig::new("decay", "trivial", None, 1, enforce_rar, true, 7).unwrap();
            let result = RouterDriver::route(&schedule, &coupling, &config).unwrap();
            assert_eq!(result.swaps_inserted, 0);
            assert_eq!(result.depth, 4);
        }
    }

    // S5: star coupling (center 0, leaves 1-4), CX(1,2); CX(3,4). Neither
    // gate is directly executable; each needs exactly 1 SWAP (leaf<->center).
    #[test]
    fn scenario_star_topology_needs_two_swaps() {
        let coupling = CouplingGraph::new(5, &[(0, 1), (0, 2), (0, 3), (0, 4)]).unwrap();
        let gates = vec![
            Gate::new(0, smallvec![1, 2], smallvec![1, 2]),
            Gate::new(1, smallvec![3, 4], smallvec![3, 4]),
        ];
        let schedule = CircuitSchedule::new(5, gates).unwrap();
        let config = base_config(1);
        let result = RouterDriver::route(&schedule, &coupling, &config).unwrap();
        assert_eq!(result.swaps_inserted, 2);
        assert_eq!(result.count_emitted_swaps(), 2);
    }

    // S6: any of S1-S5 run twice with the same seed yields byte-identical
    // output.
    #[test]
    fn same_seed_is_deterministic() {
        let coupling = CouplingGraph::new(4, &[(0, 1), (1, 2), (2, 3)]).unwrap();
        let gates = vec![
            Gate::new(0, smallvec![0, 3], smallvec![0, 3]),
            Gate::new(1, smallvec![1, 3], smallvec![1, 3]),
        ];
        let schedule = CircuitSchedule::new(4, gates).unwrap();
        let config = base_config(3);
        let a = RouterDriver::route(&schedule, &coupling, &config).unwrap();
        let b = RouterDriver::route(&schedule, &coupling, &config).unwrap();
        assert_eq!(a, b);
    }
}
