// Licensed under the Apache License, Version 2.0. You may obtain a copy of
// this license in the LICENSE.txt file in the root directory of this source
// tree or at http://www.apache.org/licenses/LICENSE-2.0.
//
// Any modifications or derivative works of this code must retain this
// notice, and modified files need to carry a notice indicating that they
// have been altered from the originals.

//! Heuristic Scorer: four pluggable swap-scoring functions.

use std::collections::BTreeSet;

use approx::abs_diff_eq;
use rand::seq::SliceRandom;
use rand_pcg::Pcg64Mcg;

use qroute_circuit::gate::{LogicalQubit, PhysicalQubit};
use qroute_circuit::{CircuitSchedule, CouplingGraph, DistanceMatrix, Mapping, RouteError, RouteResult};

use crate::closure::ClosureCounts;
use crate::dag::GateId;
use crate::extended_layer::ExtendedLayer;

/// Weight of the lookahead (extended-layer) term relative to the front
/// layer.
const EXTENDED_SET_WEIGHT: f64 = 0.5;

/// Ties within this tolerance are treated as equal scores.
const TIE_EPSILON: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heuristic {
    Decay,
    MaxFocus,
    MoreExecuted,
    Closure,
}

impl Heuristic {
    pub fn parse(name: &str) -> RouteResult<Self> {
        match name {
            "decay" => Ok(Heuristic::Decay),
            "max_focus" => Ok(Heuristic::MaxFocus),
            "more_executed" => Ok(Heuristic::MoreExecuted),
            "closure" => Ok(Heuristic::Closure),
            other => Err(RouteError::UnknownHeuristic(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Score {
    primary: f64,
    secondary: f64,
}

impl Score {
    fn ties_with(&self, other: &Score) -> bool {
        abs_diff_eq!(self.primary, other.primary, epsilon = TIE_EPSILON)
            && abs_diff_eq!(self.secondary, other.secondary, epsilon = TIE_EPSILON)
    }

    fn better_than(&self, other: &Score) -> bool {
        if !abs_diff_eq!(self.primary, other.primary, epsilon = TIE_EPSILON) {
            return self.primary < other.primary;
        }
        self.secondary < other.secondary - TIE_EPSILON
    }
}

/// The physical qubit a logical qubit would occupy if `swap` (a pair of
/// physical qubits) were applied, computed without actually mutating
/// `mapping`.
fn provisional_phys(mapping: &Mapping, swap: (PhysicalQubit, PhysicalQubit), l: LogicalQubit) -> PhysicalQubit {
    let p = mapping.phys_of(l);
    if p == swap.0 {
        swap.1
    } else if p == swap.1 {
        swap.0
    } else {
        p
    }
}

fn gate_distance(
    schedule: &CircuitSchedule,
    mapping: &Mapping,
    dist: &DistanceMatrix,
    swap: (PhysicalQubit, PhysicalQubit),
    gate: GateId,
) -> f64 {
    let g = &schedule.gates[gate];
    let p0 = provisional_phys(mapping, swap, g.reads[0]);
    let p1 = provisional_phys(mapping, swap, g.reads[1]);
    dist.get(p0, p1) as f64
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Physical qubits touched by some gate in the front layer.
pub(crate) fn active_physical_qubits(
    front_layer: &BTreeSet<GateId>,
    schedule: &CircuitSchedule,
    mapping: &Mapping,
) -> BTreeSet<PhysicalQubit> {
    let mut active: BTreeSet<PhysicalQubit> = BTreeSet::new();
    for &g in front_layer {
        for &q in &schedule.gates[g].reads {
            active.insert(mapping.phys_of(q));
        }
    }
    active
}

/// Candidate swaps: every (physical qubit active in the front layer,
/// neighbor of that qubit) pair, normalized so `a < b` and de-duplicated.
fn candidate_swaps(
    front_layer: &BTreeSet<GateId>,
    schedule: &CircuitSchedule,
    mapping: &Mapping,
    coupling: &CouplingGraph,
) -> BTreeSet<(PhysicalQubit, PhysicalQubit)> {
    let active = active_physical_qubits(front_layer, schedule, mapping);
    let mut candidates = BTreeSet::new();
    for &p in &active {
        for &n in coupling.neighbors(p) {
            candidates.insert(if p < n { (p, n) } else { (n, p) });
        }
    }
    candidates
}

struct ScoreInputs<'a> {
    front_layer: &'a BTreeSet<GateId>,
    extended: &'a ExtendedLayer,
    schedule: &'a CircuitSchedule,
    mapping: &'a Mapping,
    dist: &'a DistanceMatrix,
    decay: &'a [f64],
    closure: &'a ClosureCounts,
}

fn decay_factor(decay: &[f64], swap: (PhysicalQubit, PhysicalQubit)) -> f64 {
    decay[swap.0 as usize].max(decay[swap.1 as usize])
}

fn score_decay(inputs: &ScoreInputs, swap: (PhysicalQubit, PhysicalQubit)) -> Score {
    let mean_f = mean(
        inputs
            .front_layer
            .iter()
            .map(|&g| gate_distance(inputs.schedule, inputs.mapping, inputs.dist, swap, g)),
    );
    let mean_e = if inputs.extended.is_empty() {
        0.0
    } else {
        mean(
            inputs
                .extended
                .extended
                .iter()
                .map(|&g| gate_distance(inputs.schedule, inputs.mapping, inputs.dist, swap, g)),
        )
    };
    let primary = decay_factor(inputs.decay, swap) * (mean_f + EXTENDED_SET_WEIGHT * mean_e);
    Score {
        primary,
        secondary: 0.0,
    }
}

fn score_max_focus(inputs: &ScoreInputs, swap: (PhysicalQubit, PhysicalQubit)) -> Score {
    let max_f = inputs
        .front_layer
        .iter()
        .map(|&g| gate_distance(inputs.schedule, inputs.mapping, inputs.dist, swap, g))
        .fold(0.0f64, f64::max);
    let mean_e = if inputs.extended.is_empty() {
        0.0
    } else {
        mean(
            inputs
                .extended
                .extended
                .iter()
                .map(|&g| gate_distance(inputs.schedule, inputs.mapping, inputs.dist, swap, g)),
        )
    };
    let primary = decay_factor(inputs.decay, swap) * (max_f + EXTENDED_SET_WEIGHT * mean_e);
    Score {
        primary,
        secondary: 0.0,
    }
}

fn score_more_executed(inputs: &ScoreInputs, swap: (PhysicalQubit, PhysicalQubit)) -> Score {
    let count = inputs
        .front_layer
        .iter()
        .filter(|&&g| {
            (gate_distance(inputs.schedule, inputs.mapping, inputs.dist, swap, g) - 1.0).abs()
                < f64::EPSILON
        })
        .count();
    let tie_break = score_decay(inputs, swap).primary;
    Score {
        primary: -(count as f64),
        secondary: tie_break,
    }
}

fn score_closure(inputs: &ScoreInputs, swap: (PhysicalQubit, PhysicalQubit)) -> Score {
    let mean_f = mean(
        inputs
            .front_layer
            .iter()
            .map(|&g| gate_distance(inputs.schedule, inputs.mapping, inputs.dist, swap, g)),
    );
    let weighted_e = if inputs.extended.is_empty() {
        0.0
    } else {
        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;
        for &g in &inputs.extended.extended {
            let w = (inputs.closure.get(g) as f64 + 1.0) / (inputs.extended.level_of(g) as f64 + 1.0);
            weighted_sum += w * gate_distance(inputs.schedule, inputs.mapping, inputs.dist, swap, g);
            weight_total += w;
        }
        if weight_total > 0.0 {
            weighted_sum / weight_total
        } else {
            0.0
        }
    };
    let primary = decay_factor(inputs.decay, swap) * (mean_f + EXTENDED_SET_WEIGHT * weighted_e);
    Score {
        primary,
        secondary: 0.0,
    }
}

/// Picks the minimum-cost swap for `heuristic`. Ties within `TIE_EPSILON`
/// are broken by the swaps' natural lexicographic order (the candidate set
/// is built as a `BTreeSet`, so that ordering falls out for free), then by
/// `rng`.
#[allow(clippy::too_many_arguments)]
pub fn choose_best_swap(
    heuristic: Heuristic,
    front_layer: &BTreeSet<GateId>,
    extended: &ExtendedLayer,
    schedule: &CircuitSchedule,
    mapping: &Mapping,
    coupling: &CouplingGraph,
    dist: &DistanceMatrix,
    decay: &[f64],
    closure: &ClosureCounts,
    rng: &mut Pcg64Mcg,
) -> (PhysicalQubit, PhysicalQubit) {
    let candidates = candidate_swaps(front_layer, schedule, mapping, coupling);
    let inputs = ScoreInputs {
        front_layer,
        extended,
        schedule,
        mapping,
        dist,
        decay,
        closure,
    };

    let score_fn = match heuristic {
        Heuristic::Decay => score_decay,
        Heuristic::MaxFocus => score_max_focus,
        Heuristic::MoreExecuted => score_more_executed,
        Heuristic::Closure => score_closure,
    };

    let mut best_score: Option<Score> = None;
    let mut best_swaps: Vec<(PhysicalQubit, PhysicalQubit)> = Vec::new();
    for &swap in &candidates {
        let score = score_fn(&inputs, swap);
        match &best_score {
            None => {
                best_score = Some(score);
                best_swaps.push(swap);
            }
            Some(best) if score.ties_with(best) => {
                best_swaps.push(swap);
            }
            Some(best) if score.better_than(best) => {
                best_score = Some(score);
                best_swaps.clear();
                best_swaps.push(swap);
            }
            _ => {}
        }
    }

    *best_swaps
        .choose(rng)
        .expect("candidate swap set is non-empty for a connected coupling graph")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_unknown_name() {
        assert!(matches!(
            Heuristic::parse("bogus"),
            Err(RouteError::UnknownHeuristic(_))
        ));
    }

    #[test]
    fn parse_accepts_all_four() {
        assert!(Heuristic::parse("decay").is_ok());
        assert!(Heuristic::parse("max_focus").is_ok());
        assert!(Heuristic::parse("more_executed").is_ok());
        assert!(Heuristic::parse("closure").is_ok());
    }
}
