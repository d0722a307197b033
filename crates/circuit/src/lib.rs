// Licensed under the Apache License, Version 2.0. You may obtain a copy of
// this license in the LICENSE.txt file in the root directory of this source
// tree or at http://www.apache.org/licenses/LICENSE-2.0.
//
// Any modifications or derivative works of this code must retain this
// notice, and modified files need to carry a notice indicating that they
// have been altered from the originals.

//! Data model for the qubit routing engine.
//!
//! This crate owns the types that are immutable after construction (the
//! circuit, the coupling graph) and the one piece of state that is mutated
//! in a tight hot loop by `qroute-accelerate`: the logical/physical mapping.
//! It has no knowledge of the scheduling or scoring algorithms built on top
//! of it in `qroute-accelerate`.

pub mod coupling;
pub mod error;
pub mod gate;
pub mod mapping;
pub mod op;

pub use coupling::{CouplingGraph, DistanceMatrix};
pub use error::{RouteError, RouteResult};
pub use gate::{CircuitSchedule, Gate, LogicalQubit, PhysicalQubit, QubitSet};
pub use mapping::Mapping;
pub use op::{Op, RoutingResult};
