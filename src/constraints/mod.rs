//! Constraints on the successor model.
//!
//! - [`CapacityDimension`] — cumulative demand bounded by vehicle capacity
//! - [`check_visited_once`] — every visit node has exactly one predecessor
//! - [`check_paths`] — each vehicle's chain runs from its start to its end
//!
//! [`check_assignment`] runs the whole set over a successor vector.

mod dimension;
mod path;
mod visited_once;

pub use dimension::{CapacityDimension, DemandCharge};
pub use path::{check_paths, walk_route};
pub use visited_once::check_visited_once;

use crate::graph::NodeIndex;
use crate::models::RoutingModel;

/// A type of constraint violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationType {
    /// A dimension's cumul exceeded the vehicle's capacity.
    CapacityExceeded {
        vehicle: usize,
        dimension: String,
        /// First cumul above capacity.
        load: i64,
        capacity: i64,
    },
    /// A location is the successor of more than one node.
    VisitedTwice { location: usize },
    /// A location is nobody's successor.
    NotVisited { location: usize },
    /// A location is not reachable from any vehicle's start.
    DetachedCycle { location: usize },
    /// A vehicle's chain does not end at its own end marker.
    BrokenPath { vehicle: usize },
}

/// A constraint violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationType,
}

impl Violation {
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

/// Checks visited-once, path structure, and every capacity dimension.
///
/// `nexts[i]` is the successor of node `i` for every `i < graph.size()`.
pub fn check_assignment(model: &RoutingModel, nexts: &[NodeIndex]) -> Vec<Violation> {
    let graph = model.graph();
    let mut violations = check_visited_once(graph, nexts);
    violations.extend(check_paths(graph, nexts));

    for vehicle in 0..graph.num_vehicles() {
        let Some(stops) = walk_route(graph, nexts, vehicle) else {
            continue;
        };
        violations.extend(
            model
                .dimensions()
                .iter()
                .filter_map(|dim| dim.check_route(vehicle, &stops).err()),
        );
    }

    violations
}
