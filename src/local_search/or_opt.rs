//! Intra-route segment relocation (Or-opt).
//!
//! # Algorithm
//!
//! Moves a chain of 2 or 3 consecutive locations to another position of the
//! same route, keeping its orientation. Single-location moves are covered by
//! relocate.
//!
//! ```text
//! BEFORE:  a -> [s₁ -> s₂] -> b -> ... -> p -> q
//! AFTER:   a -> b -> ... -> p -> [s₁ -> s₂] -> q
//! ```
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use crate::models::{RoutingModel, DEPOT};
use crate::search::RouteState;

use super::{at_or_depot, before};

/// Segment lengths tried by Or-opt.
pub const SEGMENT_LENGTHS: std::ops::RangeInclusive<usize> = 2..=3;

/// Move `route[start..start + len]` to position `to` of the shortened route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrOptMove {
    pub vehicle: usize,
    pub start: usize,
    pub len: usize,
    pub to: usize,
}

impl OrOptMove {
    pub(crate) fn generate(state: &RouteState, out: &mut Vec<OrOptMove>) {
        for vehicle in 0..state.num_vehicles() {
            let n = state.route(vehicle).len();
            for len in SEGMENT_LENGTHS.filter(|&len| len < n) {
                for start in 0..=(n - len) {
                    out.extend(
                        (0..=(n - len))
                            .filter(|&to| to != start)
                            .map(|to| OrOptMove {
                                vehicle,
                                start,
                                len,
                                to,
                            }),
                    );
                }
            }
        }
    }

    pub(crate) fn delta(&self, model: &RoutingModel, state: &RouteState) -> Option<i64> {
        let route = state.route(self.vehicle);
        let costs = model.vehicle_cost(self.vehicle);
        let end = self.start + self.len;
        let (first, last) = (route[self.start], route[end - 1]);
        let (a, b) = (before(route, self.start), at_or_depot(route, end));
        let removal = costs.get(a, b) - costs.get(a, first) - costs.get(last, b);

        let shortened = |i: usize| if i < self.start { route[i] } else { route[i + self.len] };
        let remaining = route.len() - self.len;
        let p = if self.to == 0 {
            DEPOT
        } else {
            shortened(self.to - 1)
        };
        let q = if self.to == remaining {
            DEPOT
        } else {
            shortened(self.to)
        };
        Some(removal + costs.get(p, first) + costs.get(last, q) - costs.get(p, q))
    }

    pub(crate) fn apply(&self, routes: &mut [Vec<usize>]) {
        let route = &mut routes[self.vehicle];
        let segment: Vec<usize> = route.drain(self.start..self.start + self.len).collect();
        route.splice(self.to..self.to, segment);
    }
}
