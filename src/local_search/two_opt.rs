//! Intra-route 2-opt segment reversal.
//!
//! # Algorithm
//!
//! For a route `[r₀, ..., rₙ₋₁]` and positions `i < j`, reverses
//! `r[i..=j]`. Costs may be asymmetric, so the reversed segment's internal
//! arcs are repriced instead of assumed unchanged.
//!
//! # Complexity
//!
//! O(n²) candidates per route, O(j - i) per evaluation.
//!
//! # Reference
//!
//! Croes, G. A. (1958). "A Method for Solving Traveling-Salesman Problems",
//! *Operations Research* 6(6), 791-812.

use crate::models::RoutingModel;
use crate::search::RouteState;

use super::{after, before};

/// Reverse `route[start..=end]` of `vehicle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoOptMove {
    pub vehicle: usize,
    pub start: usize,
    pub end: usize,
}

impl TwoOptMove {
    pub(crate) fn generate(state: &RouteState, out: &mut Vec<TwoOptMove>) {
        for vehicle in 0..state.num_vehicles() {
            let n = state.route(vehicle).len();
            for start in 0..n {
                out.extend(((start + 1)..n).map(|end| TwoOptMove { vehicle, start, end }));
            }
        }
    }

    pub(crate) fn delta(&self, model: &RoutingModel, state: &RouteState) -> Option<i64> {
        let route = state.route(self.vehicle);
        let costs = model.vehicle_cost(self.vehicle);
        let segment = &route[self.start..=self.end];
        let (prev, next) = (before(route, self.start), after(route, self.end));
        let (first, last) = (segment[0], segment[segment.len() - 1]);

        let mut old = costs.get(prev, first) + costs.get(last, next);
        let mut new = costs.get(prev, last) + costs.get(first, next);
        for pair in segment.windows(2) {
            old += costs.get(pair[0], pair[1]);
            new += costs.get(pair[1], pair[0]);
        }
        Some(new - old)
    }

    pub(crate) fn apply(&self, routes: &mut [Vec<usize>]) {
        routes[self.vehicle][self.start..=self.end].reverse();
    }
}
