//! Location relocation, within a route or across vehicles.
//!
//! # Algorithm
//!
//! Removes one location from its route and reinserts it at another position,
//! possibly in another vehicle's route:
//!
//! ```text
//! BEFORE:  ... a -> [x] -> b ...        ... p -> q ...
//! AFTER:   ... a -> b ...               ... p -> [x] -> q ...
//! ```
//!
//! The removal side is priced with the source vehicle's costs and the
//! insertion side with the target vehicle's costs. Within one route, the
//! target position is an index into the route with `x` already removed.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use crate::models::{RoutingModel, DEPOT};
use crate::search::RouteState;

use super::{at_or_depot, before, after};

/// Move the location at `from_pos` of `from_vehicle` to `to_pos` of `to_vehicle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelocateMove {
    pub from_vehicle: usize,
    pub from_pos: usize,
    pub to_vehicle: usize,
    pub to_pos: usize,
}

impl RelocateMove {
    pub(crate) fn generate(state: &RouteState, out: &mut Vec<RelocateMove>) {
        let num_vehicles = state.num_vehicles();
        for from_vehicle in 0..num_vehicles {
            let from_len = state.route(from_vehicle).len();
            for from_pos in 0..from_len {
                for to_vehicle in 0..num_vehicles {
                    let positions = if to_vehicle == from_vehicle {
                        from_len
                    } else {
                        state.route(to_vehicle).len() + 1
                    };
                    out.extend(
                        (0..positions)
                            .filter(|&to_pos| to_vehicle != from_vehicle || to_pos != from_pos)
                            .map(|to_pos| RelocateMove {
                                from_vehicle,
                                from_pos,
                                to_vehicle,
                                to_pos,
                            }),
                    );
                }
            }
        }
    }

    /// Cost change, or `None` if the target vehicle lacks capacity.
    pub(crate) fn delta(&self, model: &RoutingModel, state: &RouteState) -> Option<i64> {
        let from = state.route(self.from_vehicle);
        let x = from[self.from_pos];
        let source = model.vehicle_cost(self.from_vehicle);
        let (a, b) = (before(from, self.from_pos), after(from, self.from_pos));
        let removal = source.get(a, b) - source.get(a, x) - source.get(x, b);

        if self.from_vehicle == self.to_vehicle {
            let shortened = |i: usize| if i < self.from_pos { from[i] } else { from[i + 1] };
            let len = from.len() - 1;
            let prev = if self.to_pos == 0 {
                DEPOT
            } else {
                shortened(self.to_pos - 1)
            };
            let next = if self.to_pos == len {
                DEPOT
            } else {
                shortened(self.to_pos)
            };
            return Some(removal + source.get(prev, x) + source.get(x, next) - source.get(prev, next));
        }

        if !state.fits_exchange(model, self.to_vehicle, &[], &[x]) {
            return None;
        }
        let to = state.route(self.to_vehicle);
        let target = model.vehicle_cost(self.to_vehicle);
        let (prev, next) = (before(to, self.to_pos), at_or_depot(to, self.to_pos));
        Some(removal + target.get(prev, x) + target.get(x, next) - target.get(prev, next))
    }

    pub(crate) fn apply(&self, routes: &mut [Vec<usize>]) {
        let x = routes[self.from_vehicle].remove(self.from_pos);
        routes[self.to_vehicle].insert(self.to_pos, x);
    }
}
