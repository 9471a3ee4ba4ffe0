//! Pairwise location swap.
//!
//! Exchanges two locations, either within one route or between two
//! vehicles. Between vehicles each side is priced with its own vehicle's
//! costs and both loads must stay within capacity.
//!
//! ```text
//! BEFORE:  ... a -> [x] -> b ...    ... c -> [y] -> d ...
//! AFTER:   ... a -> [y] -> b ...    ... c -> [x] -> d ...
//! ```

use crate::models::RoutingModel;
use crate::search::RouteState;

use super::{after, before};

/// Swap `routes[first_vehicle][first_pos]` with `routes[second_vehicle][second_pos]`.
///
/// Generated with `first < second` in (vehicle, position) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapMove {
    pub first_vehicle: usize,
    pub first_pos: usize,
    pub second_vehicle: usize,
    pub second_pos: usize,
}

impl SwapMove {
    pub(crate) fn generate(state: &RouteState, out: &mut Vec<SwapMove>) {
        let num_vehicles = state.num_vehicles();
        for first_vehicle in 0..num_vehicles {
            for first_pos in 0..state.route(first_vehicle).len() {
                for second_vehicle in first_vehicle..num_vehicles {
                    let lo = if second_vehicle == first_vehicle {
                        first_pos + 1
                    } else {
                        0
                    };
                    out.extend((lo..state.route(second_vehicle).len()).map(|second_pos| {
                        SwapMove {
                            first_vehicle,
                            first_pos,
                            second_vehicle,
                            second_pos,
                        }
                    }));
                }
            }
        }
    }

    pub(crate) fn delta(&self, model: &RoutingModel, state: &RouteState) -> Option<i64> {
        let r1 = state.route(self.first_vehicle);
        let r2 = state.route(self.second_vehicle);
        let (x, y) = (r1[self.first_pos], r2[self.second_pos]);

        if self.first_vehicle != self.second_vehicle {
            if !state.fits_exchange(model, self.first_vehicle, &[x], &[y])
                || !state.fits_exchange(model, self.second_vehicle, &[y], &[x])
            {
                return None;
            }
            return Some(
                replace(model, self.first_vehicle, r1, self.first_pos, y)
                    + replace(model, self.second_vehicle, r2, self.second_pos, x),
            );
        }

        let costs = model.vehicle_cost(self.first_vehicle);
        let (i, j) = (self.first_pos, self.second_pos);
        if j == i + 1 {
            let (a, b) = (before(r1, i), after(r1, j));
            let old = costs.get(a, x) + costs.get(x, y) + costs.get(y, b);
            let new = costs.get(a, y) + costs.get(y, x) + costs.get(x, b);
            return Some(new - old);
        }
        Some(
            replace(model, self.first_vehicle, r1, i, y)
                + replace(model, self.first_vehicle, r1, j, x),
        )
    }

    pub(crate) fn apply(&self, routes: &mut [Vec<usize>]) {
        let x = routes[self.first_vehicle][self.first_pos];
        let y = routes[self.second_vehicle][self.second_pos];
        routes[self.first_vehicle][self.first_pos] = y;
        routes[self.second_vehicle][self.second_pos] = x;
    }
}

/// Cost change of putting `location` at `route[pos]`, neighbors unchanged.
fn replace(model: &RoutingModel, vehicle: usize, route: &[usize], pos: usize, location: usize) -> i64 {
    let costs = model.vehicle_cost(vehicle);
    let (a, b) = (before(route, pos), after(route, pos));
    let old = route[pos];
    costs.get(a, location) + costs.get(location, b) - costs.get(a, old) - costs.get(old, b)
}
