//! First-solution heuristics.
//!
//! Both heuristics respect capacity but may strand locations when greedy
//! choices fragment the fleet's remaining capacity. Stranded instances go
//! through exact bin packing before the search gives up.

use tracing::{debug, info, warn};

use crate::graph::Domains;
use crate::local_search::{at_or_depot, before};
use crate::models::{RoutingModel, DEPOT};
use crate::error::SolveError;

use super::packing::{pack, Packing};
use super::{Budget, FirstSolutionStrategy, RouteState, SearchParameters};

/// Builds a feasible starting assignment.
///
/// # Errors
///
/// [`SolveError::NoSolution`] if the instance is provably infeasible,
/// [`SolveError::BudgetExhausted`] if packing could not decide in time.
pub(crate) fn initial_routes(
    model: &RoutingModel,
    params: &SearchParameters,
    budget: &Budget,
) -> Result<RouteState, SolveError> {
    check_capacity_bounds(model)?;

    let (routes, unrouted) = match params.first_solution {
        FirstSolutionStrategy::PathCheapestArc => path_cheapest_arc(model),
        FirstSolutionStrategy::CheapestInsertion => cheapest_insertion(model),
    };
    if unrouted.is_empty() {
        return Ok(RouteState::new(model, routes));
    }

    warn!(
        unrouted = unrouted.len(),
        "greedy construction stranded locations, falling back to bin packing"
    );
    match pack(model, params.packing_node_limit, budget) {
        Packing::Packed(bins) => {
            let routes = bins
                .into_iter()
                .enumerate()
                .map(|(vehicle, bin)| nearest_neighbor_order(model, vehicle, bin))
                .collect();
            Ok(RouteState::new(model, routes))
        }
        Packing::Infeasible => {
            info!("bin packing proved the instance infeasible");
            Err(SolveError::NoSolution)
        }
        Packing::Undecided => Err(SolveError::BudgetExhausted),
    }
}

/// Rejects instances whose demand cannot fit the fleet in aggregate or
/// where one location outweighs every vehicle.
fn check_capacity_bounds(model: &RoutingModel) -> Result<(), SolveError> {
    let num_vehicles = model.num_vehicles();
    for dim in model.dimensions() {
        let total = dim.demands().total();
        if total > dim.total_capacity(num_vehicles) {
            info!(dimension = dim.name(), total, "total demand exceeds fleet capacity");
            return Err(SolveError::NoSolution);
        }
        let largest = dim.demands().max();
        if largest > dim.max_capacity(num_vehicles) {
            info!(dimension = dim.name(), largest, "a location exceeds every capacity");
            return Err(SolveError::NoSolution);
        }
    }
    Ok(())
}

/// Extends vehicle 0's route with its cheapest feasible successor until
/// none remains, closes it, then moves on to vehicle 1, and so on.
///
/// Works on successor domains: capacity removes values that would overload
/// the current vehicle, and binding a successor removes it from every other
/// domain.
pub(crate) fn path_cheapest_arc(model: &RoutingModel) -> (Vec<Vec<usize>>, Vec<usize>) {
    let graph = model.graph();
    let dims = model.dimensions();
    let mut domains = Domains::new(graph);
    let mut routes = vec![Vec::new(); model.num_vehicles()];

    for (vehicle, route) in routes.iter_mut().enumerate() {
        let costs = model.vehicle_cost(vehicle);
        let mut loads = vec![0; dims.len()];
        let mut current = graph.start(vehicle);

        loop {
            let overloading: Vec<_> = domains
                .candidates(current)
                .filter(|&next| graph.is_visit(next))
                .filter(|&next| {
                    let location = graph.index_to_location(next);
                    dims.iter()
                        .zip(&loads)
                        .any(|(dim, load)| load + dim.demand(location) > dim.capacity(vehicle))
                })
                .collect();
            for next in overloading {
                domains.remove(current, next);
            }

            let from = graph.index_to_location(current);
            let cheapest = domains
                .candidates(current)
                .filter(|&next| graph.is_visit(next))
                .min_by_key(|&next| costs.get(from, graph.index_to_location(next)));
            let Some(next) = cheapest else {
                domains.bind(current, graph.end(vehicle));
                break;
            };

            domains.bind(current, next);
            domains.remove_value_everywhere(next, current);
            let location = graph.index_to_location(next);
            for (load, dim) in loads.iter_mut().zip(dims) {
                *load += dim.demand(location);
            }
            route.push(location);
            current = next;
        }
        debug!(vehicle, stops = route.len(), "route closed");
    }

    let unrouted = unrouted(model, &routes);
    (routes, unrouted)
}

/// Inserts locations one at a time at their cheapest feasible position.
///
/// The next location is the one with the largest regret: the gap between
/// its cheapest insertion and its cheapest insertion into any other
/// vehicle. A location that fits only one vehicle has unbounded regret and
/// goes first. Ties fall to the cheaper insertion, then to the lower
/// location.
pub(crate) fn cheapest_insertion(model: &RoutingModel) -> (Vec<Vec<usize>>, Vec<usize>) {
    let dims = model.dimensions();
    let num_vehicles = model.num_vehicles();
    let mut routes: Vec<Vec<usize>> = vec![Vec::new(); num_vehicles];
    let mut loads = vec![vec![0; dims.len()]; num_vehicles];
    let mut pending: Vec<usize> = (1..model.num_locations()).collect();

    loop {
        // (regret, cost, pending index, vehicle, position)
        let mut best: Option<(Option<i64>, i64, usize, usize, usize)> = None;
        for (i, &location) in pending.iter().enumerate() {
            // cheapest (cost, position) per vehicle that has room
            let mut per_vehicle: Vec<(i64, usize, usize)> = Vec::new();
            for vehicle in 0..num_vehicles {
                let fits = dims
                    .iter()
                    .zip(&loads[vehicle])
                    .all(|(dim, load)| load + dim.demand(location) <= dim.capacity(vehicle));
                if fits {
                    let (cost, pos) = best_position(model, vehicle, &routes[vehicle], location);
                    per_vehicle.push((cost, vehicle, pos));
                }
            }
            per_vehicle.sort_unstable();
            let Some(&(cost, vehicle, pos)) = per_vehicle.first() else {
                continue;
            };
            // None stands for unbounded regret
            let regret = per_vehicle.get(1).map(|&(second, _, _)| second - cost);
            let better = match &best {
                None => true,
                Some((best_regret, best_cost, ..)) => match (regret, *best_regret) {
                    (None, Some(_)) => true,
                    (Some(_), None) => false,
                    (r, b) if r == b => cost < *best_cost,
                    (r, b) => r > b,
                },
            };
            if better {
                best = Some((regret, cost, i, vehicle, pos));
            }
        }

        let Some((_, _, i, vehicle, pos)) = best else {
            break;
        };
        let location = pending.remove(i);
        routes[vehicle].insert(pos, location);
        for (load, dim) in loads[vehicle].iter_mut().zip(dims) {
            *load += dim.demand(location);
        }
    }

    (routes, pending)
}

/// Cheapest `(added cost, position)` for `location` in `route`; ties go to
/// the earlier position.
fn best_position(model: &RoutingModel, vehicle: usize, route: &[usize], location: usize) -> (i64, usize) {
    let costs = model.vehicle_cost(vehicle);
    (0..=route.len())
        .map(|pos| {
            let (prev, next) = (before(route, pos), at_or_depot(route, pos));
            let added = costs.get(prev, location) + costs.get(location, next) - costs.get(prev, next);
            (added, pos)
        })
        .min()
        .unwrap_or((0, 0))
}

/// Orders `locations` by repeatedly driving to the cheapest next one.
fn nearest_neighbor_order(model: &RoutingModel, vehicle: usize, mut locations: Vec<usize>) -> Vec<usize> {
    let costs = model.vehicle_cost(vehicle);
    let mut ordered = Vec::with_capacity(locations.len());
    let mut current = DEPOT;
    while let Some(next) = costs.nearest(current, &locations) {
        locations.retain(|&loc| loc != next);
        ordered.push(next);
        current = next;
    }
    ordered
}

fn unrouted(model: &RoutingModel, routes: &[Vec<usize>]) -> Vec<usize> {
    let mut routed = vec![false; model.num_locations()];
    for &location in routes.iter().flatten() {
        routed[location] = true;
    }
    (1..model.num_locations()).filter(|&loc| !routed[loc]).collect()
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::constraints::CapacityDimension;
    use crate::models::{CostMatrix, Demands};

    fn abcd() -> RoutingModel {
        let costs = CostMatrix::from_nested(&[
            vec![vec![0, 0], vec![5, 10], vec![3, 6], vec![10, 2]],
            vec![vec![5, 10], vec![0, 0], vec![2, 4], vec![7, 14]],
            vec![vec![3, 6], vec![2, 4], vec![0, 0], vec![1, 2]],
            vec![vec![10, 2], vec![7, 14], vec![1, 2], vec![0, 0]],
        ])
        .expect("valid");
        let mut model = RoutingModel::from_matrix(costs).expect("valid");
        model
            .add_dimension(CapacityDimension::new(
                "Demand",
                Demands::new(vec![0, 100, 20, 60]),
                100,
            ))
            .expect("valid");
        model
    }

    /// Greedy fills vehicle 0 with 3 and 1, then vehicle 1 takes 2 and cannot fit 4.
    fn fragmenting() -> RoutingModel {
        let mut model = RoutingModel::new(5, 2, &|from: usize, to: usize, _v: usize| -> i64 {
            match (from, to) {
                (a, b) if a == b => 0,
                (0, 3) | (3, 0) => 1,
                (3, 1) | (1, 3) => 2,
                _ => 10,
            }
        })
        .expect("valid");
        model
            .add_dimension(CapacityDimension::new(
                "Demand",
                Demands::new(vec![0, 50, 50, 40, 60]),
                100,
            ))
            .expect("valid");
        model
    }

    fn budget() -> Budget {
        Budget::new(Instant::now(), &[], None)
    }

    #[test]
    fn test_path_cheapest_arc() {
        let (routes, unrouted) = path_cheapest_arc(&abcd());
        assert_eq!(routes, vec![vec![2, 3], vec![1]]);
        assert!(unrouted.is_empty());
    }

    #[test]
    fn test_cheapest_insertion() {
        let model = abcd();
        let (routes, unrouted) = cheapest_insertion(&model);
        // 4 goes to vehicle 1 first; 1 then fits only vehicle 0
        assert!(unrouted.is_empty(), "stranded {unrouted:?}");
        assert_eq!(routes[0], vec![1]);
        let mut second = routes[1].clone();
        second.sort_unstable();
        assert_eq!(second, vec![2, 3]);
        for (v, route) in routes.iter().enumerate() {
            assert!(model.fits(v, route));
        }
        let total: i64 = routes
            .iter()
            .enumerate()
            .map(|(v, r)| model.route_cost(v, r))
            .sum();
        assert_eq!(total, 20);
    }

    #[test]
    fn test_cheapest_insertion_single_vehicle() {
        let model = RoutingModel::new(4, 1, &|from: usize, to: usize, _v: usize| {
            (from as i64 - to as i64).abs()
        })
        .expect("valid");
        let (routes, unrouted) = cheapest_insertion(&model);
        assert!(unrouted.is_empty());
        assert_eq!(model.route_cost(0, &routes[0]), 6);
    }

    #[test]
    fn test_packing_fallback() {
        let model = fragmenting();
        let (_, unrouted) = path_cheapest_arc(&model);
        assert!(!unrouted.is_empty());

        let state = initial_routes(&model, &SearchParameters::default(), &budget())
            .expect("packing finds a split");
        let mut all: Vec<usize> = state.routes().concat();
        all.sort_unstable();
        assert_eq!(all, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_capacity_bounds() {
        let mut model = RoutingModel::from_matrix(CostMatrix::new(3, 2)).expect("valid");
        model
            .add_dimension(CapacityDimension::new(
                "Demand",
                Demands::new(vec![0, 11, 1]),
                10,
            ))
            .expect("valid");
        assert_eq!(
            initial_routes(&model, &SearchParameters::default(), &budget()),
            Err(SolveError::NoSolution)
        );
    }

    #[test]
    fn test_partition_infeasible() {
        let mut model = RoutingModel::from_matrix(CostMatrix::new(4, 2)).expect("valid");
        model
            .add_dimension(CapacityDimension::new(
                "Demand",
                Demands::new(vec![0, 60, 60, 60]),
                90,
            ))
            .expect("valid");
        assert_eq!(
            initial_routes(&model, &SearchParameters::default(), &budget()),
            Err(SolveError::NoSolution)
        );
    }

    #[test]
    fn test_nearest_neighbor_order() {
        let model = RoutingModel::new(4, 1, &|from: usize, to: usize, _v: usize| {
            (from as i64 - to as i64).abs()
        })
        .expect("valid");
        assert_eq!(nearest_neighbor_order(&model, 0, vec![3, 1, 2]), vec![1, 2, 3]);
    }
}
