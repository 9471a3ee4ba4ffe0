//! Per-vehicle route read back from an assignment.

use serde::Serialize;

use crate::models::{RoutingModel, DEPOT};

use super::Assignment;

/// The route of one vehicle, walked from its start to its end marker.
///
/// `locations` begins at the depot and lists the visits in order; the
/// return to the depot is implied. An unused vehicle has `locations == [0]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleRoute {
    vehicle: usize,
    locations: Vec<usize>,
    cost: i64,
    loads: Vec<i64>,
    cumuls: Vec<Vec<i64>>,
}

impl VehicleRoute {
    /// Follows `vehicle`'s successor chain, summing each arc with the
    /// vehicle's own cost function.
    pub fn extract(model: &RoutingModel, assignment: &Assignment, vehicle: usize) -> Self {
        let graph = model.graph();
        let mut locations = vec![DEPOT];
        let mut cost = 0;
        let mut index = graph.start(vehicle);

        loop {
            let next = assignment.value(graph.next_var(index));
            if graph.is_end(next) {
                break;
            }
            let (from, to) = (graph.index_to_location(index), graph.index_to_location(next));
            cost += model.cost(from, to, vehicle);
            locations.push(to);
            index = next;
        }
        if locations.len() > 1 {
            cost += model.cost(graph.index_to_location(index), DEPOT, vehicle);
        }

        let stops = &locations[1..];
        let loads = model.dimensions().iter().map(|d| d.route_load(stops)).collect();
        let cumuls = model.dimensions().iter().map(|d| d.cumuls(stops)).collect();

        Self {
            vehicle,
            locations,
            cost,
            loads,
            cumuls,
        }
    }

    pub fn vehicle(&self) -> usize {
        self.vehicle
    }

    /// Depot followed by the visited locations.
    pub fn locations(&self) -> &[usize] {
        &self.locations
    }

    /// Visited locations without the depot.
    pub fn stops(&self) -> &[usize] {
        &self.locations[1..]
    }

    /// Returns `true` if the vehicle stays at the depot.
    pub fn is_empty(&self) -> bool {
        self.locations.len() == 1
    }

    /// Route cost under this vehicle's cost function.
    pub fn cost(&self) -> i64 {
        self.cost
    }

    /// Accumulated demand of the first dimension (0 if none).
    pub fn demand(&self) -> i64 {
        self.loads.first().copied().unwrap_or(0)
    }

    /// Accumulated load of dimension `dim` at the end of the route.
    pub fn load(&self, dim: usize) -> Option<i64> {
        self.loads.get(dim).copied()
    }

    /// Cumul of dimension `dim` at start, every visit, and end.
    pub fn cumuls(&self, dim: usize) -> Option<&[i64]> {
        self.cumuls.get(dim).map(Vec::as_slice)
    }
}
