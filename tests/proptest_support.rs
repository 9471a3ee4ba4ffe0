//! Shared generators and checks for the property tests.

#![allow(dead_code)]

use proptest::prelude::*;
use u_fleet::constraints::{CapacityDimension, DemandCharge};
use u_fleet::models::{CostMatrix, Demands, RoutingModel, DEPOT};
use u_fleet::solution::Solution;

/// One capacity dimension of a generated instance.
#[derive(Debug, Clone)]
pub struct DimensionSpec {
    pub demands: Vec<i64>,
    pub capacities: Vec<i64>,
    pub on_departure: bool,
}

/// A random instance kept as plain tables so checks can recompute
/// everything independently of the solver.
#[derive(Debug, Clone)]
pub struct Instance {
    /// `costs[from][to][vehicle]`
    pub costs: Vec<Vec<Vec<i64>>>,
    pub dimensions: Vec<DimensionSpec>,
}

impl Instance {
    pub fn num_locations(&self) -> usize {
        self.costs.len()
    }

    pub fn num_vehicles(&self) -> usize {
        self.costs[0][0].len()
    }

    pub fn model(&self) -> RoutingModel {
        let costs = CostMatrix::from_nested(&self.costs).expect("generated costs are valid");
        let mut model = RoutingModel::from_matrix(costs).expect("generated model is valid");
        for (i, dim) in self.dimensions.iter().enumerate() {
            let charge = if dim.on_departure {
                DemandCharge::OnDeparture
            } else {
                DemandCharge::OnArrival
            };
            model
                .add_dimension(
                    CapacityDimension::with_vehicle_capacities(
                        format!("dim{i}"),
                        Demands::new(dim.demands.clone()),
                        dim.capacities.clone(),
                    )
                    .with_charge(charge),
                )
                .expect("generated dimension is valid");
        }
        model
    }

    /// Brute force over every assignment of locations to vehicles.
    pub fn has_feasible_partition(&self) -> bool {
        let n = self.num_locations();
        let v = self.num_vehicles();
        let mut owner = vec![0usize; n.saturating_sub(1)];
        loop {
            let fits = self.dimensions.iter().all(|dim| {
                (0..v).all(|vehicle| {
                    let load: i64 = owner
                        .iter()
                        .enumerate()
                        .filter(|&(_, &o)| o == vehicle)
                        .map(|(i, _)| dim.demands[i + 1])
                        .sum();
                    load <= dim.capacities[vehicle]
                })
            });
            if fits {
                return true;
            }
            // next assignment in base v
            let mut k = 0;
            while k < owner.len() && owner[k] == v - 1 {
                owner[k] = 0;
                k += 1;
            }
            if k == owner.len() {
                return false;
            }
            owner[k] += 1;
        }
    }

    /// Total cost recomputed from the raw table.
    pub fn objective_of(&self, solution: &Solution) -> i64 {
        solution
            .routes()
            .iter()
            .map(|route| {
                let path = closed_path(route.locations());
                path.windows(2)
                    .map(|arc| self.costs[arc[0]][arc[1]][route.vehicle()])
                    .sum::<i64>()
            })
            .sum()
    }
}

/// `[depot, stops.., depot]` for a route given as `[depot, stops..]`.
pub fn closed_path(locations: &[usize]) -> Vec<usize> {
    let mut path = locations.to_vec();
    path.push(DEPOT);
    path
}

/// Instances with up to `max_locations` locations and `max_vehicles`
/// vehicles, zero to two dimensions, and zero self costs.
pub fn instance_strategy(
    max_locations: usize,
    max_vehicles: usize,
) -> impl Strategy<Value = Instance> {
    (1..=max_locations, 1..=max_vehicles, 0..=2usize).prop_flat_map(|(n, v, d)| {
        let costs = prop::collection::vec(
            prop::collection::vec(prop::collection::vec(0i64..50, v), n),
            n,
        );
        let dimension = (
            prop::collection::vec(0i64..=20, n),
            prop::collection::vec(10i64..=60, v),
            any::<bool>(),
        )
            .prop_map(|(mut demands, capacities, on_departure)| {
                demands[0] = 0;
                DimensionSpec {
                    demands,
                    capacities,
                    on_departure,
                }
            });
        (costs, prop::collection::vec(dimension, d)).prop_map(|(mut costs, dimensions)| {
            for (i, row) in costs.iter_mut().enumerate() {
                row[i].iter_mut().for_each(|c| *c = 0);
            }
            Instance { costs, dimensions }
        })
    })
}
