//! Resolved successor variables.

use crate::graph::{NextVar, NodeIndex};
use crate::models::RoutingModel;

/// A full assignment of every next variable.
///
/// Produced once per solve and never mutated afterwards.
///
/// # Examples
///
/// ```
/// use u_fleet::models::{CostMatrix, RoutingModel};
/// use u_fleet::search::SearchParameters;
///
/// let model = RoutingModel::from_matrix(CostMatrix::new(3, 1)).unwrap();
/// let solution = model.solve(&SearchParameters::default()).unwrap();
/// let assignment = solution.assignment();
///
/// let graph = model.graph();
/// let mut index = graph.start(0);
/// let mut visited = Vec::new();
/// while !graph.is_end(index) {
///     index = assignment.value(graph.next_var(index));
///     visited.push(graph.index_to_location(index));
/// }
/// assert_eq!(visited.len(), 3); // two visits and the return to the depot
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    nexts: Vec<NodeIndex>,
    vehicles: Vec<usize>,
    objective: i64,
}

impl Assignment {
    /// Encodes per-vehicle location sequences as successor values.
    ///
    /// `routes[v]` lists the locations visited by vehicle `v`, depot excluded.
    pub(crate) fn from_routes(model: &RoutingModel, routes: &[Vec<usize>]) -> Self {
        let graph = model.graph();
        let mut nexts = vec![NodeIndex::new(0); graph.size()];
        let mut vehicles = vec![0; graph.num_indices()];
        let mut objective = 0;

        for (vehicle, stops) in routes.iter().enumerate() {
            let mut prev = graph.start(vehicle);
            vehicles[prev.get()] = vehicle;
            for index in stops.iter().filter_map(|&loc| graph.location_to_index(loc)) {
                nexts[prev.get()] = index;
                vehicles[index.get()] = vehicle;
                prev = index;
            }
            let end = graph.end(vehicle);
            nexts[prev.get()] = end;
            vehicles[end.get()] = vehicle;
            objective += model.route_cost(vehicle, stops);
        }

        Self {
            nexts,
            vehicles,
            objective,
        }
    }

    /// Value of a next variable.
    pub fn value(&self, var: NextVar) -> NodeIndex {
        self.nexts[var.owner().get()]
    }

    /// Successor of `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is an end marker.
    pub fn next(&self, index: NodeIndex) -> NodeIndex {
        self.nexts[index.get()]
    }

    /// Vehicle whose route contains `index`.
    pub fn vehicle(&self, index: NodeIndex) -> usize {
        self.vehicles[index.get()]
    }

    /// Total cost over all vehicles.
    pub fn objective_value(&self) -> i64 {
        self.objective
    }

    /// Raw successor vector, indexed by node.
    pub fn nexts(&self) -> &[NodeIndex] {
        &self.nexts
    }
}
