//! The routing model: costs, dimensions, and the successor graph.

use crate::constraints::{check_assignment, CapacityDimension, Violation};
use crate::error::{ModelError, SolveError};
use crate::graph::RouteGraph;
use crate::search::{SearchParameters, Solver};
use crate::solution::{Assignment, Solution};

use super::{CostMatrix, CostProvider, VehicleCost, DEPOT};

/// A validated heterogeneous-cost, capacitated routing instance.
///
/// Built from a cost provider, then extended with capacity dimensions.
/// The model is read-only once built; solving borrows it.
///
/// # Examples
///
/// ```
/// use u_fleet::constraints::CapacityDimension;
/// use u_fleet::models::{CostMatrix, Demands, RoutingModel};
/// use u_fleet::search::SearchParameters;
///
/// let costs = CostMatrix::from_nested(&[
///     vec![vec![0, 0], vec![5, 10], vec![3, 6], vec![10, 2]],
///     vec![vec![5, 10], vec![0, 0], vec![2, 4], vec![7, 14]],
///     vec![vec![3, 6], vec![2, 4], vec![0, 0], vec![1, 2]],
///     vec![vec![10, 2], vec![7, 14], vec![1, 2], vec![0, 0]],
/// ])
/// .unwrap();
/// let mut model = RoutingModel::from_matrix(costs).unwrap();
/// model
///     .add_dimension(CapacityDimension::new("Demand", Demands::new(vec![0, 100, 20, 60]), 100))
///     .unwrap();
///
/// let solution = model.solve(&SearchParameters::default()).unwrap();
/// assert_eq!(solution.objective(), 20);
/// ```
#[derive(Debug, Clone)]
pub struct RoutingModel {
    costs: CostMatrix,
    dimensions: Vec<CapacityDimension>,
    graph: RouteGraph,
}

impl RoutingModel {
    /// Builds a model over `num_locations` locations (depot included) and
    /// `num_vehicles` vehicles, querying `costs` for every arc and vehicle.
    pub fn new<P>(num_locations: usize, num_vehicles: usize, costs: &P) -> Result<Self, ModelError>
    where
        P: CostProvider + ?Sized,
    {
        check_counts(num_locations, num_vehicles)?;
        let costs = CostMatrix::from_provider(num_locations, num_vehicles, costs)?;
        check_cost_range(&costs)?;
        Ok(Self::with_costs(costs))
    }

    /// Builds a model from an existing matrix, validating its entries.
    pub fn from_matrix(costs: CostMatrix) -> Result<Self, ModelError> {
        check_counts(costs.size(), costs.num_vehicles())?;
        let validated = CostMatrix::from_provider(costs.size(), costs.num_vehicles(), &costs)?;
        check_cost_range(&validated)?;
        Ok(Self::with_costs(validated))
    }

    fn with_costs(costs: CostMatrix) -> Self {
        let graph = RouteGraph::new(costs.size(), costs.num_vehicles());
        Self {
            costs,
            dimensions: Vec::new(),
            graph,
        }
    }

    /// Registers a capacity dimension after validating it against the model.
    pub fn add_dimension(&mut self, dimension: CapacityDimension) -> Result<&mut Self, ModelError> {
        if self.dimension(dimension.name()).is_some() {
            return Err(ModelError::DuplicateDimension(dimension.name().to_string()));
        }
        dimension.validate(self.num_locations(), self.num_vehicles())?;
        self.dimensions.push(dimension);
        Ok(self)
    }

    /// Number of locations, depot included.
    pub fn num_locations(&self) -> usize {
        self.costs.size()
    }

    pub fn num_vehicles(&self) -> usize {
        self.costs.num_vehicles()
    }

    /// The depot location, shared by every vehicle.
    pub fn depot(&self) -> usize {
        DEPOT
    }

    pub fn costs(&self) -> &CostMatrix {
        &self.costs
    }

    /// Cost of `from → to` for `vehicle`.
    pub fn cost(&self, from: usize, to: usize, vehicle: usize) -> i64 {
        self.costs.get(from, to, vehicle)
    }

    /// `vehicle`'s cost function.
    pub fn vehicle_cost(&self, vehicle: usize) -> VehicleCost<'_> {
        self.costs.for_vehicle(vehicle)
    }

    /// Cost of a depot-closed route driven by `vehicle`.
    pub fn route_cost(&self, vehicle: usize, stops: &[usize]) -> i64 {
        self.vehicle_cost(vehicle).route_cost(stops)
    }

    /// Returns `true` if `stops` respects every dimension for `vehicle`.
    pub fn fits(&self, vehicle: usize, stops: &[usize]) -> bool {
        self.dimensions
            .iter()
            .all(|dim| dim.check_route(vehicle, stops).is_ok())
    }

    pub fn dimensions(&self) -> &[CapacityDimension] {
        &self.dimensions
    }

    /// Looks up a dimension by name.
    pub fn dimension(&self, name: &str) -> Option<&CapacityDimension> {
        self.dimensions.iter().find(|dim| dim.name() == name)
    }

    pub fn graph(&self) -> &RouteGraph {
        &self.graph
    }

    /// Runs every constraint over `assignment`.
    pub fn validate(&self, assignment: &Assignment) -> Vec<Violation> {
        check_assignment(self, assignment.nexts())
    }

    /// Solves the model with `params`.
    pub fn solve(&self, params: &SearchParameters) -> Result<Solution, SolveError> {
        Solver::new(self, params.clone()).solve()
    }
}

fn check_counts(num_locations: usize, num_vehicles: usize) -> Result<(), ModelError> {
    if num_locations == 0 {
        return Err(ModelError::EmptyInstance);
    }
    if num_vehicles == 0 {
        return Err(ModelError::NoVehicles);
    }
    Ok(())
}

/// A full solution has `N - 1 + V` arcs; move deltas add a few more terms
/// on top of a route's arcs. Every such sum must fit in an `i64`.
fn check_cost_range(costs: &CostMatrix) -> Result<(), ModelError> {
    let arcs = costs.size() + costs.num_vehicles() + 4;
    let max_cost = costs.max_cost();
    let fits = i64::try_from(arcs)
        .ok()
        .and_then(|n| max_cost.checked_mul(n))
        .is_some();
    if fits {
        Ok(())
    } else {
        Err(ModelError::CostOverflow { max_cost, arcs })
    }
}
