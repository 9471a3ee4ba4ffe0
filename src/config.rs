//! JSON problem descriptions.
//!
//! ```json
//! {
//!   "location_names": ["A", "B", "C", "D"],
//!   "num_vehicles": 2,
//!   "costs": [[[0, 0], [5, 10], ...], ...],
//!   "dimensions": [
//!     { "name": "Demand", "demands": [0, 100, 20, 60], "capacity": 100 }
//!   ],
//!   "search": { "first_solution": "path_cheapest_arc", "max_moves": 10000 }
//! }
//! ```
//!
//! `costs[from][to][vehicle]` holds the cost of driving `from → to` with
//! `vehicle`. `capacity` is either one number for the whole fleet or one
//! number per vehicle.

use std::io::Read;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::constraints::{CapacityDimension, DemandCharge};
use crate::error::{ConfigError, ModelError};
use crate::local_search::LocalSearchOperator;
use crate::models::{CostMatrix, Demands, RoutingModel};
use crate::search::{FirstSolutionStrategy, Metaheuristic, SearchParameters, Threads};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProblemConfig {
    #[serde(default)]
    pub location_names: Option<Vec<String>>,
    pub num_vehicles: usize,
    pub costs: Vec<Vec<Vec<i64>>>,
    #[serde(default)]
    pub dimensions: Vec<DimensionConfig>,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CapacityConfig {
    Uniform(i64),
    PerVehicle(Vec<i64>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DimensionConfig {
    pub name: String,
    pub demands: Vec<i64>,
    pub capacity: CapacityConfig,
    #[serde(default)]
    pub slack_max: i64,
    #[serde(default = "default_fix_start_cumul_to_zero")]
    pub fix_start_cumul_to_zero: bool,
    #[serde(default)]
    pub charge: DemandCharge,
}

fn default_fix_start_cumul_to_zero() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    #[serde(default)]
    pub first_solution: FirstSolutionStrategy,
    #[serde(default)]
    pub metaheuristic: Metaheuristic,
    pub time_limit_ms: Option<u64>,
    pub max_moves: Option<usize>,
    #[serde(default)]
    pub seed: u64,
    /// `0` uses every available core.
    pub threads: Option<usize>,
    pub operators: Option<Vec<LocalSearchOperator>>,
    pub packing_node_limit: Option<usize>,
}

impl ProblemConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Validates the description and builds the routing model.
    #[instrument(skip_all, level = tracing::Level::DEBUG)]
    pub fn build_model(&self) -> Result<RoutingModel, ConfigError> {
        let costs = CostMatrix::from_nested(&self.costs)?;
        if !self.costs.is_empty() && costs.num_vehicles() != self.num_vehicles {
            return Err(ModelError::CostShape(format!(
                "cost cells hold {} vehicle costs, expected {}",
                costs.num_vehicles(),
                self.num_vehicles
            ))
            .into());
        }
        if let Some(names) = &self.location_names {
            if names.len() != self.costs.len() {
                return Err(ConfigError::LocationNames {
                    expected: self.costs.len(),
                    actual: names.len(),
                });
            }
        }

        let mut model = RoutingModel::from_matrix(costs)?;
        for dim in &self.dimensions {
            model.add_dimension(dim.to_dimension())?;
        }
        Ok(model)
    }

    pub fn search_parameters(&self) -> SearchParameters {
        self.search.to_parameters()
    }

    /// Location labels, falling back to indices.
    pub fn names(&self) -> Vec<String> {
        match &self.location_names {
            Some(names) => names.clone(),
            None => (0..self.costs.len()).map(|i| i.to_string()).collect(),
        }
    }
}

impl DimensionConfig {
    fn to_dimension(&self) -> CapacityDimension {
        let demands = Demands::new(self.demands.clone());
        let dimension = match &self.capacity {
            CapacityConfig::Uniform(capacity) => {
                CapacityDimension::new(self.name.clone(), demands, *capacity)
            }
            CapacityConfig::PerVehicle(capacities) => CapacityDimension::with_vehicle_capacities(
                self.name.clone(),
                demands,
                capacities.clone(),
            ),
        };
        dimension
            .with_slack_max(self.slack_max)
            .with_fix_start_cumul_to_zero(self.fix_start_cumul_to_zero)
            .with_charge(self.charge)
    }
}

impl SearchConfig {
    fn to_parameters(&self) -> SearchParameters {
        let mut params = SearchParameters::default()
            .with_first_solution(self.first_solution)
            .with_metaheuristic(self.metaheuristic)
            .with_seed(self.seed);
        if let Some(ms) = self.time_limit_ms {
            params = params.with_time_limit(Duration::from_millis(ms));
        }
        if let Some(moves) = self.max_moves {
            params = params.with_move_limit(moves);
        }
        if let Some(threads) = self.threads {
            params = params.with_threads(match threads {
                0 => Threads::Auto,
                1 => Threads::Single,
                n => Threads::Multi(n),
            });
        }
        if let Some(operators) = &self.operators {
            params = params.with_operators(operators.clone());
        }
        if let Some(limit) = self.packing_node_limit {
            params = params.with_packing_node_limit(limit);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Termination;

    const ABCD: &str = r#"{
        "location_names": ["A", "B", "C", "D"],
        "num_vehicles": 2,
        "costs": [
            [[0, 0], [5, 10], [3, 6], [10, 2]],
            [[5, 10], [0, 0], [2, 4], [7, 14]],
            [[3, 6], [2, 4], [0, 0], [1, 2]],
            [[10, 2], [7, 14], [1, 2], [0, 0]]
        ],
        "dimensions": [
            { "name": "Demand", "demands": [0, 100, 20, 60], "capacity": 100 }
        ]
    }"#;

    #[test]
    fn test_build_and_solve() {
        let config = ProblemConfig::from_json(ABCD).expect("valid json");
        let model = config.build_model().expect("valid model");
        assert_eq!(model.num_locations(), 4);
        assert_eq!(model.num_vehicles(), 2);

        let dim = model.dimension("Demand").expect("registered");
        assert_eq!(dim.slack_max(), 0);
        assert!(dim.fix_start_cumul_to_zero());
        assert_eq!(dim.charge(), DemandCharge::OnArrival);

        let solution = model.solve(&config.search_parameters()).expect("feasible");
        let text = solution.report(&config.names()).to_string();
        assert!(text.starts_with("Total cost: 20\n"));
    }

    #[test]
    fn test_per_vehicle_capacity_and_search() {
        let json = r#"{
            "num_vehicles": 2,
            "costs": [[[0, 0], [1, 1]], [[1, 1], [0, 0]]],
            "dimensions": [
                { "name": "Load", "demands": [0, 5], "capacity": [4, 6], "charge": "on_departure" }
            ],
            "search": {
                "first_solution": "cheapest_insertion",
                "metaheuristic": { "kind": "iterated_local_search", "perturbations": 2, "strength": 1 },
                "max_moves": 50,
                "threads": 0,
                "operators": ["relocate", "cross_exchange"]
            }
        }"#;
        let config = ProblemConfig::from_json(json).expect("valid json");
        let model = config.build_model().expect("valid model");
        let dim = model.dimension("Load").expect("registered");
        assert_eq!(dim.capacity(0), 4);
        assert_eq!(dim.capacity(1), 6);
        assert_eq!(dim.charge(), DemandCharge::OnDeparture);

        let params = config.search_parameters();
        assert_eq!(params.first_solution, FirstSolutionStrategy::CheapestInsertion);
        assert_eq!(params.threads, Threads::Auto);
        assert_eq!(params.terminations, vec![Termination::Moves(50)]);
        assert_eq!(
            params.operators,
            vec![LocalSearchOperator::Relocate, LocalSearchOperator::CrossExchange]
        );
        assert_eq!(config.names(), vec!["0".to_string(), "1".to_string()]);

        let solution = model.solve(&params).expect("feasible");
        assert_eq!(solution.route(1).map(|r| r.stops()), Some(&[1][..]));
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let json = r#"{ "num_vehicles": 1, "costs": [[[0]]], "vehicles": 3 }"#;
        assert!(matches!(
            ProblemConfig::from_json(json),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_vehicle_count_mismatch() {
        let json = r#"{ "num_vehicles": 2, "costs": [[[0]]] }"#;
        let config = ProblemConfig::from_json(json).expect("valid json");
        assert!(matches!(
            config.build_model(),
            Err(ConfigError::Model(ModelError::CostShape(_)))
        ));
    }

    #[test]
    fn test_name_count_mismatch() {
        let json = r#"{ "location_names": ["A", "B"], "num_vehicles": 1, "costs": [[[0]]] }"#;
        let config = ProblemConfig::from_json(json).expect("valid json");
        assert!(matches!(
            config.build_model(),
            Err(ConfigError::LocationNames {
                expected: 1,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_model_errors_pass_through() {
        let json = r#"{
            "num_vehicles": 1,
            "costs": [[[0], [1]], [[1], [0]]],
            "dimensions": [{ "name": "Demand", "demands": [3, 1], "capacity": 5 }]
        }"#;
        let config = ProblemConfig::from_json(json).expect("valid json");
        assert!(matches!(
            config.build_model(),
            Err(ConfigError::Model(ModelError::NonZeroDepotDemand { .. }))
        ));
    }

    #[test]
    fn test_from_reader() {
        let config = ProblemConfig::from_reader(ABCD.as_bytes()).expect("valid json");
        assert_eq!(config.num_vehicles, 2);
    }
}
