//! Solve results.
//!
//! - [`Assignment`] — successor values of every next variable
//! - [`VehicleRoute`] — one vehicle's route, cost and loads
//! - [`Solution`] — objective, routes, search status and statistics

mod assignment;
mod report;
mod route;

pub use assignment::Assignment;
pub use report::SolutionReport;
pub use route::VehicleRoute;

use std::time::Duration;

use serde::Serialize;

use crate::models::RoutingModel;

/// How the search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// No improving move exists in any enabled neighborhood.
    LocalOptimum,
    /// A move budget, time limit, or cancellation stopped the search early.
    /// The assignment is feasible but not certified locally optimal.
    BudgetExhausted,
}

/// Counters collected during one solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Objective of the first feasible assignment.
    pub initial_objective: i64,
    /// Improving moves applied.
    pub moves: usize,
    /// Perturbation rounds run by iterated local search.
    pub perturbations: usize,
    /// Wall-clock time spent solving.
    pub elapsed: Duration,
}

/// A feasible assignment with its per-vehicle breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct Solution {
    objective: i64,
    routes: Vec<VehicleRoute>,
    status: SearchStatus,
    stats: SearchStats,
    #[serde(skip)]
    assignment: Assignment,
}

impl Solution {
    pub(crate) fn new(
        model: &RoutingModel,
        assignment: Assignment,
        status: SearchStatus,
        stats: SearchStats,
    ) -> Self {
        let routes: Vec<VehicleRoute> = (0..model.num_vehicles())
            .map(|vehicle| VehicleRoute::extract(model, &assignment, vehicle))
            .collect();
        debug_assert_eq!(
            routes.iter().map(VehicleRoute::cost).sum::<i64>(),
            assignment.objective_value()
        );

        Self {
            objective: assignment.objective_value(),
            routes,
            status,
            stats,
            assignment,
        }
    }

    /// Total cost summed over vehicles.
    pub fn objective(&self) -> i64 {
        self.objective
    }

    /// One route per vehicle, in vehicle order.
    pub fn routes(&self) -> &[VehicleRoute] {
        &self.routes
    }

    pub fn route(&self, vehicle: usize) -> Option<&VehicleRoute> {
        self.routes.get(vehicle)
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Number of vehicles that leave the depot.
    pub fn num_used_vehicles(&self) -> usize {
        self.routes.iter().filter(|r| !r.is_empty()).count()
    }

    /// Text report using `names[location]` for location labels.
    pub fn report<'a, S: AsRef<str>>(&'a self, names: &'a [S]) -> SolutionReport<'a, S> {
        SolutionReport::new(self, names)
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&SolutionReport::<String>::new(self, &[]), f)
    }
}
