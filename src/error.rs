//! Error types for model construction, solving, and configuration.

use thiserror::Error;

/// Invalid input detected while building a [`RoutingModel`](crate::models::RoutingModel).
///
/// These are reported before any search starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("instance must contain at least one location (the depot)")]
    EmptyInstance,
    #[error("fleet must contain at least one vehicle")]
    NoVehicles,
    #[error("negative cost {cost} from location {from} to {to} for vehicle {vehicle}")]
    NegativeCost {
        from: usize,
        to: usize,
        vehicle: usize,
        cost: i64,
    },
    #[error("cost of staying at location {location} must be zero for vehicle {vehicle}, got {cost}")]
    NonZeroSelfCost {
        location: usize,
        vehicle: usize,
        cost: i64,
    },
    #[error("arc cost {max_cost} summed over {arcs} arcs overflows a 64-bit total")]
    CostOverflow { max_cost: i64, arcs: usize },
    #[error("malformed cost matrix: {0}")]
    CostShape(String),
    #[error("negative demand {demand} at location {location} in dimension '{dimension}'")]
    NegativeDemand {
        dimension: String,
        location: usize,
        demand: i64,
    },
    #[error("depot demand must be zero in dimension '{dimension}', got {demand}")]
    NonZeroDepotDemand { dimension: String, demand: i64 },
    #[error("dimension '{dimension}' has {actual} demands for {expected} locations")]
    DemandLength {
        dimension: String,
        expected: usize,
        actual: usize,
    },
    #[error("capacity of vehicle {vehicle} in dimension '{dimension}' must be positive, got {capacity}")]
    NonPositiveCapacity {
        dimension: String,
        vehicle: usize,
        capacity: i64,
    },
    #[error("dimension '{dimension}' lists {actual} capacities for {expected} vehicles")]
    CapacityLength {
        dimension: String,
        expected: usize,
        actual: usize,
    },
    #[error("total {quantity} of dimension '{dimension}' overflows a 64-bit total")]
    QuantityOverflow {
        dimension: String,
        quantity: &'static str,
    },
    #[error("slack bound of dimension '{dimension}' must be non-negative, got {slack_max}")]
    NegativeSlack { dimension: String, slack_max: i64 },
    #[error("dimension '{0}' is already registered")]
    DuplicateDimension(String),
}

/// Terminal failure of a solve.
///
/// A budget cut that happens after a feasible assignment exists is not an
/// error: the solver returns that assignment flagged with
/// [`SearchStatus::BudgetExhausted`](crate::solution::SearchStatus::BudgetExhausted).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveError {
    /// No partition of the locations satisfies the capacity constraints.
    #[error("no solution found")]
    NoSolution,
    /// The budget ran out before any feasible assignment was found.
    #[error("search budget exhausted before a feasible assignment was found")]
    BudgetExhausted,
}

/// Failure to turn a JSON problem description into a model.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse problem configuration")]
    Json(#[from] serde_json::Error),
    #[error("failed to read problem configuration")]
    Io(#[from] std::io::Error),
    #[error("{actual} location names given for {expected} locations")]
    LocationNames { expected: usize, actual: usize },
    #[error(transparent)]
    Model(#[from] ModelError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_error_messages() {
        let err = ModelError::NonZeroDepotDemand {
            dimension: "Demand".into(),
            demand: 3,
        };
        assert_eq!(
            err.to_string(),
            "depot demand must be zero in dimension 'Demand', got 3"
        );
        assert_eq!(
            ModelError::EmptyInstance.to_string(),
            "instance must contain at least one location (the depot)"
        );
    }

    #[test]
    fn test_solve_errors_are_distinct() {
        assert_ne!(SolveError::NoSolution, SolveError::BudgetExhausted);
        assert_eq!(SolveError::NoSolution.to_string(), "no solution found");
    }

    #[test]
    fn test_config_error_wraps_model_error() {
        let err: ConfigError = ModelError::NoVehicles.into();
        assert!(matches!(err, ConfigError::Model(ModelError::NoVehicles)));
        assert_eq!(err.to_string(), "fleet must contain at least one vehicle");
    }
}
