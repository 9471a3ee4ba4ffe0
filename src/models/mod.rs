//! Problem data for heterogeneous-cost capacitated routing.
//!
//! Provides the cost and demand providers, their dense materializations,
//! and the [`RoutingModel`] that validates and owns them.

mod cost;
mod demand;
mod problem;

pub use cost::{CostMatrix, CostProvider, VehicleCost};
pub use demand::{DemandProvider, Demands};
pub use problem::RoutingModel;

/// Location index of the depot shared by every vehicle.
pub const DEPOT: usize = 0;
