//! # u-fleet
//!
//! Capacitated vehicle routing where every vehicle prices arcs with its own
//! cost function. Vehicles share one depot and each must respect its
//! capacity in every registered dimension.
//!
//! ## Modules
//!
//! - [`models`] — Cost providers, demands, and the [`RoutingModel`](models::RoutingModel)
//! - [`graph`] — Node index layout, next variables, and successor domains
//! - [`constraints`] — Capacity dimensions and assignment validation
//! - [`search`] — Construction, descent, and iterated local search
//! - [`local_search`] — Relocate, swap, 2-opt, Or-opt, and 2-opt* neighborhoods
//! - [`solution`] — Assignments, per-vehicle routes, and text reports
//! - [`config`] — JSON problem descriptions
//! - [`error`] — Error types
//!
//! ## Example
//!
//! ```
//! use u_fleet::constraints::CapacityDimension;
//! use u_fleet::models::{CostMatrix, Demands, RoutingModel};
//! use u_fleet::search::SearchParameters;
//!
//! // costs[from][to][vehicle]
//! let costs = CostMatrix::from_nested(&[
//!     vec![vec![0, 0], vec![5, 10], vec![3, 6], vec![10, 2]],
//!     vec![vec![5, 10], vec![0, 0], vec![2, 4], vec![7, 14]],
//!     vec![vec![3, 6], vec![2, 4], vec![0, 0], vec![1, 2]],
//!     vec![vec![10, 2], vec![7, 14], vec![1, 2], vec![0, 0]],
//! ])?;
//! let mut model = RoutingModel::from_matrix(costs)?;
//! model.add_dimension(CapacityDimension::new(
//!     "Demand",
//!     Demands::new(vec![0, 100, 20, 60]),
//!     100,
//! ))?;
//!
//! let solution = model.solve(&SearchParameters::default())?;
//! assert_eq!(solution.objective(), 20);
//! print!("{}", solution.report(&["A", "B", "C", "D"]));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod constraints;
pub mod error;
pub mod graph;
pub mod local_search;
pub mod models;
pub mod search;
pub mod solution;
