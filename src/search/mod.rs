//! Search for a low-cost feasible assignment.
//!
//! A solve runs in three phases:
//!
//! 1. **Construction**: [`FirstSolutionStrategy`] builds a feasible start,
//!    falling back to exact bin packing if greedy choices strand locations.
//! 2. **Descent**: best-improvement local search over the enabled
//!    [`LocalSearchOperator`](crate::local_search::LocalSearchOperator)s.
//! 3. **Metaheuristic**: optionally, seeded iterated local search.
//!
//! [`Termination`]s and a [`CancellationToken`] bound phases 2 and 3; the
//! best feasible assignment found so far is always returned.

mod construction;
mod engine;
mod packing;
mod params;
mod perturbation;
mod state;
mod termination;

pub use engine::Solver;
pub use params::{FirstSolutionStrategy, Metaheuristic, SearchParameters, Termination, Threads};
pub use termination::CancellationToken;

pub(crate) use state::RouteState;
pub(crate) use termination::Budget;
