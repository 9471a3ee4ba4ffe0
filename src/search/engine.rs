use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info, instrument, warn, Level};

use crate::error::SolveError;
use crate::local_search::best_move;
use crate::models::RoutingModel;
use crate::solution::{Assignment, SearchStats, SearchStatus, Solution};

use super::construction::initial_routes;
use super::perturbation::perturb;
use super::{Budget, Metaheuristic, RouteState, SearchParameters};

/// Runs construction, descent and the configured metaheuristic over one model.
pub struct Solver<'a> {
    model: &'a RoutingModel,
    params: SearchParameters,
}

impl<'a> Solver<'a> {
    pub fn new(model: &'a RoutingModel, params: SearchParameters) -> Self {
        Self { model, params }
    }

    /// Solves the model.
    ///
    /// # Errors
    ///
    /// - [`SolveError::NoSolution`] if no feasible assignment exists
    /// - [`SolveError::BudgetExhausted`] if the budget ran out before any
    ///   feasible assignment was found
    #[instrument(skip_all, level = Level::DEBUG)]
    pub fn solve(&self) -> Result<Solution, SolveError> {
        let started = Instant::now();
        let mut budget = Budget::new(
            started,
            &self.params.terminations,
            self.params.cancellation.clone(),
        );
        info!(
            locations = self.model.num_locations(),
            vehicles = self.model.num_vehicles(),
            dimensions = self.model.dimensions().len(),
            "solving routing model"
        );

        let mut state = initial_routes(self.model, &self.params, &budget)?;
        let mut stats = SearchStats {
            initial_objective: state.total_cost(),
            ..SearchStats::default()
        };
        info!(objective = stats.initial_objective, "first solution built");

        let pool = self.thread_pool();
        let mut status = self.descend(&mut state, &mut budget, &mut stats, pool.as_ref());

        if let Metaheuristic::IteratedLocalSearch {
            perturbations,
            strength,
        } = self.params.metaheuristic
        {
            let mut rng = StdRng::seed_from_u64(self.params.seed);
            for round in 0..perturbations {
                if budget.is_exhausted() {
                    status = SearchStatus::BudgetExhausted;
                    break;
                }
                let mut candidate = state.clone();
                let applied = perturb(self.model, &mut candidate, strength, &mut rng);
                stats.perturbations += 1;
                debug!(round, applied, "perturbed");
                let candidate_status =
                    self.descend(&mut candidate, &mut budget, &mut stats, pool.as_ref());

                if candidate.total_cost() < state.total_cost() {
                    debug!(round, objective = candidate.total_cost(), "new best");
                    state = candidate;
                    status = candidate_status;
                }
            }
        }

        stats.elapsed = started.elapsed();
        let assignment = Assignment::from_routes(self.model, state.routes());
        debug_assert!(self.model.validate(&assignment).is_empty());
        info!(
            objective = assignment.objective_value(),
            moves = stats.moves,
            ?status,
            "search finished"
        );
        Ok(Solution::new(self.model, assignment, status, stats))
    }

    /// Best-improvement descent until no enabled operator improves or the
    /// budget runs out.
    fn descend(
        &self,
        state: &mut RouteState,
        budget: &mut Budget,
        stats: &mut SearchStats,
        pool: Option<&ThreadPool>,
    ) -> SearchStatus {
        loop {
            if budget.is_exhausted() {
                return SearchStatus::BudgetExhausted;
            }
            let Some((mv, delta)) = best_move(self.model, state, &self.params.operators, pool)
            else {
                return SearchStatus::LocalOptimum;
            };
            debug!(?mv, delta, "applying move");
            state.apply(self.model, &mv);
            budget.record_move();
            stats.moves += 1;
        }
    }

    fn thread_pool(&self) -> Option<ThreadPool> {
        let threads = self.params.threads.number_of_threads();
        if threads <= 1 {
            return None;
        }
        match ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => Some(pool),
            Err(err) => {
                warn!(%err, "failed to build thread pool, evaluating moves sequentially");
                None
            }
        }
    }
}
