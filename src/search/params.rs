use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::local_search::LocalSearchOperator;

use super::CancellationToken;

/// How the first feasible assignment is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstSolutionStrategy {
    /// Extend each vehicle's route with the cheapest feasible arc until no
    /// arc fits, then close it.
    #[default]
    PathCheapestArc,
    /// Insert each location at its cheapest feasible vehicle and position,
    /// taking first the location that would lose most by missing its best
    /// vehicle (regret-2).
    CheapestInsertion,
}

/// What happens after the first local optimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Metaheuristic {
    /// Stop at the first local optimum.
    #[default]
    GreedyDescent,
    /// Perturb the best assignment with `strength` random relocations and
    /// descend again, `perturbations` times, keeping strict improvements.
    IteratedLocalSearch { perturbations: usize, strength: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Termination {
    /// Stop after this many applied improving moves.
    Moves(usize),
    /// Stop once this much wall-clock time has passed since the solve began.
    Duration(Duration),
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Threads {
    #[default]
    Single,
    Auto,
    Multi(usize),
}

impl Threads {
    pub fn number_of_threads(&self) -> usize {
        match self {
            Threads::Single => 1,
            Threads::Multi(num) => *num,
            Threads::Auto => std::thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SearchParameters {
    pub first_solution: FirstSolutionStrategy,
    pub metaheuristic: Metaheuristic,
    pub operators: Vec<LocalSearchOperator>,
    pub terminations: Vec<Termination>,
    /// Seeds the perturbation RNG; equal seeds give equal solutions.
    pub seed: u64,
    /// Threads used to evaluate candidate moves. The result does not depend
    /// on this setting.
    pub threads: Threads,
    /// Search nodes the bin-packing fallback may expand before giving up.
    pub packing_node_limit: usize,
    pub cancellation: Option<CancellationToken>,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            first_solution: FirstSolutionStrategy::default(),
            metaheuristic: Metaheuristic::default(),
            operators: LocalSearchOperator::ALL.to_vec(),
            terminations: vec![Termination::Moves(100_000)],
            seed: 0,
            threads: Threads::Single,
            packing_node_limit: 1_000_000,
            cancellation: None,
        }
    }
}

impl SearchParameters {
    pub fn with_first_solution(mut self, strategy: FirstSolutionStrategy) -> Self {
        self.first_solution = strategy;
        self
    }

    pub fn with_metaheuristic(mut self, metaheuristic: Metaheuristic) -> Self {
        self.metaheuristic = metaheuristic;
        self
    }

    pub fn with_operators(mut self, operators: Vec<LocalSearchOperator>) -> Self {
        self.operators = operators;
        self
    }

    /// Adds a wall-clock limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.terminations.push(Termination::Duration(limit));
        self
    }

    /// Replaces any move limit with `moves`.
    pub fn with_move_limit(mut self, moves: usize) -> Self {
        self.terminations
            .retain(|t| !matches!(t, Termination::Moves(_)));
        self.terminations.push(Termination::Moves(moves));
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_threads(mut self, threads: Threads) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_packing_node_limit(mut self, limit: usize) -> Self {
        self.packing_node_limit = limit;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}
