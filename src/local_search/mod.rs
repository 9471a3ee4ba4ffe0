//! Local search neighborhoods over per-vehicle routes.
//!
//! - [`relocate`] — Move one location, within a route or to another vehicle
//! - [`swap`] — Exchange two locations
//! - [`two_opt`] — Intra-route segment reversal
//! - [`or_opt`] — Intra-route relocation of 2-3 location chains
//! - [`exchange`] — Inter-route tail exchange (2-opt*)
//!
//! Every move is priced with the cost function of the vehicle that would
//! drive each affected arc. A move whose delta is `None` would overload a
//! vehicle in some capacity dimension.

mod exchange;
mod or_opt;
mod relocate;
mod swap;
mod two_opt;

pub use exchange::CrossExchangeMove;
pub use or_opt::{OrOptMove, SEGMENT_LENGTHS};
pub use relocate::RelocateMove;
pub use swap::SwapMove;
pub use two_opt::TwoOptMove;

use rayon::prelude::*;
use rayon::ThreadPool;
use serde::{Deserialize, Serialize};

use crate::models::{RoutingModel, DEPOT};
use crate::search::RouteState;

/// Neighborhoods available to the descent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalSearchOperator {
    Relocate,
    Swap,
    TwoOpt,
    OrOpt,
    CrossExchange,
}

impl LocalSearchOperator {
    pub const ALL: [LocalSearchOperator; 5] = [
        LocalSearchOperator::Relocate,
        LocalSearchOperator::Swap,
        LocalSearchOperator::TwoOpt,
        LocalSearchOperator::OrOpt,
        LocalSearchOperator::CrossExchange,
    ];
}

/// A single neighborhood move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Relocate(RelocateMove),
    Swap(SwapMove),
    TwoOpt(TwoOptMove),
    OrOpt(OrOptMove),
    CrossExchange(CrossExchangeMove),
}

impl Move {
    /// Change in total cost, or `None` if the move breaks capacity.
    pub(crate) fn delta(&self, model: &RoutingModel, state: &RouteState) -> Option<i64> {
        match self {
            Move::Relocate(m) => m.delta(model, state),
            Move::Swap(m) => m.delta(model, state),
            Move::TwoOpt(m) => m.delta(model, state),
            Move::OrOpt(m) => m.delta(model, state),
            Move::CrossExchange(m) => m.delta(model, state),
        }
    }

    pub(crate) fn apply(&self, routes: &mut [Vec<usize>]) {
        match self {
            Move::Relocate(m) => m.apply(routes),
            Move::Swap(m) => m.apply(routes),
            Move::TwoOpt(m) => m.apply(routes),
            Move::OrOpt(m) => m.apply(routes),
            Move::CrossExchange(m) => m.apply(routes),
        }
    }

    /// The vehicles whose routes the move rewrites.
    pub(crate) fn vehicles(&self) -> (usize, usize) {
        match *self {
            Move::Relocate(m) => (m.from_vehicle, m.to_vehicle),
            Move::Swap(m) => (m.first_vehicle, m.second_vehicle),
            Move::TwoOpt(m) => (m.vehicle, m.vehicle),
            Move::OrOpt(m) => (m.vehicle, m.vehicle),
            Move::CrossExchange(m) => (m.first_vehicle, m.second_vehicle),
        }
    }
}

/// Appends every candidate move of `operator` for the current routes.
pub(crate) fn generate(operator: LocalSearchOperator, state: &RouteState, out: &mut Vec<Move>) {
    match operator {
        LocalSearchOperator::Relocate => {
            let mut moves = Vec::new();
            RelocateMove::generate(state, &mut moves);
            out.extend(moves.into_iter().map(Move::Relocate));
        }
        LocalSearchOperator::Swap => {
            let mut moves = Vec::new();
            SwapMove::generate(state, &mut moves);
            out.extend(moves.into_iter().map(Move::Swap));
        }
        LocalSearchOperator::TwoOpt => {
            let mut moves = Vec::new();
            TwoOptMove::generate(state, &mut moves);
            out.extend(moves.into_iter().map(Move::TwoOpt));
        }
        LocalSearchOperator::OrOpt => {
            let mut moves = Vec::new();
            OrOptMove::generate(state, &mut moves);
            out.extend(moves.into_iter().map(Move::OrOpt));
        }
        LocalSearchOperator::CrossExchange => {
            let mut moves = Vec::new();
            CrossExchangeMove::generate(state, &mut moves);
            out.extend(moves.into_iter().map(Move::CrossExchange));
        }
    }
}

/// Finds the most improving feasible move across `operators`.
///
/// Ties on delta go to the move generated first, so the result does not
/// depend on whether `pool` is used.
pub(crate) fn best_move(
    model: &RoutingModel,
    state: &RouteState,
    operators: &[LocalSearchOperator],
    pool: Option<&ThreadPool>,
) -> Option<(Move, i64)> {
    let mut candidates = Vec::new();
    for &operator in operators {
        generate(operator, state, &mut candidates);
    }

    let improving = |(i, mv): (usize, &Move)| {
        mv.delta(model, state)
            .filter(|&delta| delta < 0)
            .map(|delta| (delta, i))
    };
    let best = match pool {
        Some(pool) => pool.install(|| {
            candidates
                .par_iter()
                .enumerate()
                .filter_map(improving)
                .min()
        }),
        None => candidates.iter().enumerate().filter_map(improving).min(),
    };
    best.map(|(delta, i)| (candidates[i], delta))
}

/// Location before `route[pos]`, or the depot.
pub(crate) fn before(route: &[usize], pos: usize) -> usize {
    if pos == 0 {
        DEPOT
    } else {
        route[pos - 1]
    }
}

/// Location after `route[pos]`, or the depot.
pub(crate) fn after(route: &[usize], pos: usize) -> usize {
    at_or_depot(route, pos + 1)
}

pub(crate) fn at_or_depot(route: &[usize], pos: usize) -> usize {
    route.get(pos).copied().unwrap_or(DEPOT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::CapacityDimension;
    use crate::models::{CostMatrix, Demands};

    fn abcd() -> RoutingModel {
        let costs = CostMatrix::from_nested(&[
            vec![vec![0, 0], vec![5, 10], vec![3, 6], vec![10, 2]],
            vec![vec![5, 10], vec![0, 0], vec![2, 4], vec![7, 14]],
            vec![vec![3, 6], vec![2, 4], vec![0, 0], vec![1, 2]],
            vec![vec![10, 2], vec![7, 14], vec![1, 2], vec![0, 0]],
        ])
        .expect("valid");
        let mut model = RoutingModel::from_matrix(costs).expect("valid");
        model
            .add_dimension(CapacityDimension::new(
                "Demand",
                Demands::new(vec![0, 100, 20, 60]),
                100,
            ))
            .expect("valid");
        model
    }

    #[test]
    fn test_best_move_finds_route_swap() {
        let model = abcd();
        let state = RouteState::new(&model, vec![vec![2, 3], vec![1]]);
        let (mv, delta) =
            best_move(&model, &state, &LocalSearchOperator::ALL, None).expect("improvement");
        assert_eq!(delta, -14);
        assert_eq!(mv.vehicles(), (0, 1));
    }

    #[test]
    fn test_best_move_same_with_pool() {
        let model = abcd();
        let state = RouteState::new(&model, vec![vec![2, 3], vec![1]]);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(2)
            .build()
            .expect("pool");
        assert_eq!(
            best_move(&model, &state, &LocalSearchOperator::ALL, Some(&pool)),
            best_move(&model, &state, &LocalSearchOperator::ALL, None)
        );
    }

    #[test]
    fn test_no_move_at_optimum() {
        let model = abcd();
        let state = RouteState::new(&model, vec![vec![1], vec![2, 3]]);
        assert_eq!(
            best_move(&model, &state, &LocalSearchOperator::ALL, None),
            None
        );
    }

    #[test]
    fn test_neighbors() {
        let route = [4, 5, 6];
        assert_eq!(before(&route, 0), DEPOT);
        assert_eq!(before(&route, 2), 5);
        assert_eq!(after(&route, 2), DEPOT);
        assert_eq!(after(&route, 0), 5);
        assert_eq!(at_or_depot(&route, 3), DEPOT);
    }

    #[test]
    fn test_generate_all_operators() {
        let model = RoutingModel::from_matrix(CostMatrix::new(5, 2)).expect("valid");
        let state = RouteState::new(&model, vec![vec![1, 2, 3], vec![4]]);
        for operator in LocalSearchOperator::ALL {
            let mut moves = Vec::new();
            generate(operator, &state, &mut moves);
            assert!(!moves.is_empty(), "{operator:?}");
        }
    }
}
