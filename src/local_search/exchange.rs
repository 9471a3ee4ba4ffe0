//! Inter-route tail exchange (2-opt*).
//!
//! # Algorithm
//!
//! Given routes R1 = [a₁, ..., aᵢ, aᵢ₊₁, ..., aₙ] and
//! R2 = [b₁, ..., bⱼ, bⱼ₊₁, ..., bₘ], produces:
//!
//! R1' = [a₁, ..., aᵢ, bⱼ₊₁, ..., bₘ]
//! R2' = [b₁, ..., bⱼ, aᵢ₊₁, ..., aₙ]
//!
//! Cuts range over `0..=n` and `0..=m`, so a full route swap between two
//! vehicles (both cuts at 0) and handing a tail to an idle vehicle are both
//! part of the neighborhood. Since each vehicle has its own cost function,
//! both new routes are repriced in full.
//!
//! # Complexity
//!
//! O(n × m) candidates per route pair, O(n + m) per evaluation.
//!
//! # Reference
//!
//! Potvin, J.-Y. & Rousseau, J.-M. (1995). "An Exchange Heuristic for
//! Routeing Problems with Time Windows", *Journal of the Operational Research
//! Society* 46(12), 1433-1446.

use crate::models::RoutingModel;
use crate::search::RouteState;

/// Exchange `routes[first_vehicle][first_cut..]` with
/// `routes[second_vehicle][second_cut..]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossExchangeMove {
    pub first_vehicle: usize,
    pub first_cut: usize,
    pub second_vehicle: usize,
    pub second_cut: usize,
}

impl CrossExchangeMove {
    pub(crate) fn generate(state: &RouteState, out: &mut Vec<CrossExchangeMove>) {
        let num_vehicles = state.num_vehicles();
        for first_vehicle in 0..num_vehicles {
            let n1 = state.route(first_vehicle).len();
            for second_vehicle in (first_vehicle + 1)..num_vehicles {
                let n2 = state.route(second_vehicle).len();
                for first_cut in 0..=n1 {
                    out.extend(
                        (0..=n2)
                            // both tails empty
                            .filter(|&second_cut| first_cut < n1 || second_cut < n2)
                            .map(|second_cut| CrossExchangeMove {
                                first_vehicle,
                                first_cut,
                                second_vehicle,
                                second_cut,
                            }),
                    );
                }
            }
        }
    }

    pub(crate) fn delta(&self, model: &RoutingModel, state: &RouteState) -> Option<i64> {
        let r1 = state.route(self.first_vehicle);
        let r2 = state.route(self.second_vehicle);
        let (head1, tail1) = r1.split_at(self.first_cut);
        let (head2, tail2) = r2.split_at(self.second_cut);

        if !state.fits_exchange(model, self.first_vehicle, tail1, tail2)
            || !state.fits_exchange(model, self.second_vehicle, tail2, tail1)
        {
            return None;
        }

        let new1 = model
            .vehicle_cost(self.first_vehicle)
            .path_cost(head1.iter().chain(tail2).copied());
        let new2 = model
            .vehicle_cost(self.second_vehicle)
            .path_cost(head2.iter().chain(tail1).copied());
        Some(new1 + new2 - state.cost(self.first_vehicle) - state.cost(self.second_vehicle))
    }

    pub(crate) fn apply(&self, routes: &mut [Vec<usize>]) {
        let tail1 = routes[self.first_vehicle].split_off(self.first_cut);
        let tail2 = routes[self.second_vehicle].split_off(self.second_cut);
        routes[self.first_vehicle].extend(tail2);
        routes[self.second_vehicle].extend(tail1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::CapacityDimension;
    use crate::local_search::Move;
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
    fn test_full_route_swap_between_vehicles() {
        let model = abcd();
        let state = RouteState::new(&model, vec![vec![2, 3], vec![1]]);
        assert_eq!(state.total_cost(), 34);

        let mv = CrossExchangeMove {
            first_vehicle: 0,
            first_cut: 0,
            second_vehicle: 1,
            second_cut: 0,
        };
        assert_eq!(mv.delta(&model, &state), Some(-14));

        let mut moved = state.clone();
        moved.apply(&model, &Move::CrossExchange(mv));
        assert_eq!(moved.route(0), &[1]);
        assert_eq!(moved.route(1), &[2, 3]);
        assert_eq!(moved.total_cost(), 20);
    }

    #[test]
    fn test_capacity_rejects_overloaded_tail() {
        let model = abcd();
        let state = RouteState::new(&model, vec![vec![2, 3], vec![1]]);
        // vehicle 1 would carry 100 + 60
        let mv = CrossExchangeMove {
            first_vehicle: 0,
            first_cut: 1,
            second_vehicle: 1,
            second_cut: 1,
        };
        assert_eq!(mv.delta(&model, &state), None);
    }

    #[test]
    fn test_generate_skips_identity() {
        let model = abcd();
        let state = RouteState::new(&model, vec![vec![2, 3], vec![1]]);
        let mut moves = Vec::new();
        CrossExchangeMove::generate(&state, &mut moves);
        assert_eq!(moves.len(), 3 * 2 - 1);
        assert!(!moves.contains(&CrossExchangeMove {
            first_vehicle: 0,
            first_cut: 2,
            second_vehicle: 1,
            second_cut: 1,
        }));
    }
}
