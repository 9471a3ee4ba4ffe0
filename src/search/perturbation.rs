use rand::rngs::StdRng;
use rand::Rng;

use crate::local_search::{Move, RelocateMove};
use crate::models::RoutingModel;

use super::RouteState;

/// Applies up to `strength` random feasible relocations.
///
/// Infeasible draws are skipped, so a tightly loaded fleet may see fewer
/// changes than requested. Returns the number of moves applied.
pub(crate) fn perturb(
    model: &RoutingModel,
    state: &mut RouteState,
    strength: usize,
    rng: &mut StdRng,
) -> usize {
    let num_vehicles = state.num_vehicles();
    let mut applied = 0;
    for _ in 0..strength {
        let stops: Vec<(usize, usize)> = (0..num_vehicles)
            .flat_map(|v| (0..state.route(v).len()).map(move |pos| (v, pos)))
            .collect();
        if stops.is_empty() {
            break;
        }
        let (from_vehicle, from_pos) = stops[rng.random_range(0..stops.len())];
        let to_vehicle = rng.random_range(0..num_vehicles);
        let positions = if to_vehicle == from_vehicle {
            state.route(to_vehicle).len()
        } else {
            state.route(to_vehicle).len() + 1
        };
        let to_pos = rng.random_range(0..positions);
        if to_vehicle == from_vehicle && to_pos == from_pos {
            continue;
        }

        let mv = Move::Relocate(RelocateMove {
            from_vehicle,
            from_pos,
            to_vehicle,
            to_pos,
        });
        if mv.delta(model, state).is_some() {
            state.apply(model, &mv);
            applied += 1;
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::models::CostMatrix;

    #[test]
    fn test_perturb_keeps_every_location() {
        let model = RoutingModel::from_matrix(CostMatrix::new(6, 3)).expect("valid");
        let mut state = RouteState::new(&model, vec![vec![1, 2], vec![3, 4, 5], vec![]]);
        let mut rng = StdRng::seed_from_u64(7);
        perturb(&model, &mut state, 10, &mut rng);

        let mut all: Vec<usize> = state.routes().concat();
        all.sort_unstable();
        assert_eq!(all, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_perturb_is_seeded() {
        let model = RoutingModel::from_matrix(CostMatrix::new(6, 2)).expect("valid");
        let run = |seed| {
            let mut state = RouteState::new(&model, vec![vec![1, 2, 3], vec![4, 5]]);
            let mut rng = StdRng::seed_from_u64(seed);
            perturb(&model, &mut state, 5, &mut rng);
            state
        };
        assert_eq!(run(3), run(3));
    }

    #[test]
    fn test_perturb_without_stops() {
        let model = RoutingModel::from_matrix(CostMatrix::new(1, 2)).expect("valid");
        let mut state = RouteState::new(&model, vec![vec![], vec![]]);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(perturb(&model, &mut state, 4, &mut rng), 0);
    }
}
