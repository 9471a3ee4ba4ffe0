//! One simple path per vehicle, from its start marker to its end marker.

use crate::graph::{NodeIndex, RouteGraph};

use super::{Violation, ViolationType};

/// Follows `vehicle`'s chain and returns the visited locations.
///
/// Returns `None` if the chain revisits a node, enters another vehicle's
/// marker, or fails to terminate.
pub fn walk_route(graph: &RouteGraph, nexts: &[NodeIndex], vehicle: usize) -> Option<Vec<usize>> {
    let end = graph.end(vehicle);
    let mut seen = vec![false; graph.num_visits()];
    let mut stops = Vec::new();
    let mut index = nexts[graph.start(vehicle).get()];

    while index != end {
        if !graph.is_visit(index) || seen[index.get()] {
            return None;
        }
        seen[index.get()] = true;
        stops.push(graph.index_to_location(index));
        index = nexts[index.get()];
    }

    Some(stops)
}

/// Checks that every vehicle's chain is a simple path to its own end, and
/// that no visit node sits on a cycle detached from all starts.
pub fn check_paths(graph: &RouteGraph, nexts: &[NodeIndex]) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut reached = vec![false; graph.num_visits()];

    for vehicle in 0..graph.num_vehicles() {
        match walk_route(graph, nexts, vehicle) {
            Some(stops) => {
                for location in stops {
                    if let Some(index) = graph.location_to_index(location) {
                        reached[index.get()] = true;
                    }
                }
            }
            None => violations.push(Violation::new(ViolationType::BrokenPath { vehicle })),
        }
    }

    violations.extend(
        reached
            .iter()
            .enumerate()
            .filter(|(_, &r)| !r)
            .map(|(index, _)| {
                Violation::new(ViolationType::DetachedCycle {
                    location: graph.index_to_location(NodeIndex::new(index)),
                })
            }),
    );

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_route() {
        let g = RouteGraph::new(4, 2);
        // v0: start -> 3 -> end, v1: start -> 1 -> 2 -> end
        let nexts = vec![
            NodeIndex::new(1),
            g.end(1),
            g.end(0),
            NodeIndex::new(2),
            NodeIndex::new(0),
        ];
        assert_eq!(walk_route(&g, &nexts, 0), Some(vec![3]));
        assert_eq!(walk_route(&g, &nexts, 1), Some(vec![1, 2]));
        assert!(check_paths(&g, &nexts).is_empty());
    }

    #[test]
    fn test_empty_route_is_legal() {
        let g = RouteGraph::new(2, 2);
        let nexts = vec![g.end(0), NodeIndex::new(0), g.end(1)];
        assert_eq!(walk_route(&g, &nexts, 0), Some(vec![1]));
        assert_eq!(walk_route(&g, &nexts, 1), Some(vec![]));
        assert!(check_paths(&g, &nexts).is_empty());
    }

    #[test]
    fn test_wrong_end() {
        let g = RouteGraph::new(2, 2);
        // vehicle 0 ends at vehicle 1's end marker
        let nexts = vec![g.end(1), NodeIndex::new(0), g.end(1)];
        assert_eq!(walk_route(&g, &nexts, 0), None);
        let violations = check_paths(&g, &nexts);
        assert!(violations.contains(&Violation::new(ViolationType::BrokenPath { vehicle: 0 })));
    }

    #[test]
    fn test_cycle_detected() {
        let g = RouteGraph::new(3, 1);
        // start -> end, 1 <-> 2 cycle
        let nexts = vec![NodeIndex::new(1), NodeIndex::new(0), g.end(0)];
        let violations = check_paths(&g, &nexts);
        assert_eq!(violations.len(), 2);
        assert!(violations
            .iter()
            .all(|v| matches!(v.kind, ViolationType::DetachedCycle { .. })));
    }
}
