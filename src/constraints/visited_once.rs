//! Each visit node is entered exactly once across the fleet.

use crate::graph::{NodeIndex, RouteGraph};

use super::{Violation, ViolationType};

/// Counts predecessors of every visit node.
///
/// Together with one successor per node this makes the successor relation a
/// bijection on visit nodes.
pub fn check_visited_once(graph: &RouteGraph, nexts: &[NodeIndex]) -> Vec<Violation> {
    let mut predecessors = vec![0usize; graph.num_visits()];
    for &next in &nexts[..graph.size()] {
        if graph.is_visit(next) {
            predecessors[next.get()] += 1;
        }
    }

    predecessors
        .iter()
        .enumerate()
        .filter_map(|(index, &count)| {
            let location = graph.index_to_location(NodeIndex::new(index));
            match count {
                1 => None,
                0 => Some(Violation::new(ViolationType::NotVisited { location })),
                _ => Some(Violation::new(ViolationType::VisitedTwice { location })),
            }
        })
        .collect()
}
