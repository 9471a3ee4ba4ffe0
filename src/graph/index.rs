//! Node indices and the start/end topology of the successor model.

use std::fmt;

use crate::models::DEPOT;

/// A node of the successor graph: a visit, or a vehicle's start or end marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The "successor" decision variable owned by a non-end node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NextVar(NodeIndex);

impl NextVar {
    /// The node whose successor this variable holds.
    pub fn owner(self) -> NodeIndex {
        self.0
    }
}

/// Maps locations and vehicles onto the shared node index space.
///
/// Layout for `N` locations and `V` vehicles:
///
/// ```text
/// [0, N-1)          visit node of location i + 1
/// [N-1, N-1+V)      start marker of vehicle v (at the depot)
/// [N-1+V, N-1+2V)   end marker of vehicle v (at the depot)
/// ```
///
/// Every start and end marker maps to location 0, yet each is a distinct
/// index so several vehicles can leave and return to the depot without
/// sharing a variable.
///
/// # Examples
///
/// ```
/// use u_fleet::graph::RouteGraph;
///
/// let graph = RouteGraph::new(4, 2);
/// assert_eq!(graph.size(), 5);
/// assert_ne!(graph.start(0), graph.start(1));
/// assert_eq!(graph.index_to_location(graph.start(1)), 0);
/// assert_eq!(graph.index_to_location(graph.end(0)), 0);
/// assert!(graph.is_end(graph.end(1)));
/// let c = graph.location_to_index(2).unwrap();
/// assert_eq!(graph.index_to_location(c), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGraph {
    num_locations: usize,
    num_vehicles: usize,
}

impl RouteGraph {
    /// Builds the index space. `num_locations` counts the depot.
    pub fn new(num_locations: usize, num_vehicles: usize) -> Self {
        Self {
            num_locations,
            num_vehicles,
        }
    }

    pub fn num_locations(&self) -> usize {
        self.num_locations
    }

    pub fn num_vehicles(&self) -> usize {
        self.num_vehicles
    }

    /// Number of visit nodes (non-depot locations).
    pub fn num_visits(&self) -> usize {
        self.num_locations.saturating_sub(1)
    }

    /// Number of next variables: one per visit node and per start marker.
    pub fn size(&self) -> usize {
        self.num_visits() + self.num_vehicles
    }

    /// Number of node indices, end markers included.
    pub fn num_indices(&self) -> usize {
        self.size() + self.num_vehicles
    }

    /// Start marker of `vehicle`.
    pub fn start(&self, vehicle: usize) -> NodeIndex {
        debug_assert!(vehicle < self.num_vehicles);
        NodeIndex(self.num_visits() + vehicle)
    }

    /// End marker of `vehicle`.
    pub fn end(&self, vehicle: usize) -> NodeIndex {
        debug_assert!(vehicle < self.num_vehicles);
        NodeIndex(self.size() + vehicle)
    }

    pub fn is_visit(&self, index: NodeIndex) -> bool {
        index.0 < self.num_visits()
    }

    pub fn is_start(&self, index: NodeIndex) -> bool {
        (self.num_visits()..self.size()).contains(&index.0)
    }

    pub fn is_end(&self, index: NodeIndex) -> bool {
        (self.size()..self.num_indices()).contains(&index.0)
    }

    /// Vehicle owning a start or end marker; `None` for visit nodes.
    pub fn vehicle_of(&self, index: NodeIndex) -> Option<usize> {
        if self.is_start(index) {
            Some(index.0 - self.num_visits())
        } else if self.is_end(index) {
            Some(index.0 - self.size())
        } else {
            None
        }
    }

    /// The successor variable of `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is an end marker or out of range: routes stop there.
    pub fn next_var(&self, index: NodeIndex) -> NextVar {
        assert!(
            index.0 < self.size(),
            "node {index} has no successor variable"
        );
        NextVar(index)
    }

    /// Location of a node; start and end markers sit at the depot.
    pub fn index_to_location(&self, index: NodeIndex) -> usize {
        if self.is_visit(index) {
            index.0 + 1
        } else {
            DEPOT
        }
    }

    /// Visit node of a location; `None` for the depot or out-of-range locations.
    pub fn location_to_index(&self, location: usize) -> Option<NodeIndex> {
        (location != DEPOT && location < self.num_locations).then(|| NodeIndex(location - 1))
    }

    /// All visit nodes in index order.
    pub fn visit_indices(&self) -> impl Iterator<Item = NodeIndex> {
        (0..self.num_visits()).map(NodeIndex)
    }
}
