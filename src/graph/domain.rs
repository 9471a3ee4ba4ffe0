//! Bitset domains of the successor variables.

use fixedbitset::FixedBitSet;

use super::{NodeIndex, RouteGraph};

/// Candidate successors of every next variable.
///
/// Initial domains:
///
/// - a start marker may go to any visit node or to its own end marker
/// - a visit node may go to any other visit node or to any end marker
///
/// Propagation only removes values; binding a variable shrinks its domain
/// to a single value.
#[derive(Debug, Clone)]
pub struct Domains {
    sets: Vec<FixedBitSet>,
}

impl Domains {
    /// Initial domains for `graph`.
    pub fn new(graph: &RouteGraph) -> Self {
        let universe = graph.num_indices();
        let mut visits = FixedBitSet::with_capacity(universe);
        visits.insert_range(0..graph.num_visits());

        let sets = (0..graph.size())
            .map(NodeIndex::new)
            .map(|index| {
                let mut set = visits.clone();
                match graph.vehicle_of(index) {
                    Some(vehicle) => set.insert(graph.end(vehicle).get()),
                    None => {
                        set.set(index.get(), false);
                        set.insert_range(graph.size()..universe);
                    }
                }
                set
            })
            .collect();

        Self { sets }
    }

    pub fn contains(&self, var: NodeIndex, value: NodeIndex) -> bool {
        self.sets[var.get()].contains(value.get())
    }

    pub fn remove(&mut self, var: NodeIndex, value: NodeIndex) {
        self.sets[var.get()].set(value.get(), false);
    }

    /// Removes `value` from every domain except `keep`'s (all-different).
    pub fn remove_value_everywhere(&mut self, value: NodeIndex, keep: NodeIndex) {
        for (index, set) in self.sets.iter_mut().enumerate() {
            if index != keep.get() {
                set.set(value.get(), false);
            }
        }
    }

    /// Fixes `var` to `value`.
    pub fn bind(&mut self, var: NodeIndex, value: NodeIndex) {
        let set = &mut self.sets[var.get()];
        set.clear();
        set.insert(value.get());
    }

    pub fn is_bound(&self, var: NodeIndex) -> bool {
        self.sets[var.get()].count_ones(..) == 1
    }

    pub fn is_empty(&self, var: NodeIndex) -> bool {
        self.sets[var.get()].count_ones(..) == 0
    }

    /// Remaining values of `var` in index order.
    pub fn candidates(&self, var: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.sets[var.get()].ones().map(NodeIndex::new)
    }
}
