//! Exact multi-dimensional bin packing of locations into vehicles.
//!
//! Used when greedy construction strands locations. Depth-first search
//! places locations in decreasing demand order and prunes with:
//!
//! - remaining demand against remaining capacity, per dimension
//! - bins whose remaining capacity equals one already tried at this depth
//!
//! Routing costs are ignored; the caller orders each bin afterwards.

use std::cmp::Reverse;

use tracing::debug;

use crate::models::RoutingModel;

use super::Budget;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Packing {
    /// `bins[v]` lists the locations assigned to vehicle `v`.
    Packed(Vec<Vec<usize>>),
    /// No assignment respects every capacity.
    Infeasible,
    /// The node limit or the budget ran out first.
    Undecided,
}

struct Interrupted;

struct Packer<'a> {
    items: Vec<usize>,
    demands: Vec<Vec<i64>>,
    /// `suffix[k][d]`: demand of `items[k..]` in dimension `d`.
    suffix: Vec<Vec<i64>>,
    node_limit: usize,
    nodes: usize,
    budget: &'a Budget,
}

pub(crate) fn pack(model: &RoutingModel, node_limit: usize, budget: &Budget) -> Packing {
    let dims = model.dimensions();
    let demand_of = |loc: usize| -> Vec<i64> { dims.iter().map(|d| d.demand(loc)).collect() };

    let mut items: Vec<usize> = (1..model.num_locations()).collect();
    items.sort_by_key(|&loc| (Reverse(demand_of(loc)), loc));
    let demands: Vec<Vec<i64>> = items.iter().map(|&loc| demand_of(loc)).collect();

    let mut suffix = vec![vec![0; dims.len()]; items.len() + 1];
    for k in (0..items.len()).rev() {
        for d in 0..dims.len() {
            suffix[k][d] = suffix[k + 1][d] + demands[k][d];
        }
    }

    let mut remaining: Vec<Vec<i64>> = (0..model.num_vehicles())
        .map(|v| dims.iter().map(|d| d.capacity(v)).collect())
        .collect();
    let mut bins = vec![Vec::new(); model.num_vehicles()];

    let mut packer = Packer {
        items,
        demands,
        suffix,
        node_limit,
        nodes: 0,
        budget,
    };
    let result = packer.place(0, &mut remaining, &mut bins);
    debug!(nodes = packer.nodes, "bin packing finished");
    match result {
        Ok(true) => Packing::Packed(bins),
        Ok(false) => Packing::Infeasible,
        Err(Interrupted) => Packing::Undecided,
    }
}

impl Packer<'_> {
    fn place(
        &mut self,
        k: usize,
        remaining: &mut [Vec<i64>],
        bins: &mut [Vec<usize>],
    ) -> Result<bool, Interrupted> {
        if k == self.items.len() {
            return Ok(true);
        }
        self.nodes += 1;
        if self.nodes > self.node_limit || self.budget.interrupted() {
            return Err(Interrupted);
        }

        let dims = self.suffix[k].len();
        let bound_ok = (0..dims).all(|d| {
            let free: i64 = remaining.iter().map(|r| r[d]).sum();
            self.suffix[k][d] <= free
        });
        if !bound_ok {
            return Ok(false);
        }

        let mut tried: Vec<Vec<i64>> = Vec::new();
        for v in 0..remaining.len() {
            let fits = remaining[v]
                .iter()
                .zip(&self.demands[k])
                .all(|(free, demand)| demand <= free);
            if !fits || tried.contains(&remaining[v]) {
                continue;
            }
            tried.push(remaining[v].clone());

            for (free, demand) in remaining[v].iter_mut().zip(&self.demands[k]) {
                *free -= demand;
            }
            bins[v].push(self.items[k]);

            if self.place(k + 1, remaining, bins)? {
                return Ok(true);
            }

            bins[v].pop();
            for (free, demand) in remaining[v].iter_mut().zip(&self.demands[k]) {
                *free += demand;
            }
        }
        Ok(false)
    }
}
