//! Exhaustive maximum-common-subgraph search.
//!
//! Subset sizes shrink from the smaller graph's node count down to one. For
//! each size the node subsets of the smaller graph are enumerated in
//! lexicographic order, and for each of them the subsets of the larger graph
//! in the same order; the first pair of isomorphic induced subgraphs wins.

use super::{
    graph::{AdjacencyView, InducedSubgraph, ReducedGraph},
    matcher::are_isomorphic,
};

/// `k`-element subsets of `0..n` in lexicographic order.
#[derive(Clone, Debug)]
pub(crate) struct Combinations {
    n: usize,
    indices: Vec<usize>,
    started: bool,
    exhausted: bool,
}

impl Combinations {
    pub(crate) fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            started: false,
            exhausted: k > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.indices.clone());
        }
        let k = self.indices.len();
        let Some(pivot) = (0..k).rev().find(|&i| self.indices[i] != i + self.n - k) else {
            self.exhausted = true;
            return None;
        };
        self.indices[pivot] += 1;
        for i in pivot + 1..k {
            self.indices[i] = self.indices[i - 1] + 1;
        }
        Some(self.indices.clone())
    }
}

/// Matching node sets of the first common subgraph found at `size`, or `None`.
pub(crate) fn search_at_size(
    smaller: &ReducedGraph,
    larger: &ReducedGraph,
    size: usize,
    pairs_examined: &mut u64,
) -> Option<(Vec<usize>, Vec<usize>)> {
    for small_nodes in Combinations::new(smaller.node_count(), size) {
        let small_view = InducedSubgraph::new(smaller, &small_nodes);
        let small_edges = small_view.edge_count();
        for large_nodes in Combinations::new(larger.node_count(), size) {
            *pairs_examined += 1;
            let large_view = InducedSubgraph::new(larger, &large_nodes);
            if large_view.edge_count() == small_edges && are_isomorphic(&small_view, &large_view) {
                return Some((small_nodes, large_nodes));
            }
        }
    }
    None
}
