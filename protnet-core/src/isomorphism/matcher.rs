//! Exact structural isomorphism by backtracking.
//!
//! Nodes of the left graph are matched in an order that favours nodes with
//! many already-ordered neighbours, so adjacency constraints prune the
//! search early. A candidate pairing must agree on degree and on adjacency
//! to every node matched before it.

use super::graph::AdjacencyView;

/// Returns `true` when `left` and `right` have the same structure.
pub(crate) fn are_isomorphic<A, B>(left: &A, right: &B) -> bool
where
    A: AdjacencyView + ?Sized,
    B: AdjacencyView + ?Sized,
{
    let count = left.node_count();
    if count != right.node_count() {
        return false;
    }
    let left_degrees = left.degrees();
    let right_degrees = right.degrees();
    if !same_degree_sequence(&left_degrees, &right_degrees) {
        return false;
    }

    let order = matching_order(left, &left_degrees);
    let mut state = MatchState {
        order: &order,
        left_degrees: &left_degrees,
        right_degrees: &right_degrees,
        mapping: vec![usize::MAX; count],
        used: vec![false; count],
    };
    state.extend(left, right, 0)
}

/// Compares degree multisets.
pub(crate) fn same_degree_sequence(left: &[usize], right: &[usize]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    let mut left = left.to_vec();
    let mut right = right.to_vec();
    left.sort_unstable();
    right.sort_unstable();
    left == right
}

fn matching_order<A: AdjacencyView + ?Sized>(graph: &A, degrees: &[usize]) -> Vec<usize> {
    let count = graph.node_count();
    let mut order = Vec::with_capacity(count);
    let mut placed = vec![false; count];
    let mut links = vec![0_usize; count];
    for _ in 0..count {
        let next = (0..count)
            .filter(|&node| !placed[node])
            .max_by_key(|&node| (links[node], degrees[node], std::cmp::Reverse(node)));
        let Some(node) = next else { break };
        placed[node] = true;
        order.push(node);
        for other in 0..count {
            if !placed[other] && graph.is_adjacent(node, other) {
                links[other] += 1;
            }
        }
    }
    order
}

struct MatchState<'a> {
    order: &'a [usize],
    left_degrees: &'a [usize],
    right_degrees: &'a [usize],
    mapping: Vec<usize>,
    used: Vec<bool>,
}

impl MatchState<'_> {
    fn extend<A, B>(&mut self, left: &A, right: &B, depth: usize) -> bool
    where
        A: AdjacencyView + ?Sized,
        B: AdjacencyView + ?Sized,
    {
        let Some(&node) = self.order.get(depth) else {
            return true;
        };
        for candidate in 0..self.used.len() {
            if self.used[candidate] || self.right_degrees[candidate] != self.left_degrees[node] {
                continue;
            }
            let consistent = self.order[..depth].iter().all(|&matched| {
                left.is_adjacent(node, matched)
                    == right.is_adjacent(candidate, self.mapping[matched])
            });
            if !consistent {
                continue;
            }
            self.mapping[node] = candidate;
            self.used[candidate] = true;
            if self.extend(left, right, depth + 1) {
                return true;
            }
            self.used[candidate] = false;
            self.mapping[node] = usize::MAX;
        }
        false
    }
}
