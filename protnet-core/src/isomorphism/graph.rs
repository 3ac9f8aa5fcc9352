//! Reduced community graphs ("supernetworks").

use std::collections::BTreeMap;

use crate::labeling::Labeling;

use super::IsomorphismError;

/// Undirected weighted edge between two communities, given in original ids.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct CommunityEdge {
    /// Smaller community id.
    pub left: usize,
    /// Larger community id.
    pub right: usize,
    /// Number of base-graph edges joining the two communities.
    pub weight: u64,
}

/// Read-only adjacency over dense node ids `0..node_count`.
pub(crate) trait AdjacencyView {
    fn node_count(&self) -> usize;

    fn is_adjacent(&self, left: usize, right: usize) -> bool;

    fn degrees(&self) -> Vec<usize> {
        let count = self.node_count();
        (0..count)
            .map(|node| {
                (0..count)
                    .filter(|&other| other != node && self.is_adjacent(node, other))
                    .count()
            })
            .collect()
    }

    fn edge_count(&self) -> usize {
        self.degrees().iter().sum::<usize>() / 2
    }
}

/// Community adjacency graph derived from one partition level.
///
/// Communities are relabelled to dense ids `0..n` in ascending order of their
/// original ids. Edge weights are kept for reporting; structural comparisons
/// ignore them.
///
/// # Examples
/// ```
/// use protnet_core::ReducedGraph;
///
/// let graph = ReducedGraph::from_triples(&[(7, 3, 2), (3, 9, 1), (9, 7, 4)])
///     .expect("triples are valid");
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 3);
/// assert_eq!(graph.communities(), &[3, 7, 9]);
/// assert_eq!(graph.triples(), vec![(3, 7, 2), (3, 9, 1), (7, 9, 4)]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReducedGraph {
    communities: Vec<usize>,
    edges: Vec<CommunityEdge>,
    adjacency: Vec<bool>,
}

impl ReducedGraph {
    /// Builds a graph from `(community_a, community_b, weight)` triples.
    ///
    /// Duplicate unordered pairs are merged by summing their weights.
    ///
    /// # Errors
    /// Returns [`IsomorphismError::SelfLoop`] when a triple joins a community
    /// to itself and [`IsomorphismError::ZeroWeight`] for a zero weight.
    pub fn from_triples(triples: &[(usize, usize, u64)]) -> Result<Self, IsomorphismError> {
        Self::with_communities(std::iter::empty(), triples)
    }

    /// Builds a graph holding every community in `communities` plus the
    /// endpoints of `triples`, so isolated communities are kept.
    ///
    /// # Errors
    /// Returns the errors of [`Self::from_triples`].
    pub fn with_communities(
        communities: impl IntoIterator<Item = usize>,
        triples: &[(usize, usize, u64)],
    ) -> Result<Self, IsomorphismError> {
        let mut merged: BTreeMap<(usize, usize), u64> = BTreeMap::new();
        for &(first, second, weight) in triples {
            if first == second {
                return Err(IsomorphismError::SelfLoop { community: first });
            }
            if weight == 0 {
                return Err(IsomorphismError::ZeroWeight {
                    left: first,
                    right: second,
                });
            }
            let slot = merged.entry((first.min(second), first.max(second))).or_insert(0);
            *slot = slot.saturating_add(weight);
        }

        let mut ids: Vec<usize> = communities
            .into_iter()
            .chain(merged.keys().flat_map(|&(left, right)| [left, right]))
            .collect();
        ids.sort_unstable();
        ids.dedup();

        let node_count = ids.len();
        let mut adjacency = vec![false; node_count * node_count];
        let edges: Vec<CommunityEdge> = merged
            .into_iter()
            .map(|((left, right), weight)| CommunityEdge {
                left,
                right,
                weight,
            })
            .collect();
        for edge in &edges {
            // Both endpoints were inserted into `ids` above.
            if let (Ok(left), Ok(right)) = (ids.binary_search(&edge.left), ids.binary_search(&edge.right)) {
                adjacency[left * node_count + right] = true;
                adjacency[right * node_count + left] = true;
            }
        }
        Ok(Self {
            communities: ids,
            edges,
            adjacency,
        })
    }

    /// Counts inter-community edges of a base graph.
    ///
    /// `edges` holds unordered pairs of 1-based base-graph node indices.
    /// Edges inside one community are dropped; every other edge adds one to
    /// the weight of its community pair.
    ///
    /// # Errors
    /// Returns [`IsomorphismError::NodeOutOfRange`] when an endpoint is `0` or
    /// exceeds the labeling length.
    ///
    /// # Examples
    /// ```
    /// use protnet_core::{Labeling, ReducedGraph};
    ///
    /// let labeling = Labeling::try_new(vec![1, 1, 2, 2, 3]).expect("labels are valid");
    /// let graph = ReducedGraph::from_base_edges(
    ///     &[(1, 2), (2, 3), (1, 4), (4, 5), (3, 4)],
    ///     &labeling,
    /// )
    /// .expect("edges are in range");
    /// assert_eq!(graph.triples(), vec![(1, 2, 2), (2, 3, 1)]);
    /// ```
    pub fn from_base_edges(
        edges: &[(usize, usize)],
        labeling: &Labeling,
    ) -> Result<Self, IsomorphismError> {
        let labels = labeling.as_slice();
        let community_of = |index: usize| {
            index
                .checked_sub(1)
                .and_then(|position| labels.get(position))
                .copied()
                .ok_or(IsomorphismError::NodeOutOfRange {
                    index,
                    node_count: labels.len(),
                })
        };
        let mut triples = Vec::new();
        for &(first, second) in edges {
            let (left, right) = (community_of(first)?, community_of(second)?);
            if left != right {
                triples.push((left, right, 1));
            }
        }
        Self::from_triples(&triples)
    }

    /// Number of communities.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.communities.len()
    }

    /// Number of distinct community pairs joined by an edge.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// `true` when the graph holds no communities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.communities.is_empty()
    }

    /// Original community ids, indexed by dense node id.
    #[must_use]
    pub fn communities(&self) -> &[usize] {
        &self.communities
    }

    /// Edges in ascending `(left, right)` order.
    #[must_use]
    pub fn edges(&self) -> &[CommunityEdge] {
        &self.edges
    }

    /// Edges as sorted `(left, right, weight)` triples in original ids.
    #[must_use]
    pub fn triples(&self) -> Vec<(usize, usize, u64)> {
        self.edges
            .iter()
            .map(|edge| (edge.left, edge.right, edge.weight))
            .collect()
    }

    /// Sorted degree sequence, ignoring weights.
    #[must_use]
    pub fn degree_sequence(&self) -> Vec<usize> {
        let mut degrees = AdjacencyView::degrees(self);
        degrees.sort_unstable();
        degrees
    }
}

impl AdjacencyView for ReducedGraph {
    fn node_count(&self) -> usize {
        self.communities.len()
    }

    fn is_adjacent(&self, left: usize, right: usize) -> bool {
        let count = self.communities.len();
        left < count && right < count && self.adjacency[left * count + right]
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Subgraph of `graph` induced by `nodes`, renumbered `0..nodes.len()`.
pub(crate) struct InducedSubgraph<'g, G> {
    graph: &'g G,
    nodes: &'g [usize],
}

impl<'g, G: AdjacencyView> InducedSubgraph<'g, G> {
    pub(crate) fn new(graph: &'g G, nodes: &'g [usize]) -> Self {
        Self { graph, nodes }
    }
}

impl<G: AdjacencyView> AdjacencyView for InducedSubgraph<'_, G> {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn is_adjacent(&self, left: usize, right: usize) -> bool {
        match (self.nodes.get(left), self.nodes.get(right)) {
            (Some(&left), Some(&right)) => self.graph.is_adjacent(left, right),
            _ => false,
        }
    }
}
