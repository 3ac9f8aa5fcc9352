//! Exact and weak isomorphism between reduced community graphs.
//!
//! Exact isomorphism compares structure only: edge weights are ignored and a
//! cheap invariant check (node count, edge count, degree sequence) runs
//! before the backtracking matcher. Weak isomorphism scores two graphs by
//! the size of their maximum common subgraph (MCS) relative to the larger
//! graph. The MCS search is exhaustive and refuses graphs above
//! [`MCS_NODE_LIMIT`] nodes.

mod graph;
mod matcher;
mod mcs;

use thiserror::Error;
use tracing::{Span, debug, instrument, warn};

use crate::error::define_error_codes;

pub use self::graph::{CommunityEdge, ReducedGraph};

use self::{matcher::are_isomorphic, mcs::search_at_size};

/// Largest graph, in nodes, accepted by the MCS search.
pub const MCS_NODE_LIMIT: usize = 35;

/// Similarity a pair must exceed to count as weakly isomorphic.
pub const WEAK_ISOMORPHISM_THRESHOLD: f64 = 0.5;

/// Errors raised while building or comparing reduced graphs.
#[non_exhaustive]
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum IsomorphismError {
    /// A graph exceeded [`MCS_NODE_LIMIT`].
    #[error("graph has {nodes} nodes; the MCS search accepts at most {limit}")]
    GraphTooLarge {
        /// Node count of the offending graph.
        nodes: usize,
        /// The enforced ceiling.
        limit: usize,
    },
    /// A triple joined a community to itself.
    #[error("reduced graphs have no self-loops, but community {community} links to itself")]
    SelfLoop {
        /// The offending community id.
        community: usize,
    },
    /// A triple carried weight zero.
    #[error("edge ({left}, {right}) has zero weight; weights count base edges")]
    ZeroWeight {
        /// First community of the triple.
        left: usize,
        /// Second community of the triple.
        right: usize,
    },
    /// A base edge referenced a node outside the labeling.
    #[error("base edge references node {index}, but nodes are numbered 1..={node_count}")]
    NodeOutOfRange {
        /// The offending 1-based index.
        index: usize,
        /// Number of labelled nodes.
        node_count: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`IsomorphismError`] variants.
    enum IsomorphismErrorCode for IsomorphismError {
        /// A graph exceeded the MCS size ceiling.
        GraphTooLarge => GraphTooLarge { .. } => "ISOMORPHISM_SIZE_LIMIT",
        /// A triple joined a community to itself.
        SelfLoop => SelfLoop { .. } => "ISOMORPHISM_SELF_LOOP",
        /// A triple carried weight zero.
        ZeroWeight => ZeroWeight { .. } => "ISOMORPHISM_ZERO_WEIGHT",
        /// A base edge referenced a node outside the labeling.
        NodeOutOfRange => NodeOutOfRange { .. } => "ISOMORPHISM_NODE_OUT_OF_RANGE",
    }
}

/// Cheap necessary condition for isomorphism: equal node counts, edge
/// counts and degree sequences.
#[must_use]
pub fn could_be_isomorphic(left: &ReducedGraph, right: &ReducedGraph) -> bool {
    left.node_count() == right.node_count()
        && left.edge_count() == right.edge_count()
        && left.degree_sequence() == right.degree_sequence()
}

/// Exact structural isomorphism test; edge weights are ignored.
///
/// # Examples
/// ```
/// use protnet_core::{ReducedGraph, is_isomorphic};
///
/// let path = ReducedGraph::from_triples(&[(1, 2, 1), (2, 3, 5)]).expect("valid");
/// let relabelled = ReducedGraph::from_triples(&[(8, 4, 2), (9, 4, 1)]).expect("valid");
/// let triangle = ReducedGraph::from_triples(&[(1, 2, 1), (2, 3, 1), (1, 3, 1)]).expect("valid");
/// assert!(is_isomorphic(&path, &relabelled));
/// assert!(!is_isomorphic(&path, &triangle));
/// ```
#[must_use]
pub fn is_isomorphic(left: &ReducedGraph, right: &ReducedGraph) -> bool {
    #[cfg(feature = "metrics")]
    metrics::counter!("protnet_isomorphism_checks").increment(1);
    could_be_isomorphic(left, right) && are_isomorphic(left, right)
}

/// Returns the keys of the `corpus` graphs isomorphic to `query`, in corpus
/// order.
#[instrument(name = "isomorphism.find_isomorphs", skip(query, corpus), fields(nodes = query.node_count()))]
pub fn find_isomorphs<'g, K, I>(query: &ReducedGraph, corpus: I) -> Vec<K>
where
    I: IntoIterator<Item = (K, &'g ReducedGraph)>,
{
    let matches: Vec<K> = corpus
        .into_iter()
        .filter_map(|(key, candidate)| is_isomorphic(query, candidate).then_some(key))
        .collect();
    debug!(matches = matches.len(), "isomorph search finished");
    matches
}

/// Node sets of a maximum common subgraph, as dense ids of each input.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommonSubgraph {
    /// Dense node ids in the first graph, ascending.
    pub first_nodes: Vec<usize>,
    /// Dense node ids in the second graph, ascending.
    pub second_nodes: Vec<usize>,
}

impl CommonSubgraph {
    /// Number of nodes in the common subgraph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.first_nodes.len()
    }
}

/// Finds a maximum common induced subgraph of `first` and `second`.
///
/// The smaller graph (`first` on ties) drives the search. Sizes shrink from
/// its node count and the first isomorphic pair of lexicographically ordered
/// node subsets is returned, so the result is size-optimal and reproducible
/// but not necessarily the only maximum. Returns `None` when either graph is
/// empty.
///
/// # Errors
/// Returns [`IsomorphismError::GraphTooLarge`] when either graph has more
/// than [`MCS_NODE_LIMIT`] nodes.
///
/// # Examples
/// ```
/// use protnet_core::{ReducedGraph, maximum_common_subgraph};
///
/// let triangle = ReducedGraph::from_triples(&[(1, 2, 1), (2, 3, 1), (1, 3, 1)]).expect("valid");
/// let tailed = ReducedGraph::from_triples(&[(2, 3, 1), (3, 4, 1), (2, 4, 1), (2, 5, 1)])
///     .expect("valid");
/// let common = maximum_common_subgraph(&triangle, &tailed)
///     .expect("graphs are small")
///     .expect("graphs are not empty");
/// assert_eq!(common.first_nodes, vec![0, 1, 2]);
/// assert_eq!(common.second_nodes, vec![0, 1, 2]);
/// ```
#[instrument(
    name = "isomorphism.mcs",
    err,
    skip(first, second),
    fields(
        first_nodes = first.node_count(),
        second_nodes = second.node_count(),
        size = tracing::field::Empty,
    ),
)]
pub fn maximum_common_subgraph(
    first: &ReducedGraph,
    second: &ReducedGraph,
) -> Result<Option<CommonSubgraph>, IsomorphismError> {
    for graph in [first, second] {
        check_size(graph)?;
    }
    let swapped = first.node_count() > second.node_count();
    let (smaller, larger) = if swapped { (second, first) } else { (first, second) };

    let mut pairs_examined = 0_u64;
    let found = (1..=smaller.node_count())
        .rev()
        .find_map(|size| search_at_size(smaller, larger, size, &mut pairs_examined));
    debug!(pairs_examined, "mcs search finished");
    #[cfg(feature = "metrics")]
    metrics::counter!("protnet_mcs_pairs_examined").increment(pairs_examined);

    Ok(found.map(|(small_nodes, large_nodes)| {
        Span::current().record("size", small_nodes.len());
        let (first_nodes, second_nodes) = if swapped {
            (large_nodes, small_nodes)
        } else {
            (small_nodes, large_nodes)
        };
        CommonSubgraph {
            first_nodes,
            second_nodes,
        }
    }))
}

fn check_size(graph: &ReducedGraph) -> Result<(), IsomorphismError> {
    if graph.node_count() > MCS_NODE_LIMIT {
        return Err(IsomorphismError::GraphTooLarge {
            nodes: graph.node_count(),
            limit: MCS_NODE_LIMIT,
        });
    }
    Ok(())
}

/// MCS similarity `|MCS| / max(|first|, |second|)`; `0.0` when either graph
/// is empty.
///
/// # Errors
/// Returns [`IsomorphismError::GraphTooLarge`] as
/// [`maximum_common_subgraph`] does.
#[expect(
    clippy::cast_precision_loss,
    clippy::float_arithmetic,
    reason = "similarity is a ratio of node counts."
)]
pub fn similarity(first: &ReducedGraph, second: &ReducedGraph) -> Result<f64, IsomorphismError> {
    let Some(common) = maximum_common_subgraph(first, second)? else {
        return Ok(0.0);
    };
    let largest = first.node_count().max(second.node_count());
    Ok(common.node_count() as f64 / largest as f64)
}

/// A corpus graph weakly isomorphic to a query.
#[derive(Clone, Debug, PartialEq)]
pub struct WeakIsomorph<K> {
    /// Key of the corpus entry.
    pub key: K,
    /// MCS similarity to the query, above [`WEAK_ISOMORPHISM_THRESHOLD`].
    pub similarity: f64,
}

/// Returns the `corpus` graphs whose MCS similarity to `query` exceeds
/// [`WEAK_ISOMORPHISM_THRESHOLD`], in corpus order.
///
/// Corpus graphs above [`MCS_NODE_LIMIT`] are skipped with a warning.
///
/// # Errors
/// Returns [`IsomorphismError::GraphTooLarge`] when `query` itself exceeds
/// [`MCS_NODE_LIMIT`].
#[instrument(
    name = "isomorphism.find_weak_isomorphs",
    err,
    skip(query, corpus),
    fields(nodes = query.node_count()),
)]
pub fn find_weak_isomorphs<'g, K, I>(
    query: &ReducedGraph,
    corpus: I,
) -> Result<Vec<WeakIsomorph<K>>, IsomorphismError>
where
    K: std::fmt::Debug,
    I: IntoIterator<Item = (K, &'g ReducedGraph)>,
{
    check_size(query)?;
    let mut matches = Vec::new();
    for (key, candidate) in corpus {
        if let Err(error) = check_size(candidate) {
            warn!(?key, %error, "skipping corpus graph");
            continue;
        }
        let score = similarity(query, candidate)?;
        if score > WEAK_ISOMORPHISM_THRESHOLD {
            matches.push(WeakIsomorph {
                key,
                similarity: score,
            });
        }
    }
    debug!(matches = matches.len(), "weak isomorph search finished");
    Ok(matches)
}
