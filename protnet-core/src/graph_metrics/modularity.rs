//! Newman modularity.

use tracing::instrument;

use crate::labeling::Partition;

use super::{AdjacencyMatrix, GraphMetricsError, check_labels};

/// Newman modularity `Q = (1/2W) sum_ij (A_ij - k_i k_j / 2W) delta(c_i, c_j)`.
///
/// `2W` is the sum of every matrix entry and `k_i` is the row sum of node
/// `i`, so diagonal weight counts once in both.
///
/// # Errors
/// Returns [`GraphMetricsError::LengthMismatch`] or
/// [`GraphMetricsError::InvalidLabeling`] for a labeling that does not fit
/// the matrix, and [`GraphMetricsError::ZeroTotalWeight`] for a graph with no
/// edges.
///
/// # Examples
/// ```
/// use protnet_core::{AdjacencyMatrix, modularity};
///
/// // Two disjoint edges, one per community.
/// let adjacency = AdjacencyMatrix::from_edges(4, &[(0, 1, 1.0), (2, 3, 1.0)])
///     .expect("edges are valid");
/// let q = modularity(&adjacency, &[1, 1, 2, 2]).expect("labeling fits");
/// assert!((q - 0.5).abs() < 1e-12);
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "modularity is accumulated in floating point."
)]
pub fn modularity(adjacency: &AdjacencyMatrix, labels: &[usize]) -> Result<f64, GraphMetricsError> {
    let communities = check_labels(adjacency, labels)?;
    let total = adjacency.total_weight();
    if total == 0.0 {
        return Err(GraphMetricsError::ZeroTotalWeight);
    }

    // Sum_ij k_i k_j delta(c_i, c_j) factorises into the squared degree sum
    // of each community.
    let mut internal = 0.0_f64;
    let mut community_degree = vec![0.0_f64; communities];
    for (node, &community) in labels.iter().enumerate() {
        community_degree[community - 1] += adjacency.degree(node);
        internal += adjacency
            .row(node)
            .iter()
            .zip(labels)
            .filter(|(_, other)| **other == community)
            .map(|(weight, _)| weight)
            .sum::<f64>();
    }
    let expected: f64 = community_degree.iter().map(|degree| degree * degree).sum();
    Ok((internal - expected / total) / total)
}

/// Modularity of every level of `partition`, coarsest first.
///
/// # Errors
/// Returns the errors of [`modularity`] for the first level that cannot be
/// evaluated.
#[instrument(
    name = "graph_metrics.modularity_by_level",
    err,
    skip(adjacency, partition),
    fields(nodes = adjacency.node_count(), levels = partition.depth()),
)]
pub fn modularity_by_level(
    adjacency: &AdjacencyMatrix,
    partition: &Partition,
) -> Result<Vec<f64>, GraphMetricsError> {
    partition
        .levels()
        .iter()
        .map(|level| modularity(adjacency, level.as_slice()))
        .collect()
}
