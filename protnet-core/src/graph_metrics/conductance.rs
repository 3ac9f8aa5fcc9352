//! Conductance of node subsets and of every community in a partition.

use tracing::instrument;

use crate::labeling::Partition;

use super::{AdjacencyMatrix, GraphMetricsError, check_labels};

/// Conductance of the zero-based node `subset`.
///
/// `C(S) = cut(S, V \ S) / min(a(S), a(V \ S))` where `a(X)` sums the rows of
/// every node in `X`. The empty subset, the whole node set and any subset
/// whose smaller side has no incident weight score `0.0`.
///
/// # Errors
/// Returns [`GraphMetricsError::NodeOutOfRange`] or
/// [`GraphMetricsError::DuplicateNode`] for an invalid subset.
///
/// # Examples
/// ```
/// use protnet_core::{AdjacencyMatrix, conductance};
///
/// // Path 0 - 1 - 2 - 3 cut in the middle.
/// let adjacency = AdjacencyMatrix::from_edges(
///     4,
///     &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0)],
/// )
/// .expect("edges are valid");
/// let value = conductance(&adjacency, &[0, 1]).expect("subset is valid");
/// assert!((value - 1.0 / 3.0).abs() < 1e-12);
/// ```
pub fn conductance(adjacency: &AdjacencyMatrix, subset: &[usize]) -> Result<f64, GraphMetricsError> {
    let node_count = adjacency.node_count();
    let mut inside = vec![false; node_count];
    for &index in subset {
        let slot = inside
            .get_mut(index)
            .ok_or(GraphMetricsError::NodeOutOfRange { index, node_count })?;
        if *slot {
            return Err(GraphMetricsError::DuplicateNode { index });
        }
        *slot = true;
    }
    Ok(conductance_of_mask(adjacency, &inside))
}

#[expect(
    clippy::float_arithmetic,
    reason = "conductance is a ratio of floating-point weights."
)]
fn conductance_of_mask(adjacency: &AdjacencyMatrix, inside: &[bool]) -> f64 {
    let mut cut = 0.0_f64;
    let mut subset_volume = 0.0_f64;
    let mut complement_volume = 0.0_f64;
    for (node, &member) in inside.iter().enumerate() {
        if member {
            subset_volume += adjacency.degree(node);
            cut += adjacency
                .row(node)
                .iter()
                .zip(inside)
                .filter(|(_, other)| !**other)
                .map(|(weight, _)| weight)
                .sum::<f64>();
        } else {
            complement_volume += adjacency.degree(node);
        }
    }
    let denominator = subset_volume.min(complement_volume);
    if denominator == 0.0 {
        return 0.0;
    }
    cut / denominator
}

/// Conductance of every community `1..=m` of `labels`, in id order.
///
/// # Errors
/// Returns [`GraphMetricsError::LengthMismatch`] when `labels` does not cover
/// every node and [`GraphMetricsError::InvalidLabeling`] when it is not
/// contiguous.
pub fn community_conductances(
    adjacency: &AdjacencyMatrix,
    labels: &[usize],
) -> Result<Vec<f64>, GraphMetricsError> {
    let communities = check_labels(adjacency, labels)?;
    Ok((1..=communities)
        .map(|community| {
            let inside: Vec<bool> = labels.iter().map(|&id| id == community).collect();
            conductance_of_mask(adjacency, &inside)
        })
        .collect())
}

/// Per-community conductances for every level of `partition`, coarsest first.
///
/// # Errors
/// Returns the errors of [`community_conductances`] for the first level that
/// does not fit the matrix.
#[instrument(
    name = "graph_metrics.conductance_by_level",
    err,
    skip(adjacency, partition),
    fields(nodes = adjacency.node_count(), levels = partition.depth()),
)]
pub fn conductance_by_level(
    adjacency: &AdjacencyMatrix,
    partition: &Partition,
) -> Result<Vec<Vec<f64>>, GraphMetricsError> {
    partition
        .levels()
        .iter()
        .map(|level| community_conductances(adjacency, level.as_slice()))
        .collect()
}
