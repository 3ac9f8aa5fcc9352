//! Conductance and Newman modularity over weighted adjacency matrices.
//!
//! Both metrics take an [`AdjacencyMatrix`] validated on construction
//! (square, symmetric, finite and non-negative) so they only have to check
//! the community side of their inputs. Diagonal entries are permitted and
//! count towards a node's incident weight.

mod adjacency;
mod conductance;
mod modularity;

use thiserror::Error;

use crate::{error::define_error_codes, labeling::LabelingError};

pub use self::{
    adjacency::AdjacencyMatrix,
    conductance::{community_conductances, conductance, conductance_by_level},
    modularity::{modularity, modularity_by_level},
};

/// Errors raised while building adjacency matrices or evaluating metrics.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GraphMetricsError {
    /// The matrix had no rows.
    #[error("adjacency matrix must contain at least one node")]
    EmptyMatrix,
    /// A row length differed from the number of rows.
    #[error("adjacency row {row} has {len} entries but the matrix has {expected} rows")]
    NotSquare {
        /// Index of the offending row.
        row: usize,
        /// Number of entries in that row.
        len: usize,
        /// Number of rows in the matrix.
        expected: usize,
    },
    /// An entry was negative, NaN or infinite.
    #[error("adjacency entry ({row}, {col}) has invalid weight {weight}")]
    InvalidWeight {
        /// Row of the offending entry.
        row: usize,
        /// Column of the offending entry.
        col: usize,
        /// The offending weight.
        weight: f64,
    },
    /// `A[row][col]` differed from `A[col][row]`.
    #[error("adjacency matrix is not symmetric at ({row}, {col})")]
    Asymmetric {
        /// Row of the first mismatching entry.
        row: usize,
        /// Column of the first mismatching entry.
        col: usize,
    },
    /// A node index fell outside the matrix.
    #[error("node {index} is out of range for {node_count} nodes")]
    NodeOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of nodes in the matrix.
        node_count: usize,
    },
    /// A node subset listed the same node twice.
    #[error("node {index} appears more than once in the subset")]
    DuplicateNode {
        /// The repeated index.
        index: usize,
    },
    /// The labeling and matrix disagree on the node count.
    #[error("labeling has {labels} nodes but the adjacency matrix has {nodes}")]
    LengthMismatch {
        /// Number of labels supplied.
        labels: usize,
        /// Number of nodes in the matrix.
        nodes: usize,
    },
    /// The labeling broke the contiguous-id invariant.
    #[error("labeling is invalid: {source}")]
    InvalidLabeling {
        /// Violation found in the labeling.
        #[source]
        source: LabelingError,
    },
    /// Modularity is undefined on a graph without edges.
    #[error("modularity is undefined for a graph with zero total weight")]
    ZeroTotalWeight,
}

define_error_codes! {
    /// Stable codes describing [`GraphMetricsError`] variants.
    enum GraphMetricsErrorCode for GraphMetricsError {
        /// The matrix had no rows.
        EmptyMatrix => EmptyMatrix => "GRAPH_METRICS_EMPTY_MATRIX",
        /// A row length differed from the number of rows.
        NotSquare => NotSquare { .. } => "GRAPH_METRICS_NOT_SQUARE",
        /// An entry was negative, NaN or infinite.
        InvalidWeight => InvalidWeight { .. } => "GRAPH_METRICS_INVALID_WEIGHT",
        /// The matrix was not symmetric.
        Asymmetric => Asymmetric { .. } => "GRAPH_METRICS_ASYMMETRIC",
        /// A node index fell outside the matrix.
        NodeOutOfRange => NodeOutOfRange { .. } => "GRAPH_METRICS_NODE_OUT_OF_RANGE",
        /// A node subset listed the same node twice.
        DuplicateNode => DuplicateNode { .. } => "GRAPH_METRICS_DUPLICATE_NODE",
        /// The labeling and matrix disagree on the node count.
        LengthMismatch => LengthMismatch { .. } => "GRAPH_METRICS_LENGTH_MISMATCH",
        /// The labeling broke the contiguous-id invariant.
        InvalidLabeling => InvalidLabeling { .. } => "GRAPH_METRICS_INVALID_LABELING",
        /// Modularity is undefined on a graph without edges.
        ZeroTotalWeight => ZeroTotalWeight => "GRAPH_METRICS_ZERO_TOTAL_WEIGHT",
    }
}

/// Checks that `labels` is a valid labeling of every node in `adjacency`.
fn check_labels(adjacency: &AdjacencyMatrix, labels: &[usize]) -> Result<usize, GraphMetricsError> {
    if labels.len() != adjacency.node_count() {
        return Err(GraphMetricsError::LengthMismatch {
            labels: labels.len(),
            nodes: adjacency.node_count(),
        });
    }
    crate::labeling::validate_labels(labels)
        .map_err(|source| GraphMetricsError::InvalidLabeling { source })
}

#[cfg(test)]
mod tests;
