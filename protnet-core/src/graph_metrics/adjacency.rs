//! Dense symmetric adjacency matrix.

use super::GraphMetricsError;

/// Square, symmetric, non-negative weighted adjacency matrix stored row-major.
///
/// # Examples
/// ```
/// use protnet_core::AdjacencyMatrix;
///
/// let adjacency = AdjacencyMatrix::from_rows(vec![
///     vec![0.0, 2.0, 0.0],
///     vec![2.0, 0.0, 1.0],
///     vec![0.0, 1.0, 0.0],
/// ])
/// .expect("matrix is symmetric");
/// assert_eq!(adjacency.node_count(), 3);
/// assert_eq!(adjacency.degree(1), 3.0);
/// assert_eq!(adjacency.total_weight(), 6.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct AdjacencyMatrix {
    node_count: usize,
    weights: Vec<f64>,
    degrees: Vec<f64>,
}

impl AdjacencyMatrix {
    /// Validates and wraps a matrix given as rows.
    ///
    /// # Errors
    /// Returns [`GraphMetricsError::EmptyMatrix`] for zero rows,
    /// [`GraphMetricsError::NotSquare`] for a row of the wrong length,
    /// [`GraphMetricsError::InvalidWeight`] for a negative or non-finite entry
    /// and [`GraphMetricsError::Asymmetric`] when `A != A^T`.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, GraphMetricsError> {
        let node_count = rows.len();
        if node_count == 0 {
            return Err(GraphMetricsError::EmptyMatrix);
        }
        let mut weights = Vec::with_capacity(node_count * node_count);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != node_count {
                return Err(GraphMetricsError::NotSquare {
                    row,
                    len: values.len(),
                    expected: node_count,
                });
            }
            weights.extend(values);
        }
        Self::from_dense(node_count, weights)
    }

    /// Builds a matrix over `node_count` nodes from undirected weighted edges
    /// given as zero-based `(left, right, weight)` triples.
    ///
    /// Each edge contributes its weight to both `A[left][right]` and
    /// `A[right][left]`; a self-loop contributes once to the diagonal.
    /// Repeated edges accumulate.
    ///
    /// # Errors
    /// Returns [`GraphMetricsError::EmptyMatrix`] when `node_count` is zero,
    /// [`GraphMetricsError::NodeOutOfRange`] for an endpoint outside the
    /// matrix and [`GraphMetricsError::InvalidWeight`] for a negative or
    /// non-finite weight.
    #[expect(
        clippy::float_arithmetic,
        reason = "edge weights accumulate in floating point."
    )]
    pub fn from_edges(
        node_count: usize,
        edges: &[(usize, usize, f64)],
    ) -> Result<Self, GraphMetricsError> {
        if node_count == 0 {
            return Err(GraphMetricsError::EmptyMatrix);
        }
        let mut weights = vec![0.0; node_count * node_count];
        for &(left, right, weight) in edges {
            for index in [left, right] {
                if index >= node_count {
                    return Err(GraphMetricsError::NodeOutOfRange { index, node_count });
                }
            }
            if !weight.is_finite() || weight < 0.0 {
                return Err(GraphMetricsError::InvalidWeight {
                    row: left,
                    col: right,
                    weight,
                });
            }
            weights[left * node_count + right] += weight;
            if left != right {
                weights[right * node_count + left] += weight;
            }
        }
        Self::from_dense(node_count, weights)
    }

    fn from_dense(node_count: usize, weights: Vec<f64>) -> Result<Self, GraphMetricsError> {
        for row in 0..node_count {
            for col in 0..node_count {
                let weight = weights[row * node_count + col];
                if !weight.is_finite() || weight < 0.0 {
                    return Err(GraphMetricsError::InvalidWeight { row, col, weight });
                }
                if col > row && weight != weights[col * node_count + row] {
                    return Err(GraphMetricsError::Asymmetric { row, col });
                }
            }
        }
        let degrees = weights
            .chunks_exact(node_count)
            .map(|row| row.iter().sum::<f64>())
            .collect();
        Ok(Self {
            node_count,
            weights,
            degrees,
        })
    }

    /// Number of nodes (rows) in the matrix.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Weight of the entry at (`row`, `col`), or `None` outside the matrix.
    #[must_use]
    pub fn weight(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.node_count || col >= self.node_count {
            return None;
        }
        self.weights.get(row * self.node_count + col).copied()
    }

    /// Row `node` of the matrix.
    ///
    /// # Panics
    /// Panics when `node` is out of range.
    #[must_use]
    pub fn row(&self, node: usize) -> &[f64] {
        let start = node * self.node_count;
        &self.weights[start..start + self.node_count]
    }

    /// Weighted degree (row sum, diagonal included) of `node`.
    ///
    /// # Panics
    /// Panics when `node` is out of range.
    #[must_use]
    pub fn degree(&self, node: usize) -> f64 {
        self.degrees[node]
    }

    /// Sum of every entry, i.e. twice the total edge weight `2W`.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.degrees.iter().sum()
    }
}
