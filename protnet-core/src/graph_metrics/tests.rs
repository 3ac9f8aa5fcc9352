//! Unit tests for conductance and modularity.

use protnet_test_support::fixtures::{block_diagonal_adjacency, blocks};
use rstest::{fixture, rstest};

use super::*;
use crate::labeling::Partition;

#[fixture]
fn two_cliques() -> AdjacencyMatrix {
    AdjacencyMatrix::from_rows(block_diagonal_adjacency(&[5, 5])).expect("cliques are symmetric")
}

#[rstest]
fn disjoint_cliques_have_zero_conductance(two_cliques: AdjacencyMatrix) {
    let conductances =
        community_conductances(&two_cliques, &blocks(&[(1, 5), (2, 5)])).expect("labels fit");
    assert_eq!(conductances, vec![0.0, 0.0]);
}

#[rstest]
fn disjoint_cliques_have_half_modularity(two_cliques: AdjacencyMatrix) {
    let q = modularity(&two_cliques, &blocks(&[(1, 5), (2, 5)])).expect("labels fit");
    assert!((q - 0.5).abs() < 1e-12, "q was {q}");
}

#[rstest]
fn single_community_has_zero_modularity(two_cliques: AdjacencyMatrix) {
    let q = modularity(&two_cliques, &[1; 10]).expect("labels fit");
    assert!(q.abs() < 1e-12, "q was {q}");
}

#[test]
fn bridged_cliques_have_positive_conductance() {
    let mut rows = block_diagonal_adjacency(&[3, 3]);
    rows[2][3] = 1.0;
    rows[3][2] = 1.0;
    let adjacency = AdjacencyMatrix::from_rows(rows).expect("bridge keeps symmetry");
    // Each triangle has volume 6 plus the bridge endpoint: 7 on both sides.
    let value = conductance(&adjacency, &[0, 1, 2]).expect("subset is valid");
    assert!((value - 1.0 / 7.0).abs() < 1e-12, "conductance was {value}");
}

#[rstest]
#[case::empty(vec![])]
#[case::everything((0..10).collect())]
fn degenerate_subsets_score_zero(two_cliques: AdjacencyMatrix, #[case] subset: Vec<usize>) {
    assert_eq!(conductance(&two_cliques, &subset), Ok(0.0));
}

#[test]
fn isolated_node_scores_zero() {
    let adjacency = AdjacencyMatrix::from_edges(3, &[(0, 1, 2.0)]).expect("edges are valid");
    assert_eq!(conductance(&adjacency, &[2]), Ok(0.0));
}

#[test]
fn diagonal_weight_counts_towards_volume() {
    let adjacency =
        AdjacencyMatrix::from_rows(vec![vec![2.0, 1.0], vec![1.0, 0.0]]).expect("symmetric");
    assert_eq!(adjacency.degree(0), 3.0);
    assert_eq!(adjacency.total_weight(), 4.0);
    // Cut 1 over min(3, 1).
    assert_eq!(conductance(&adjacency, &[0]), Ok(1.0));
}

#[test]
fn edge_list_matches_dense_rows() {
    let from_edges = AdjacencyMatrix::from_edges(3, &[(0, 1, 1.0), (1, 2, 2.0), (1, 0, 1.0)])
        .expect("edges are valid");
    let from_rows = AdjacencyMatrix::from_rows(vec![
        vec![0.0, 2.0, 0.0],
        vec![2.0, 0.0, 2.0],
        vec![0.0, 2.0, 0.0],
    ])
    .expect("rows are valid");
    assert_eq!(from_edges, from_rows);
    assert_eq!(from_edges.weight(1, 2), Some(2.0));
    assert_eq!(from_edges.weight(3, 0), None);
}

#[rstest]
#[case::empty(vec![], GraphMetricsErrorCode::EmptyMatrix)]
#[case::ragged(vec![vec![0.0, 1.0], vec![1.0]], GraphMetricsErrorCode::NotSquare)]
#[case::asymmetric(vec![vec![0.0, 1.0], vec![0.0, 0.0]], GraphMetricsErrorCode::Asymmetric)]
#[case::negative(vec![vec![0.0, -1.0], vec![-1.0, 0.0]], GraphMetricsErrorCode::InvalidWeight)]
#[case::nan(vec![vec![f64::NAN]], GraphMetricsErrorCode::InvalidWeight)]
fn rejects_invalid_matrices(#[case] rows: Vec<Vec<f64>>, #[case] code: GraphMetricsErrorCode) {
    let err = AdjacencyMatrix::from_rows(rows).expect_err("matrix must be rejected");
    assert_eq!(err.code(), code);
}

#[rstest]
#[case::out_of_range(vec![0, 10], GraphMetricsErrorCode::NodeOutOfRange)]
#[case::duplicate(vec![1, 1], GraphMetricsErrorCode::DuplicateNode)]
fn rejects_invalid_subsets(
    two_cliques: AdjacencyMatrix,
    #[case] subset: Vec<usize>,
    #[case] code: GraphMetricsErrorCode,
) {
    let err = conductance(&two_cliques, &subset).expect_err("subset must be rejected");
    assert_eq!(err.code(), code);
}

#[rstest]
#[case::short(vec![1; 9], GraphMetricsErrorCode::LengthMismatch)]
#[case::gapped(blocks(&[(1, 5), (3, 5)]), GraphMetricsErrorCode::InvalidLabeling)]
fn rejects_labelings_that_do_not_fit(
    two_cliques: AdjacencyMatrix,
    #[case] labels: Vec<usize>,
    #[case] code: GraphMetricsErrorCode,
) {
    let err = modularity(&two_cliques, &labels).expect_err("labels must be rejected");
    assert_eq!(err.code(), code);
    let err = community_conductances(&two_cliques, &labels).expect_err("labels must be rejected");
    assert_eq!(err.code(), code);
}

#[test]
fn modularity_rejects_edgeless_graphs() {
    let adjacency = AdjacencyMatrix::from_edges(2, &[]).expect("empty edge list is valid");
    assert_eq!(
        modularity(&adjacency, &[1, 2]),
        Err(GraphMetricsError::ZeroTotalWeight)
    );
}

#[rstest]
fn reports_every_level(two_cliques: AdjacencyMatrix) {
    let partition = Partition::try_from_levels(vec![
        vec![1; 10],
        blocks(&[(1, 5), (2, 5)]),
    ])
    .expect("partition is valid");
    let modularities = modularity_by_level(&two_cliques, &partition).expect("levels fit");
    assert_eq!(modularities.len(), 2);
    assert!(modularities[0].abs() < 1e-12);
    assert!((modularities[1] - 0.5).abs() < 1e-12);

    let conductances = conductance_by_level(&two_cliques, &partition).expect("levels fit");
    assert_eq!(conductances, vec![vec![0.0], vec![0.0, 0.0]]);
}
