//! End-to-end scenarios: decode a tree file, score its levels, measure the
//! graph and compare the resulting supernetworks.

use std::io::Write;

use protnet_core::{
    AdjacencyMatrix, ExecutionStrategy, InsightBuilder, Labeling, ReducedGraph, community_conductances,
    conductance, decode_tree_file, find_isomorphs, find_weak_isomorphs, is_isomorphic,
    modified_jaccard, modularity,
};
use protnet_test_support::fixtures::{
    block_diagonal_adjacency, blocks, complete_triples, cycle_triples, path_triples,
    three_level_tree,
};
use rstest::rstest;
use tempfile::NamedTempFile;

/// Two triangles `1-2-3` and `4-5-6` joined by the bridge `3-4`.
const BRIDGED_TRIANGLES: [(usize, usize); 7] =
    [(1, 2), (2, 3), (1, 3), (4, 5), (5, 6), (4, 6), (3, 4)];

#[rstest]
#[case::exact_domain(blocks(&[(1, 40), (2, 20), (3, 20), (4, 20)]), 1.0)]
#[case::overhanging_module(blocks(&[(1, 40), (2, 30), (3, 10), (4, 20)]), 2.0 / 3.0)]
fn scores_single_domain_reference(#[case] generated: Vec<usize>, #[case] expected: f64) {
    let reference = blocks(&[(1, 40), (2, 20), (1, 40)]);
    let score = modified_jaccard(&reference, &generated).expect("inputs are valid");
    assert!((score - expected).abs() < 1e-12, "score was {score}");
}

#[test]
fn disjoint_cliques_split_cleanly() {
    let adjacency =
        AdjacencyMatrix::from_rows(block_diagonal_adjacency(&[5, 5])).expect("cliques are valid");
    let labels = blocks(&[(1, 5), (2, 5)]);
    assert_eq!(conductance(&adjacency, &[0, 1, 2, 3, 4]), Ok(0.0));
    assert_eq!(conductance(&adjacency, &[5, 6, 7, 8, 9]), Ok(0.0));
    assert_eq!(community_conductances(&adjacency, &labels), Ok(vec![0.0, 0.0]));
    let q = modularity(&adjacency, &labels).expect("labels fit");
    assert!((q - 0.5).abs() < 1e-12, "modularity was {q}");
}

#[test]
fn analyses_a_decoded_tree_file() {
    let (text, expected_levels) = three_level_tree();
    let mut file = NamedTempFile::new().expect("temporary tree file");
    file.write_all(text.as_bytes()).expect("tree text is written");

    let partition = decode_tree_file(file.path()).expect("tree file decodes");
    let decoded: Vec<Vec<usize>> = partition
        .levels()
        .iter()
        .map(|level| level.as_slice().to_vec())
        .collect();
    assert_eq!(decoded, expected_levels);

    let insight = InsightBuilder::new()
        .with_num_trials(20)
        .with_rng_seed(5)
        .with_execution_strategy(ExecutionStrategy::Sequential)
        .build()
        .expect("configuration is valid");
    let reference = blocks(&[(1, 3), (2, 3)]);

    let best = insight
        .best_level(&reference, &partition)
        .expect("levels can be scored");
    assert_eq!(best.level, 0);
    assert!((best.jaccard - 1.0).abs() < 1e-12);

    let scores = insight
        .score_levels(&reference, &partition)
        .expect("levels can be scored");
    assert_eq!(scores.len(), 3);
    assert!((scores[1].jaccard - 5.0 / 9.0).abs() < 1e-12);

    let weighted: Vec<(usize, usize, f64)> = BRIDGED_TRIANGLES
        .iter()
        .map(|&(left, right)| (left - 1, right - 1, 1.0))
        .collect();
    let adjacency = AdjacencyMatrix::from_edges(6, &weighted).expect("edges are valid");
    let report = insight
        .graph_report(&adjacency, &partition)
        .expect("levels fit the graph");
    assert!((report.modularities()[0] - 5.0 / 14.0).abs() < 1e-12);
    assert_eq!(report.most_modular_level(), Some(0));
}

#[test]
fn supernetworks_of_decoded_levels_compare_structurally() {
    let (_, levels) = three_level_tree();
    let coarse = Labeling::try_new(levels[0].clone()).expect("level is valid");
    let middle = Labeling::try_new(levels[1].clone()).expect("level is valid");

    let coarse_graph =
        ReducedGraph::from_base_edges(&BRIDGED_TRIANGLES, &coarse).expect("edges are in range");
    assert_eq!(coarse_graph.triples(), vec![(1, 2, 1)]);

    let middle_graph =
        ReducedGraph::from_base_edges(&BRIDGED_TRIANGLES, &middle).expect("edges are in range");
    assert_eq!(middle_graph.triples(), vec![(1, 2, 2), (1, 3, 1), (3, 4, 2)]);

    let path = ReducedGraph::from_triples(&path_triples(4)).expect("path is valid");
    assert!(is_isomorphic(&middle_graph, &path));
}

#[test]
fn searches_a_corpus_for_exact_and_weak_matches() {
    let query = ReducedGraph::from_triples(&path_triples(4)).expect("path is valid");
    let corpus = [
        ("cycle", ReducedGraph::from_triples(&cycle_triples(4)).expect("cycle is valid")),
        ("clique", ReducedGraph::from_triples(&complete_triples(5)).expect("clique is valid")),
        (
            "relabelled_path",
            ReducedGraph::from_triples(&[(30, 10, 4), (10, 20, 1), (20, 40, 9)])
                .expect("path is valid"),
        ),
    ];
    let entries = || corpus.iter().map(|(key, graph)| (*key, graph));

    assert_eq!(find_isomorphs(&query, entries()), vec!["relabelled_path"]);

    let weak = find_weak_isomorphs(&query, entries()).expect("query is small");
    let summary: Vec<(&str, f64)> = weak.iter().map(|hit| (hit.key, hit.similarity)).collect();
    assert_eq!(summary, vec![("cycle", 0.75), ("relabelled_path", 1.0)]);
}
