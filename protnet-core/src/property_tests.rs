//! Property suites spanning labelings, null models, scoring, graph metrics
//! and isomorphism.

use std::collections::{BTreeSet, HashMap};

use proptest::prelude::*;
use rand::{SeedableRng, rngs::SmallRng};

use crate::{
    AdjacencyMatrix, ReducedGraph, community_conductances, count_boundaries, generate_null_model,
    is_isomorphic, maximum_common_subgraph, modified_jaccard, modularity,
    normalized_mutual_information, similarity, validate_labels,
    significance::{TrialBackend, z_score_with_backend},
    test_utils::suite_proptest_config,
};

/// Renumbers ids by first appearance so they cover `1..=m`.
fn compact(raw: &[usize]) -> Vec<usize> {
    let mut ids = HashMap::new();
    raw.iter()
        .map(|id| {
            let next = ids.len() + 1;
            *ids.entry(*id).or_insert(next)
        })
        .collect()
}

fn labeling_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0_usize..6, 1..32).prop_map(|raw| compact(&raw))
}

/// Node count plus one flag per unordered node pair, row-major over the
/// upper triangle.
fn graph_strategy(max_nodes: usize) -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1..=max_nodes).prop_flat_map(|nodes| {
        let pairs: Vec<(usize, usize)> = (0..nodes)
            .flat_map(|left| (left + 1..nodes).map(move |right| (left, right)))
            .collect();
        let len = pairs.len();
        (
            Just(nodes),
            prop::collection::vec(any::<bool>(), len).prop_map(move |keep| {
                pairs
                    .iter()
                    .zip(keep)
                    .filter_map(|(&pair, keep)| keep.then_some(pair))
                    .collect()
            }),
        )
    })
}

fn reduced_graph(nodes: usize, edges: &[(usize, usize)], ids: &[usize]) -> ReducedGraph {
    let triples: Vec<(usize, usize, u64)> =
        edges.iter().map(|&(left, right)| (ids[left], ids[right], 1)).collect();
    ReducedGraph::with_communities(ids.iter().copied().take(nodes), &triples)
        .expect("generated triples have no self-loops or zero weights")
}

proptest! {
    #![proptest_config(suite_proptest_config(128))]

    #[test]
    fn validation_accepts_exactly_contiguous_ids(raw in prop::collection::vec(0_usize..6, 0..16)) {
        let distinct: BTreeSet<usize> = raw.iter().copied().collect();
        let max = raw.iter().copied().max().unwrap_or(0);
        let contiguous = !raw.is_empty()
            && !distinct.contains(&0)
            && distinct.len() == max;
        prop_assert_eq!(validate_labels(&raw).is_ok(), contiguous);
        if contiguous {
            prop_assert_eq!(validate_labels(&raw), Ok(max));
        }
    }

    #[test]
    fn null_models_preserve_source_statistics(source in labeling_strategy(), seed in any::<u64>()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let model = generate_null_model(&source, &mut rng).expect("compacted labelings are valid");
        let labels = model.as_slice();
        prop_assert_eq!(labels.len(), source.len());
        prop_assert_eq!(count_boundaries(labels), count_boundaries(&source));
        prop_assert_eq!(validate_labels(labels), validate_labels(&source));
    }

    #[test]
    fn a_labeling_matches_itself_perfectly(labels in labeling_strategy()) {
        prop_assume!(labels.iter().any(|&id| id > 1));
        let score = modified_jaccard(&labels, &labels).expect("labeling has a domain");
        prop_assert!((score - 1.0).abs() < 1e-12, "score was {score}");
    }

    #[test]
    fn self_information_is_normalised(labels in labeling_strategy()) {
        let nmi = normalized_mutual_information(&labels, &labels).expect("labeling is not empty");
        prop_assert!((nmi - 1.0).abs() < 1e-9, "nmi was {nmi}");
    }

    #[test]
    fn trivial_partitions_have_zero_z_score(expected in labeling_strategy(), seed in any::<u64>()) {
        prop_assume!(expected.iter().any(|&id| id > 1));
        let single = vec![1; expected.len()];
        let singletons: Vec<usize> = (1..=expected.len()).collect();
        for generated in [single, singletons] {
            let z = z_score_with_backend(&expected, &generated, 8, seed, TrialBackend::Sequential)
                .expect("trivial partitions have a defined z-score");
            prop_assert_eq!(z, 0.0);
        }
    }

    #[test]
    fn graph_metrics_stay_within_bounds(
        (nodes, edges) in graph_strategy(8),
        raw in prop::collection::vec(0_usize..4, 8),
    ) {
        prop_assume!(!edges.is_empty());
        let weighted: Vec<(usize, usize, f64)> =
            edges.iter().map(|&(left, right)| (left, right, 1.0)).collect();
        let adjacency = AdjacencyMatrix::from_edges(nodes, &weighted).expect("edges are in range");
        let labels = compact(&raw[..nodes]);

        let q = modularity(&adjacency, &labels).expect("graph has edges");
        prop_assert!((-0.5 - 1e-12..=1.0 + 1e-12).contains(&q), "modularity was {q}");
        for phi in community_conductances(&adjacency, &labels).expect("labels fit the graph") {
            prop_assert!((0.0..=1.0).contains(&phi), "conductance was {phi}");
        }
    }

    #[test]
    fn relabelled_graphs_are_isomorphic(
        ((nodes, edges), permutation) in graph_strategy(7).prop_flat_map(|(nodes, edges)| {
            let ids: Vec<usize> = (1..=nodes).collect();
            (Just((nodes, edges)), Just(ids).prop_shuffle())
        }),
    ) {
        let identity: Vec<usize> = (1..=nodes).collect();
        let original = reduced_graph(nodes, &edges, &identity);
        let relabelled = reduced_graph(nodes, &edges, &permutation);
        prop_assert!(is_isomorphic(&original, &relabelled));
    }

    #[test]
    fn a_graph_is_its_own_common_subgraph((nodes, edges) in graph_strategy(6)) {
        let identity: Vec<usize> = (1..=nodes).collect();
        let graph = reduced_graph(nodes, &edges, &identity);
        let common = maximum_common_subgraph(&graph, &graph)
            .expect("graph is below the size limit")
            .expect("graph is not empty");
        prop_assert_eq!(common.node_count(), nodes);
        prop_assert_eq!(similarity(&graph, &graph), Ok(1.0));
    }
}

#[cfg(feature = "parallel")]
proptest! {
    #![proptest_config(suite_proptest_config(32))]

    #[test]
    fn backends_draw_identical_null_distributions(
        expected in labeling_strategy(),
        raw in prop::collection::vec(0_usize..6, 32),
        seed in any::<u64>(),
    ) {
        prop_assume!(expected.iter().any(|&id| id > 1));
        let generated = compact(&raw[..expected.len()]);
        let sequential =
            z_score_with_backend(&expected, &generated, 12, seed, TrialBackend::Sequential);
        let parallel = z_score_with_backend(&expected, &generated, 12, seed, TrialBackend::Parallel);
        prop_assert_eq!(sequential, parallel);
    }
}
