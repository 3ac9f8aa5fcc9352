//! Protnet core library.
//!
//! Analyses hierarchical community structure found in protein contact
//! networks:
//!
//! - decode clustering tree files into validated [`Partition`]s;
//! - score partition levels against reference domains with the modified
//!   Jaccard and test them against randomised null models;
//! - measure conductance and modularity over the underlying graph;
//! - compare reduced community graphs by exact and weak isomorphism.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod error;
mod graph_metrics;
mod information;
mod insight;
mod isomorphism;
mod labeling;
mod null_model;
mod scoring;
mod significance;
mod tree;

#[cfg(test)]
mod property_tests;
#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::{DEFAULT_NUM_TRIALS, DEFAULT_RNG_SEED, ExecutionStrategy, InsightBuilder},
    error::{InsightError, InsightErrorCode, Result},
    graph_metrics::{
        AdjacencyMatrix, GraphMetricsError, GraphMetricsErrorCode, community_conductances,
        conductance, conductance_by_level, modularity, modularity_by_level,
    },
    information::{
        InformationError, InformationErrorCode, mutual_information,
        normalized_mutual_information, shannon_entropy,
    },
    insight::{GraphReport, Insight, LevelGraphMetrics, LevelScore},
    isomorphism::{
        CommonSubgraph, CommunityEdge, IsomorphismError, IsomorphismErrorCode, MCS_NODE_LIMIT,
        ReducedGraph, WEAK_ISOMORPHISM_THRESHOLD, WeakIsomorph, could_be_isomorphic,
        find_isomorphs, find_weak_isomorphs, is_isomorphic, maximum_common_subgraph, similarity,
    },
    labeling::{
        Labeling, LabelingError, LabelingErrorCode, Partition, count_boundaries, validate_labels,
    },
    null_model::{NullModelError, NullModelErrorCode, generate_null_model},
    scoring::{
        LevelMatch, NO_DOMAIN, ScoringError, ScoringErrorCode, best_matching_level,
        modified_jaccard,
    },
    significance::{SignificanceError, SignificanceErrorCode, z_score},
    tree::{TreeFileError, TreeFileErrorCode, decode_tree, decode_tree_file, decode_tree_str},
};
