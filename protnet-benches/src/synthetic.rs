//! Seeded synthetic inputs for benchmarking.
//!
//! Labelings are built from random contiguous segments coloured round-robin,
//! so they always satisfy the contiguous-id invariant. Reduced graphs are
//! Erdős–Rényi graphs over the communities `1..=n`.

use protnet_core::ReducedGraph;
use rand::{Rng, SeedableRng, rngs::SmallRng, seq::index};

use crate::error::BenchSetupError;

/// Errors that may occur during synthetic input generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
pub enum SyntheticError {
    /// The requested node count was zero.
    #[error("node count must be greater than zero")]
    ZeroNodes,
    /// The segment count was zero or above the node count.
    #[error("segment count {segments} must lie in 1..={nodes}")]
    InvalidSegmentCount {
        /// Requested segments.
        segments: usize,
        /// Available nodes.
        nodes: usize,
    },
    /// The community count cannot colour the segments.
    #[error("{communities} communities cannot colour {segments} segments")]
    InvalidCommunityCount {
        /// Requested communities.
        communities: usize,
        /// Requested segments.
        segments: usize,
    },
    /// The edge probability was outside `[0, 1]`.
    #[error("edge probability {0} must lie in [0, 1]")]
    InvalidProbability(f64),
}

/// Configuration for synthetic labeling generation.
#[derive(Clone, Debug)]
pub struct LabelingConfig {
    /// Number of nodes.
    pub node_count: usize,
    /// Number of contiguous segments.
    pub segment_count: usize,
    /// Number of distinct community ids.
    pub community_count: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// Generates a labeling with the configured segment and community counts.
///
/// # Errors
///
/// Returns [`SyntheticError`] when the counts cannot describe a valid
/// labeling: no nodes, more segments than nodes, more communities than
/// segments, or a single community spread over several segments.
///
/// # Examples
///
/// ```
/// use protnet_benches::synthetic::{LabelingConfig, generate_labeling};
/// use protnet_core::{count_boundaries, validate_labels};
///
/// let config = LabelingConfig { node_count: 50, segment_count: 6, community_count: 3, seed: 7 };
/// let labels = generate_labeling(&config).expect("valid config");
/// assert_eq!(labels.len(), 50);
/// assert_eq!(count_boundaries(&labels), 5);
/// assert_eq!(validate_labels(&labels), Ok(3));
/// ```
pub fn generate_labeling(config: &LabelingConfig) -> Result<Vec<usize>, SyntheticError> {
    let LabelingConfig {
        node_count,
        segment_count,
        community_count,
        seed,
    } = *config;
    if node_count == 0 {
        return Err(SyntheticError::ZeroNodes);
    }
    if segment_count == 0 || segment_count > node_count {
        return Err(SyntheticError::InvalidSegmentCount {
            segments: segment_count,
            nodes: node_count,
        });
    }
    let single_colour_over_many = community_count == 1 && segment_count > 1;
    if community_count == 0 || community_count > segment_count || single_colour_over_many {
        return Err(SyntheticError::InvalidCommunityCount {
            communities: community_count,
            segments: segment_count,
        });
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    let mut cuts: Vec<usize> = index::sample(&mut rng, node_count - 1, segment_count - 1)
        .into_iter()
        .map(|cut| cut + 1)
        .collect();
    cuts.sort_unstable();

    let mut labels = Vec::with_capacity(node_count);
    let mut start = 0;
    let ends = cuts.into_iter().chain(std::iter::once(node_count));
    for (end, id) in ends.zip((1..=community_count).cycle()) {
        labels.extend(std::iter::repeat_n(id, end - start));
        start = end;
    }
    Ok(labels)
}

/// Configuration for synthetic reduced-graph generation.
#[derive(Clone, Debug)]
pub struct GraphConfig {
    /// Number of communities.
    pub node_count: usize,
    /// Probability that a community pair is joined.
    pub edge_probability: f64,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// Generates a reduced graph over communities `1..=node_count` whose pairs
/// are joined independently with the configured probability.
///
/// # Errors
///
/// Returns [`SyntheticError::ZeroNodes`] or
/// [`SyntheticError::InvalidProbability`] for unusable configurations.
///
/// # Examples
///
/// ```
/// use protnet_benches::synthetic::{GraphConfig, generate_graph};
///
/// let config = GraphConfig { node_count: 8, edge_probability: 1.0, seed: 3 };
/// let graph = generate_graph(&config).expect("valid config");
/// assert_eq!(graph.node_count(), 8);
/// assert_eq!(graph.edge_count(), 28);
/// ```
pub fn generate_graph(config: &GraphConfig) -> Result<ReducedGraph, BenchSetupError> {
    if config.node_count == 0 {
        return Err(SyntheticError::ZeroNodes.into());
    }
    if !(0.0..=1.0).contains(&config.edge_probability) {
        return Err(SyntheticError::InvalidProbability(config.edge_probability).into());
    }
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let nodes = config.node_count;
    let mut triples = Vec::new();
    for left in 1..=nodes {
        for right in left + 1..=nodes {
            if rng.gen_bool(config.edge_probability) {
                triples.push((left, right, 1));
            }
        }
    }
    Ok(ReducedGraph::with_communities(1..=nodes, &triples)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    use protnet_core::{count_boundaries, validate_labels};
    use rstest::rstest;

    #[rstest]
    #[case(1, 1, 1)]
    #[case(10, 10, 10)]
    #[case(40, 9, 2)]
    #[case(200, 30, 7)]
    fn labelings_have_requested_shape(
        #[case] node_count: usize,
        #[case] segment_count: usize,
        #[case] community_count: usize,
    ) {
        let labels = generate_labeling(&LabelingConfig {
            node_count,
            segment_count,
            community_count,
            seed: 11,
        })
        .expect("configuration is valid");
        assert_eq!(labels.len(), node_count);
        assert_eq!(count_boundaries(&labels), segment_count - 1);
        assert_eq!(validate_labels(&labels), Ok(community_count));
    }

    #[rstest]
    #[case(0, 1, 1)]
    #[case(5, 0, 1)]
    #[case(5, 6, 1)]
    #[case(5, 3, 4)]
    #[case(5, 3, 1)]
    fn rejects_impossible_labelings(
        #[case] node_count: usize,
        #[case] segment_count: usize,
        #[case] community_count: usize,
    ) {
        let result = generate_labeling(&LabelingConfig {
            node_count,
            segment_count,
            community_count,
            seed: 0,
        });
        assert!(result.is_err());
    }

    #[test]
    fn graphs_are_reproducible_for_a_seed() {
        let config = GraphConfig {
            node_count: 12,
            edge_probability: 0.3,
            seed: 5,
        };
        let first = generate_graph(&config).expect("valid config");
        let second = generate_graph(&config).expect("valid config");
        assert_eq!(first, second);
        assert_eq!(first.node_count(), 12);
    }

    #[test]
    fn rejects_invalid_probabilities() {
        let config = GraphConfig {
            node_count: 4,
            edge_probability: 1.5,
            seed: 0,
        };
        assert!(matches!(
            generate_graph(&config),
            Err(BenchSetupError::Synthetic(SyntheticError::InvalidProbability(_)))
        ));
    }
}
