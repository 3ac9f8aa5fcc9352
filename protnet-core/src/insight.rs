//! Partition analysis orchestration.
//!
//! [`Insight`] bundles the significance configuration and runs the
//! per-level analyses: modified Jaccard and z-score against a reference,
//! and modularity and conductance against the underlying graph.

use std::num::NonZeroUsize;

use tracing::{debug, info, instrument};

use crate::{
    Result,
    builder::ExecutionStrategy,
    graph_metrics::{AdjacencyMatrix, community_conductances, modularity},
    labeling::Partition,
    scoring::{LevelMatch, best_matching_level, modified_jaccard},
    significance::{TrialBackend, z_score_with_backend},
};

/// Scores of one partition level against a reference labeling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelScore {
    /// Index of the level, coarsest first.
    pub level: usize,
    /// Modified Jaccard of the level.
    pub jaccard: f64,
    /// z-score of that Jaccard against the level's null models.
    pub z_score: f64,
}

/// Graph metrics of one partition level.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelGraphMetrics {
    /// Index of the level, coarsest first.
    pub level: usize,
    /// Newman modularity of the level.
    pub modularity: f64,
    /// Conductance of each community, indexed by `id - 1`.
    pub conductances: Vec<f64>,
}

/// Modularity and conductances of every level of a partition.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphReport {
    levels: Vec<LevelGraphMetrics>,
}

impl GraphReport {
    /// Per-level metrics, coarsest first.
    #[must_use]
    pub fn levels(&self) -> &[LevelGraphMetrics] {
        &self.levels
    }

    /// Modularity of every level, coarsest first.
    #[must_use]
    pub fn modularities(&self) -> Vec<f64> {
        self.levels.iter().map(|level| level.modularity).collect()
    }

    /// Index of the level with the highest modularity; ties keep the coarser
    /// level.
    #[must_use]
    pub fn most_modular_level(&self) -> Option<usize> {
        self.levels
            .iter()
            .fold(None, |best: Option<&LevelGraphMetrics>, level| match best {
                Some(current) if current.modularity >= level.modularity => Some(current),
                _ => Some(level),
            })
            .map(|level| level.level)
    }
}

/// Entry point for analysing decoded partitions.
///
/// # Examples
/// ```
/// use protnet_core::{InsightBuilder, Partition};
///
/// let insight = InsightBuilder::new()
///     .with_num_trials(20)
///     .build()
///     .expect("configuration is valid");
/// let reference = [1, 1, 2, 2, 2, 3, 3, 3];
/// let partition = Partition::try_from_levels(vec![
///     vec![1; 8],
///     vec![1, 1, 2, 2, 2, 3, 3, 3],
/// ])
/// .expect("levels are valid");
/// let scores = insight
///     .score_levels(&reference, &partition)
///     .expect("levels can be scored");
/// assert_eq!(scores.len(), 2);
/// assert_eq!(scores[0].z_score, 0.0);
/// assert!((scores[1].jaccard - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Insight {
    num_trials: NonZeroUsize,
    rng_seed: u64,
    execution_strategy: ExecutionStrategy,
    backend: TrialBackend,
}

impl Insight {
    pub(crate) fn new(
        num_trials: NonZeroUsize,
        rng_seed: u64,
        execution_strategy: ExecutionStrategy,
        backend: TrialBackend,
    ) -> Self {
        Self {
            num_trials,
            rng_seed,
            execution_strategy,
            backend,
        }
    }

    /// Returns the number of null models drawn per z-score.
    #[must_use]
    pub fn num_trials(&self) -> NonZeroUsize {
        self.num_trials
    }

    /// Returns the base seed of every trial.
    #[must_use]
    pub fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// Returns the configured execution strategy.
    #[must_use]
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }

    /// Modified Jaccard of `generated` against the reference `expected`.
    ///
    /// # Errors
    /// Returns [`crate::InsightError::Scoring`] for inputs rejected by
    /// [`crate::modified_jaccard`].
    pub fn modified_jaccard(&self, expected: &[usize], generated: &[usize]) -> Result<f64> {
        Ok(modified_jaccard(expected, generated)?)
    }

    /// z-score of `generated` against `expected` using the configured trial
    /// count, seed and execution strategy.
    ///
    /// # Errors
    /// Returns [`crate::InsightError::Significance`] wrapping the failure.
    pub fn z_score(&self, expected: &[usize], generated: &[usize]) -> Result<f64> {
        Ok(z_score_with_backend(
            expected,
            generated,
            self.num_trials.get(),
            self.rng_seed,
            self.backend,
        )?)
    }

    /// Level of `partition` whose modified Jaccard is highest.
    ///
    /// # Errors
    /// Returns [`crate::InsightError::Scoring`] for levels that cannot be
    /// scored.
    pub fn best_level(&self, expected: &[usize], partition: &Partition) -> Result<LevelMatch> {
        Ok(best_matching_level(expected, partition)?)
    }

    /// Modified Jaccard and z-score of every level of `partition`.
    ///
    /// # Errors
    /// Returns the first scoring or significance failure.
    #[instrument(
        name = "insight.score_levels",
        err,
        skip(self, expected, partition),
        fields(
            levels = partition.depth(),
            nodes = partition.node_count(),
            trials = self.num_trials.get(),
            seed = self.rng_seed,
            strategy = %self.execution_strategy,
        ),
    )]
    pub fn score_levels(&self, expected: &[usize], partition: &Partition) -> Result<Vec<LevelScore>> {
        let mut scores = Vec::with_capacity(partition.depth());
        for (level, labeling) in partition.levels().iter().enumerate() {
            let generated = labeling.as_slice();
            let jaccard = modified_jaccard(expected, generated)?;
            let z_score = self.z_score(expected, generated)?;
            debug!(level, jaccard, z_score, "level scored");
            scores.push(LevelScore {
                level,
                jaccard,
                z_score,
            });
        }
        info!(levels = scores.len(), "partition scored against reference");
        Ok(scores)
    }

    /// Modularity and per-community conductances of every level.
    ///
    /// # Errors
    /// Returns [`crate::InsightError::GraphMetrics`] when a level does not fit
    /// `adjacency` or the graph has no edges.
    #[instrument(
        name = "insight.graph_report",
        err,
        skip(self, adjacency, partition),
        fields(levels = partition.depth(), nodes = adjacency.node_count()),
    )]
    pub fn graph_report(
        &self,
        adjacency: &AdjacencyMatrix,
        partition: &Partition,
    ) -> Result<GraphReport> {
        let mut levels = Vec::with_capacity(partition.depth());
        for (level, labeling) in partition.levels().iter().enumerate() {
            let labels = labeling.as_slice();
            let modularity = modularity(adjacency, labels)?;
            let conductances = community_conductances(adjacency, labels)?;
            debug!(level, modularity, communities = conductances.len(), "level measured");
            levels.push(LevelGraphMetrics {
                level,
                modularity,
                conductances,
            });
        }
        info!(levels = levels.len(), "graph metrics computed");
        Ok(GraphReport { levels })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use protnet_test_support::fixtures::{block_diagonal_adjacency, blocks};

    use crate::{ExecutionStrategy, InsightBuilder, InsightError, error::InsightErrorCode};

    fn insight() -> Insight {
        InsightBuilder::new()
            .with_num_trials(30)
            .with_rng_seed(11)
            .with_execution_strategy(ExecutionStrategy::Sequential)
            .build()
            .expect("configuration is valid")
    }

    #[test]
    fn z_score_is_reproducible_for_a_seed() {
        let expected = blocks(&[(1, 10), (2, 10), (3, 10)]);
        let generated = blocks(&[(1, 12), (2, 8), (3, 10)]);
        let first = insight().z_score(&expected, &generated).expect("z-score computes");
        let second = insight().z_score(&expected, &generated).expect("z-score computes");
        assert_eq!(first, second);
    }

    #[test]
    fn score_levels_reports_every_level() {
        let expected = blocks(&[(1, 5), (2, 5), (3, 5)]);
        let partition = Partition::try_from_levels(vec![
            vec![1; 15],
            blocks(&[(1, 5), (2, 5), (3, 5)]),
            (1..=15).collect(),
        ])
        .expect("levels are valid");
        let scores = insight()
            .score_levels(&expected, &partition)
            .expect("levels score");
        assert_eq!(
            scores.iter().map(|score| score.level).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(scores[0].z_score, 0.0);
        assert_eq!(scores[2].z_score, 0.0);
        assert!((scores[1].jaccard - 1.0).abs() < 1e-12);
    }

    #[test]
    fn score_levels_wraps_scoring_failures() {
        let partition = Partition::try_from_levels(vec![vec![1, 2]]).expect("level is valid");
        let err = insight()
            .score_levels(&[1, 1], &partition)
            .expect_err("reference without domains must fail");
        assert_eq!(err.code(), InsightErrorCode::Scoring);
        assert_eq!(err.source_code(), Some("SCORING_NO_REFERENCE_DOMAINS"));
    }

    #[test]
    fn graph_report_measures_every_level() {
        let adjacency = AdjacencyMatrix::from_rows(block_diagonal_adjacency(&[5, 5]))
            .expect("cliques are symmetric");
        let partition = Partition::try_from_levels(vec![vec![1; 10], blocks(&[(1, 5), (2, 5)])])
            .expect("levels are valid");
        let report = insight()
            .graph_report(&adjacency, &partition)
            .expect("levels fit the graph");
        assert_eq!(report.levels().len(), 2);
        assert_eq!(report.levels()[1].conductances, vec![0.0, 0.0]);
        assert!((report.modularities()[1] - 0.5).abs() < 1e-12);
        assert_eq!(report.most_modular_level(), Some(1));
    }

    #[test]
    fn graph_report_wraps_metric_failures() {
        let adjacency = AdjacencyMatrix::from_rows(block_diagonal_adjacency(&[2, 2]))
            .expect("cliques are symmetric");
        let partition = Partition::try_from_levels(vec![vec![1, 1, 2]]).expect("level is valid");
        let err = insight()
            .graph_report(&adjacency, &partition)
            .expect_err("short labeling must fail");
        assert!(matches!(err, InsightError::GraphMetrics(_)));
        assert_eq!(err.source_code(), Some("GRAPH_METRICS_LENGTH_MISMATCH"));
    }
}
