//! Benchmark parameter types rendered as Criterion benchmark ids.

use std::fmt;

/// Parameters for a significance benchmark run.
#[derive(Clone, Debug)]
pub struct SignificanceBenchParams {
    /// Number of nodes in the labelings.
    pub node_count: usize,
    /// Null models drawn per z-score.
    pub num_trials: usize,
}

impl fmt::Display for SignificanceBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},trials={}", self.node_count, self.num_trials)
    }
}

/// Parameters for a maximum common subgraph benchmark run.
#[derive(Clone, Debug)]
pub struct McsBenchParams {
    /// Communities in each reduced graph.
    pub node_count: usize,
    /// Probability that a community pair is joined.
    pub edge_probability: f64,
}

impl fmt::Display for McsBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},p={}", self.node_count, self.edge_probability)
    }
}
