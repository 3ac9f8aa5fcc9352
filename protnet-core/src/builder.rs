//! Builder utilities for configuring partition analysis.
//!
//! Exposes the execution strategy selection surface and the builder
//! validation used before constructing [`Insight`] instances.

use std::{fmt, num::NonZeroUsize};

use crate::{Result, error::InsightError, insight::Insight, significance::TrialBackend};

/// Number of null models drawn per z-score unless configured otherwise.
pub const DEFAULT_NUM_TRIALS: usize = 100;

/// Seed used for null-model generation unless configured otherwise.
pub const DEFAULT_RNG_SEED: u64 = 0x5EED_CAFE;

/// Selects how independent significance trials are executed.
///
/// `Auto` runs trials on the Rayon pool when the `parallel` feature is
/// compiled in and sequentially otherwise. Results are identical under every
/// strategy for a fixed seed.
///
/// # Examples
/// ```
/// use protnet_core::ExecutionStrategy;
///
/// let strategy = ExecutionStrategy::Auto;
/// assert_eq!(strategy.to_string(), "auto");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Let the library pick the fastest available backend.
    #[default]
    Auto,
    /// Run every trial on the calling thread.
    Sequential,
    /// Run trials on the Rayon thread pool; requires the `parallel` feature.
    Parallel,
}

impl ExecutionStrategy {
    pub(crate) fn resolve(self) -> Result<TrialBackend> {
        match self {
            Self::Auto => Ok(TrialBackend::preferred()),
            Self::Sequential => Ok(TrialBackend::Sequential),
            #[cfg(feature = "parallel")]
            Self::Parallel => Ok(TrialBackend::Parallel),
            #[cfg(not(feature = "parallel"))]
            Self::Parallel => Err(InsightError::BackendUnavailable { requested: self }),
        }
    }
}

impl fmt::Display for ExecutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Sequential => "sequential",
            Self::Parallel => "parallel",
        })
    }
}

/// Configures and constructs [`Insight`] instances.
///
/// # Examples
/// ```
/// use protnet_core::{ExecutionStrategy, InsightBuilder};
///
/// let insight = InsightBuilder::new()
///     .with_num_trials(250)
///     .with_rng_seed(42)
///     .with_execution_strategy(ExecutionStrategy::Sequential)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(insight.num_trials().get(), 250);
/// assert_eq!(insight.rng_seed(), 42);
/// assert_eq!(insight.execution_strategy(), ExecutionStrategy::Sequential);
/// ```
#[derive(Debug, Clone)]
pub struct InsightBuilder {
    num_trials: usize,
    rng_seed: u64,
    execution_strategy: ExecutionStrategy,
}

impl Default for InsightBuilder {
    fn default() -> Self {
        Self {
            num_trials: DEFAULT_NUM_TRIALS,
            rng_seed: DEFAULT_RNG_SEED,
            execution_strategy: ExecutionStrategy::Auto,
        }
    }
}

impl InsightBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use protnet_core::{ExecutionStrategy, InsightBuilder};
    ///
    /// let builder = InsightBuilder::new();
    /// assert_eq!(builder.num_trials(), 100);
    /// assert_eq!(builder.execution_strategy(), ExecutionStrategy::Auto);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the number of null models drawn per z-score.
    #[must_use]
    pub fn with_num_trials(mut self, num_trials: usize) -> Self {
        self.num_trials = num_trials;
        self
    }

    /// Returns the configured trial count.
    #[must_use]
    pub fn num_trials(&self) -> usize {
        self.num_trials
    }

    /// Overrides the base seed from which every trial seed is derived.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    /// Returns the configured base seed.
    #[must_use]
    pub fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// Sets how significance trials are executed.
    #[must_use]
    pub fn with_execution_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.execution_strategy = strategy;
        self
    }

    /// Returns the configured execution strategy.
    #[must_use]
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }

    /// Validates the configuration and constructs an [`Insight`] instance.
    ///
    /// # Errors
    /// Returns [`InsightError::InvalidTrialCount`] when the trial count is
    /// zero and [`InsightError::BackendUnavailable`] when the requested
    /// strategy is not compiled into this build.
    ///
    /// # Examples
    /// ```
    /// use protnet_core::{InsightBuilder, InsightError};
    ///
    /// let err = InsightBuilder::new()
    ///     .with_num_trials(0)
    ///     .build()
    ///     .expect_err("zero trials are rejected");
    /// assert!(matches!(err, InsightError::InvalidTrialCount { got: 0 }));
    /// ```
    pub fn build(self) -> Result<Insight> {
        let num_trials = NonZeroUsize::new(self.num_trials).ok_or(
            InsightError::InvalidTrialCount {
                got: self.num_trials,
            },
        )?;
        let backend = self.execution_strategy.resolve()?;
        Ok(Insight::new(
            num_trials,
            self.rng_seed,
            self.execution_strategy,
            backend,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(ExecutionStrategy::Auto, "auto")]
    #[case(ExecutionStrategy::Sequential, "sequential")]
    #[case(ExecutionStrategy::Parallel, "parallel")]
    fn displays_strategy_names(#[case] strategy: ExecutionStrategy, #[case] expected: &str) {
        assert_eq!(strategy.to_string(), expected);
    }

    #[test]
    fn defaults_match_documented_values() {
        let insight = InsightBuilder::new().build().expect("defaults are valid");
        assert_eq!(insight.num_trials().get(), DEFAULT_NUM_TRIALS);
        assert_eq!(insight.rng_seed(), DEFAULT_RNG_SEED);
        assert_eq!(insight.execution_strategy(), ExecutionStrategy::Auto);
    }

    #[test]
    fn sequential_is_always_available() {
        assert_eq!(
            ExecutionStrategy::Sequential.resolve(),
            Ok(TrialBackend::Sequential)
        );
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn auto_prefers_parallel_when_compiled_in() {
        assert_eq!(ExecutionStrategy::Auto.resolve(), Ok(TrialBackend::Parallel));
    }

    #[cfg(not(feature = "parallel"))]
    #[test]
    fn parallel_is_unavailable_without_the_feature() {
        let err = InsightBuilder::new()
            .with_execution_strategy(ExecutionStrategy::Parallel)
            .build()
            .expect_err("parallel backend is not compiled in");
        assert_eq!(
            err,
            InsightError::BackendUnavailable {
                requested: ExecutionStrategy::Parallel,
            }
        );
    }
}
