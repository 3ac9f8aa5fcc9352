//! Repeated-trial z-scores of modified Jaccard against null models.
//!
//! Every trial draws one null model of the generated labeling from its own
//! `SmallRng`, seeded by mixing the base seed with the trial index. Trials
//! are therefore independent of execution order, and the sequential and
//! parallel backends produce identical samples for the same seed.

use rand::{SeedableRng, rngs::SmallRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use thiserror::Error;
use tracing::{Span, debug, instrument};

use crate::{
    error::define_error_codes,
    null_model::{NullModelError, generate_null_model},
    scoring::{DomainReference, ScoringError},
};

/// SplitMix64 increment (the 64-bit golden ratio) used for per-trial seeds.
const TRIAL_SEED_SPACING: u64 = 0x9E37_79B9_7F4A_7C15;
const SPLITMIX_MULT_A: u64 = 0xBF58_476D_1CE4_E5B9;
const SPLITMIX_MULT_B: u64 = 0x94D0_49BB_1331_11EB;

/// Absolute tolerance used when comparing the observed score with the null
/// mean.
const CLOSE_ABSOLUTE: f64 = 1e-8;
/// Relative tolerance used when comparing the observed score with the null
/// mean.
const CLOSE_RELATIVE: f64 = 1e-5;

/// Errors raised while computing a z-score.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SignificanceError {
    /// The significance loop needs at least one trial.
    #[error("num_trials must be at least 1 (got {got})")]
    InvalidTrialCount {
        /// Trial count supplied by the caller.
        got: usize,
    },
    /// The observed labeling could not be scored.
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    /// A null model could not be generated.
    #[error(transparent)]
    NullModel(#[from] NullModelError),
    /// Every null model scored identically but differently from the
    /// observation, leaving the z-score undefined.
    #[error("null distribution has zero spread (mean {mean}) but the observed score is {observed}")]
    DegenerateNullDistribution {
        /// Modified Jaccard of the observed labeling.
        observed: f64,
        /// Mean modified Jaccard of the null models.
        mean: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`SignificanceError`] variants.
    enum SignificanceErrorCode for SignificanceError {
        /// The significance loop needs at least one trial.
        InvalidTrialCount => InvalidTrialCount { .. } => "SIGNIFICANCE_INVALID_TRIAL_COUNT",
        /// The observed labeling could not be scored.
        Scoring => Scoring(..) => "SIGNIFICANCE_SCORING",
        /// A null model could not be generated.
        NullModel => NullModel(..) => "SIGNIFICANCE_NULL_MODEL",
        /// The null distribution has zero spread.
        DegenerateNullDistribution => DegenerateNullDistribution { .. } => "SIGNIFICANCE_DEGENERATE_NULL_DISTRIBUTION",
    }
}

/// How the independent trials are executed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum TrialBackend {
    Sequential,
    #[cfg(feature = "parallel")]
    Parallel,
}

impl TrialBackend {
    /// Parallel when Rayon is compiled in, sequential otherwise.
    pub(crate) const fn preferred() -> Self {
        #[cfg(feature = "parallel")]
        {
            Self::Parallel
        }
        #[cfg(not(feature = "parallel"))]
        {
            Self::Sequential
        }
    }
}

/// Derives the seed of trial `trial` from `base_seed`.
#[inline]
#[must_use]
pub(crate) fn mix_trial_seed(base_seed: u64, trial: usize) -> u64 {
    splitmix64(base_seed ^ ((trial as u64 + 1).wrapping_mul(TRIAL_SEED_SPACING)))
}

#[inline]
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(TRIAL_SEED_SPACING);
    state = (state ^ (state >> 30)).wrapping_mul(SPLITMIX_MULT_A);
    state = (state ^ (state >> 27)).wrapping_mul(SPLITMIX_MULT_B);
    state ^ (state >> 31)
}

/// Computes the z-score of `generated` against `expected` using
/// `num_trials` null models of `generated`.
///
/// Trials run in parallel when the `parallel` feature is enabled. Use
/// [`crate::Insight`] to pick the backend explicitly.
///
/// Returns exactly `0.0` when the observed score is numerically
/// indistinguishable from the null mean.
///
/// # Errors
/// Returns [`SignificanceError::InvalidTrialCount`] when `num_trials` is
/// zero, [`SignificanceError::Scoring`] for inputs rejected by
/// [`crate::modified_jaccard`], [`SignificanceError::NullModel`] when a null
/// model cannot be drawn, and
/// [`SignificanceError::DegenerateNullDistribution`] when every null model
/// scores the same value and that value differs from the observation.
///
/// # Examples
/// ```
/// use protnet_core::z_score;
///
/// let expected = [1, 1, 2, 2, 2, 1, 1, 1];
/// let single_community = [1; 8];
/// assert_eq!(z_score(&expected, &single_community, 20, 7), Ok(0.0));
/// ```
pub fn z_score(
    expected: &[usize],
    generated: &[usize],
    num_trials: usize,
    seed: u64,
) -> Result<f64, SignificanceError> {
    z_score_with_backend(
        expected,
        generated,
        num_trials,
        seed,
        TrialBackend::preferred(),
    )
}

#[instrument(
    name = "significance.z_score",
    err,
    skip(expected, generated),
    fields(nodes = generated.len(), observed = tracing::field::Empty, z = tracing::field::Empty),
)]
pub(crate) fn z_score_with_backend(
    expected: &[usize],
    generated: &[usize],
    num_trials: usize,
    seed: u64,
    backend: TrialBackend,
) -> Result<f64, SignificanceError> {
    if num_trials == 0 {
        return Err(SignificanceError::InvalidTrialCount { got: num_trials });
    }
    if expected.len() != generated.len() {
        return Err(ScoringError::LengthMismatch {
            expected_len: expected.len(),
            generated_len: generated.len(),
        }
        .into());
    }
    let reference = DomainReference::new(expected)?;
    reference.check(generated)?;
    let observed = reference.score_unchecked(generated);
    Span::current().record("observed", observed);

    let samples = run_trials(&reference, generated, num_trials, seed, backend)?;
    let (mean, std_dev) = mean_and_std_dev(&samples);
    debug!(mean, std_dev, trials = samples.len(), "null distribution sampled");

    let z = standardise(observed, mean, std_dev)?;
    Span::current().record("z", z);
    Ok(z)
}

fn run_trials(
    reference: &DomainReference,
    generated: &[usize],
    num_trials: usize,
    seed: u64,
    backend: TrialBackend,
) -> Result<Vec<f64>, NullModelError> {
    let trial = |index: usize| -> Result<f64, NullModelError> {
        let mut rng = SmallRng::seed_from_u64(mix_trial_seed(seed, index));
        let model = generate_null_model(generated, &mut rng)?;
        Ok(reference.score_unchecked(model.as_slice()))
    };
    match backend {
        TrialBackend::Sequential => (0..num_trials).map(trial).collect(),
        #[cfg(feature = "parallel")]
        TrialBackend::Parallel => (0..num_trials).into_par_iter().map(trial).collect(),
    }
}

/// Mean and population standard deviation of a non-empty sample.
#[expect(
    clippy::cast_precision_loss,
    clippy::float_arithmetic,
    reason = "sample statistics are computed in floating point."
)]
fn mean_and_std_dev(samples: &[f64]) -> (f64, f64) {
    let count = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / count;
    let variance = samples
        .iter()
        .map(|sample| (sample - mean).powi(2))
        .sum::<f64>()
        / count;
    (mean, variance.sqrt())
}

#[expect(
    clippy::float_arithmetic,
    reason = "z-scores are computed in floating point."
)]
fn standardise(observed: f64, mean: f64, std_dev: f64) -> Result<f64, SignificanceError> {
    if (observed - mean).abs() <= CLOSE_ABSOLUTE + CLOSE_RELATIVE * mean.abs() {
        return Ok(0.0);
    }
    if std_dev == 0.0 {
        return Err(SignificanceError::DegenerateNullDistribution { observed, mean });
    }
    Ok((observed - mean) / std_dev)
}
