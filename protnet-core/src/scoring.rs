//! Modified weighted Jaccard scoring against reference domain labelings.
//!
//! For every reference domain `d >= 2` the generated modules overlapping the
//! domain are collected. Each module contributes its Jaccard index with the
//! domain, weighted by the size of the overlap; the domain score is that
//! weighted mean and the final score is the plain mean over domains. The
//! reference id `1` marks nodes outside any known domain and is never scored.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, instrument};

use crate::{
    error::define_error_codes,
    labeling::{LabelingError, Partition, validate_labels},
};

/// Reference id reserved for nodes that lie outside every known domain.
pub const NO_DOMAIN: usize = 1;

/// Errors raised while scoring a generated labeling against a reference.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ScoringError {
    /// One of the labelings contained no nodes.
    #[error("labelings must not be empty")]
    Empty,
    /// Reference and generated labelings differ in length.
    #[error("label length mismatch: expected={expected_len}, generated={generated_len}")]
    LengthMismatch {
        /// Number of reference labels.
        expected_len: usize,
        /// Number of generated labels.
        generated_len: usize,
    },
    /// The reference labeling broke the contiguous-id invariant.
    #[error("reference labeling is invalid: {source}")]
    InvalidReference {
        /// Violation found in the reference labeling.
        #[source]
        source: LabelingError,
    },
    /// The reference marks every node as outside any domain.
    #[error("reference labeling contains no domains (every id is {NO_DOMAIN})")]
    NoReferenceDomains,
    /// The generated labeling broke the contiguous-id invariant.
    #[error("generated labeling is invalid: {source}")]
    InvalidGenerated {
        /// Violation found in the generated labeling.
        #[source]
        source: LabelingError,
    },
}

define_error_codes! {
    /// Stable codes describing [`ScoringError`] variants.
    enum ScoringErrorCode for ScoringError {
        /// One of the labelings contained no nodes.
        Empty => Empty => "SCORING_EMPTY",
        /// Reference and generated labelings differ in length.
        LengthMismatch => LengthMismatch { .. } => "SCORING_LENGTH_MISMATCH",
        /// The reference labeling broke the contiguous-id invariant.
        InvalidReference => InvalidReference { .. } => "SCORING_INVALID_REFERENCE",
        /// The reference marks every node as outside any domain.
        NoReferenceDomains => NoReferenceDomains => "SCORING_NO_REFERENCE_DOMAINS",
        /// The generated labeling broke the contiguous-id invariant.
        InvalidGenerated => InvalidGenerated { .. } => "SCORING_INVALID_GENERATED",
    }
}

/// Reference domains indexed once so many candidates can be scored cheaply.
#[derive(Clone, Debug)]
pub(crate) struct DomainReference {
    len: usize,
    domains: Vec<Vec<usize>>,
}

impl DomainReference {
    pub(crate) fn new(expected: &[usize]) -> Result<Self, ScoringError> {
        if expected.is_empty() {
            return Err(ScoringError::Empty);
        }
        let distinct = validate_labels(expected)
            .map_err(|source| ScoringError::InvalidReference { source })?;
        if distinct < 2 {
            return Err(ScoringError::NoReferenceDomains);
        }

        let mut by_id: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (position, &id) in expected.iter().enumerate() {
            if id != NO_DOMAIN {
                by_id.entry(id).or_default().push(position);
            }
        }
        Ok(Self {
            len: expected.len(),
            domains: by_id.into_values().collect(),
        })
    }

    pub(crate) fn domain_count(&self) -> usize {
        self.domains.len()
    }

    /// Checks `generated` against this reference before scoring.
    pub(crate) fn check(&self, generated: &[usize]) -> Result<(), ScoringError> {
        if generated.is_empty() {
            return Err(ScoringError::Empty);
        }
        if generated.len() != self.len {
            return Err(ScoringError::LengthMismatch {
                expected_len: self.len,
                generated_len: generated.len(),
            });
        }
        validate_labels(generated)
            .map(|_| ())
            .map_err(|source| ScoringError::InvalidGenerated { source })
    }

    /// Scores a labeling already accepted by [`Self::check`].
    #[expect(
        clippy::cast_precision_loss,
        clippy::float_arithmetic,
        reason = "Jaccard ratios are computed from node counts in floating point."
    )]
    pub(crate) fn score_unchecked(&self, generated: &[usize]) -> f64 {
        let mut module_sizes: BTreeMap<usize, usize> = BTreeMap::new();
        for &id in generated {
            *module_sizes.entry(id).or_insert(0) += 1;
        }

        let mut total = 0.0_f64;
        for positions in &self.domains {
            let mut overlaps: BTreeMap<usize, usize> = BTreeMap::new();
            for &position in positions {
                *overlaps.entry(generated[position]).or_insert(0) += 1;
            }

            let domain_size = positions.len() as f64;
            let mut domain_score = 0.0_f64;
            for (module, intersection) in overlaps {
                let module_size = module_sizes.get(&module).copied().unwrap_or(intersection);
                let union = positions.len() + module_size - intersection;
                let jaccard = intersection as f64 / union as f64;
                domain_score += jaccard * (intersection as f64 / domain_size);
            }
            total += domain_score;
        }
        total / self.domains.len() as f64
    }
}

/// Computes the modified weighted Jaccard index of `generated` against the
/// reference labeling `expected`.
///
/// # Errors
/// Returns [`ScoringError::Empty`] or [`ScoringError::LengthMismatch`] for
/// mis-shaped inputs, [`ScoringError::InvalidReference`] when the reference
/// ids are not exactly `1..=m`, [`ScoringError::NoReferenceDomains`] when every
/// reference id is [`NO_DOMAIN`], and [`ScoringError::InvalidGenerated`] when
/// the generated labeling is not contiguous.
///
/// # Examples
/// ```
/// use protnet_core::modified_jaccard;
///
/// let mut expected = vec![1; 40];
/// expected.extend([2; 20]);
/// expected.extend([1; 40]);
///
/// let mut generated = vec![1; 40];
/// generated.extend([2; 30]);
/// generated.extend([3; 10]);
/// generated.extend([4; 20]);
///
/// let score = modified_jaccard(&expected, &generated).expect("inputs are valid");
/// assert!((score - 2.0 / 3.0).abs() < 1e-12);
/// ```
#[instrument(
    name = "scoring.modified_jaccard",
    level = "debug",
    err,
    skip(expected, generated),
    fields(nodes = expected.len()),
)]
pub fn modified_jaccard(expected: &[usize], generated: &[usize]) -> Result<f64, ScoringError> {
    if expected.len() != generated.len() {
        return Err(ScoringError::LengthMismatch {
            expected_len: expected.len(),
            generated_len: generated.len(),
        });
    }
    let reference = DomainReference::new(expected)?;
    reference.check(generated)?;
    let score = reference.score_unchecked(generated);
    debug!(domains = reference.domain_count(), score, "scored labeling");
    Ok(score)
}

/// Level of a partition that best reproduces the reference domains.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelMatch {
    /// Index of the level, coarsest first.
    pub level: usize,
    /// Modified Jaccard of that level.
    pub jaccard: f64,
}

/// Scores every level of `partition` and returns the best one.
///
/// Ties keep the coarser level.
///
/// # Errors
/// Returns the errors of [`modified_jaccard`] for the first level that
/// cannot be scored.
#[instrument(
    name = "scoring.best_matching_level",
    err,
    skip(expected, partition),
    fields(levels = partition.depth()),
)]
pub fn best_matching_level(
    expected: &[usize],
    partition: &Partition,
) -> Result<LevelMatch, ScoringError> {
    let reference = DomainReference::new(expected)?;
    let mut best: Option<LevelMatch> = None;
    for (level, labeling) in partition.levels().iter().enumerate() {
        reference.check(labeling.as_slice())?;
        let jaccard = reference.score_unchecked(labeling.as_slice());
        debug!(level, jaccard, "level scored");
        if best.is_none_or(|current| jaccard > current.jaccard) {
            best = Some(LevelMatch { level, jaccard });
        }
    }
    // Partitions always hold at least one level.
    best.ok_or(ScoringError::Empty)
}
