//! Information-theoretic comparison of two labelings.
//!
//! Provides Shannon entropy, mutual information and the arithmetic-mean
//! normalised mutual information `2 I(A, B) / (H(A) + H(B))` described by
//! Ronhovde & Nussinov (Phys. Rev. E 80, 016109, 2009).

use std::collections::HashMap;

use thiserror::Error;

use crate::error::define_error_codes;

/// Errors raised while computing information metrics.
#[non_exhaustive]
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum InformationError {
    /// The labelings had different lengths.
    #[error("label length mismatch: left={left_len}, right={right_len}")]
    LengthMismatch {
        /// Number of labels on the left.
        left_len: usize,
        /// Number of labels on the right.
        right_len: usize,
    },
    /// The labelings contained no nodes.
    #[error("labelings must not be empty")]
    Empty,
}

define_error_codes! {
    /// Stable codes describing [`InformationError`] variants.
    enum InformationErrorCode for InformationError {
        /// The labelings had different lengths.
        LengthMismatch => LengthMismatch { .. } => "INFORMATION_LENGTH_MISMATCH",
        /// The labelings contained no nodes.
        Empty => Empty => "INFORMATION_EMPTY",
    }
}

type CommunityCounts = HashMap<usize, usize>;
type PairCounts = HashMap<(usize, usize), usize>;

/// Marginal and joint community sizes of two labelings.
struct Contingency {
    item_count: usize,
    left: CommunityCounts,
    right: CommunityCounts,
    pairs: PairCounts,
}

impl Contingency {
    fn left_entropy(&self) -> f64 {
        entropy_from_counts(self.left.values().copied(), self.item_count)
    }

    fn right_entropy(&self) -> f64 {
        entropy_from_counts(self.right.values().copied(), self.item_count)
    }

    /// `I(A, B) = H(A) + H(B) - H(A, B)`, clamped at zero against rounding.
    #[expect(
        clippy::float_arithmetic,
        reason = "mutual information requires floating-point arithmetic."
    )]
    fn mutual_information(&self) -> f64 {
        let joint = entropy_from_counts(self.pairs.values().copied(), self.item_count);
        (self.left_entropy() + self.right_entropy() - joint).max(0.0)
    }
}

fn validate_lengths(left: &[usize], right: &[usize]) -> Result<usize, InformationError> {
    if left.len() != right.len() {
        return Err(InformationError::LengthMismatch {
            left_len: left.len(),
            right_len: right.len(),
        });
    }
    if left.is_empty() {
        return Err(InformationError::Empty);
    }
    Ok(left.len())
}

fn community_counts(labels: &[usize]) -> CommunityCounts {
    let mut counts = CommunityCounts::new();
    for &label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
}

fn build_contingency(left: &[usize], right: &[usize]) -> Result<Contingency, InformationError> {
    let item_count = validate_lengths(left, right)?;
    let mut table = Contingency {
        item_count,
        left: CommunityCounts::new(),
        right: CommunityCounts::new(),
        pairs: PairCounts::new(),
    };
    for (&left_label, &right_label) in left.iter().zip(right) {
        *table.left.entry(left_label).or_insert(0) += 1;
        *table.right.entry(right_label).or_insert(0) += 1;
        *table.pairs.entry((left_label, right_label)).or_insert(0) += 1;
    }
    Ok(table)
}

#[expect(
    clippy::cast_precision_loss,
    clippy::float_arithmetic,
    reason = "entropy computation requires floating-point arithmetic."
)]
fn entropy_from_counts(counts: impl Iterator<Item = usize>, item_count: usize) -> f64 {
    let item_count_f64 = item_count as f64;
    counts
        .map(|count| {
            let probability = count as f64 / item_count_f64;
            -probability * probability.ln()
        })
        .sum()
}

/// Shannon entropy `H = -sum_i (n_i / N) ln(n_i / N)` of a labeling.
///
/// # Errors
/// Returns [`InformationError::Empty`] for an empty labeling.
///
/// # Examples
/// ```
/// use protnet_core::shannon_entropy;
///
/// let h = shannon_entropy(&[1, 1, 2, 2]).expect("labeling is not empty");
/// assert!((h - std::f64::consts::LN_2).abs() < 1e-12);
/// ```
pub fn shannon_entropy(labels: &[usize]) -> Result<f64, InformationError> {
    if labels.is_empty() {
        return Err(InformationError::Empty);
    }
    Ok(entropy_from_counts(
        community_counts(labels).into_values(),
        labels.len(),
    ))
}

/// Mutual information `I(A, B)` between two labelings of the same nodes.
///
/// # Errors
/// Returns [`InformationError::LengthMismatch`] or [`InformationError::Empty`]
/// for mis-shaped inputs.
pub fn mutual_information(left: &[usize], right: &[usize]) -> Result<f64, InformationError> {
    Ok(build_contingency(left, right)?.mutual_information())
}

/// Normalised mutual information `2 I(A, B) / (H(A) + H(B))`.
///
/// Two single-community labelings share all (zero) information and score
/// `1.0`.
///
/// # Errors
/// Returns [`InformationError::LengthMismatch`] or [`InformationError::Empty`]
/// for mis-shaped inputs.
#[expect(
    clippy::float_arithmetic,
    reason = "NMI definition requires floating-point arithmetic."
)]
pub fn normalized_mutual_information(
    left: &[usize],
    right: &[usize],
) -> Result<f64, InformationError> {
    let table = build_contingency(left, right)?;
    let entropy_sum = table.left_entropy() + table.right_entropy();
    if entropy_sum == 0.0 {
        return Ok(1.0);
    }
    Ok(2.0 * table.mutual_information() / entropy_sum)
}
