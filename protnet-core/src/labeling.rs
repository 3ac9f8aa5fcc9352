//! Labeling and partition types.
//!
//! A [`Labeling`] assigns every node a community id drawn from `1..=m` with
//! no gaps. A [`Partition`] stacks labelings of equal length, one per
//! hierarchy level with level 0 the coarsest. Both are validated on
//! construction and immutable afterwards.

use thiserror::Error;

use crate::error::define_error_codes;

/// Error returned when a labeling violates the contiguous-id invariant.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum LabelingError {
    /// The labeling contained no nodes.
    #[error("labeling contains no nodes")]
    Empty,
    /// A node carried the id `0`; community ids are 1-indexed.
    #[error("node {position} carries community id 0; ids start at 1")]
    ZeroId {
        /// Zero-based position of the offending node.
        position: usize,
    },
    /// Some id in `1..=max` never occurs.
    #[error("community ids must be contiguous: {missing} is absent but {max} is present")]
    Gap {
        /// Smallest id missing from the labeling.
        missing: usize,
        /// Largest id present in the labeling.
        max: usize,
    },
    /// A partition contained no levels.
    #[error("partition contains no levels")]
    NoLevels,
    /// Partition levels disagreed on the node count.
    #[error("partition level {level} has {len} nodes but level 0 has {expected}")]
    LevelLengthMismatch {
        /// Index of the offending level.
        level: usize,
        /// Node count of the offending level.
        len: usize,
        /// Node count of level 0.
        expected: usize,
    },
    /// A partition level was itself invalid.
    #[error("partition level {level} is invalid: {source}")]
    InvalidLevel {
        /// Index of the offending level.
        level: usize,
        /// Violation found in that level.
        #[source]
        source: Box<LabelingError>,
    },
}

define_error_codes! {
    /// Stable codes describing [`LabelingError`] variants.
    enum LabelingErrorCode for LabelingError {
        /// The labeling contained no nodes.
        Empty => Empty => "LABELING_EMPTY",
        /// A node carried the id `0`.
        ZeroId => ZeroId { .. } => "LABELING_ZERO_ID",
        /// Some id in `1..=max` never occurs.
        Gap => Gap { .. } => "LABELING_GAP",
        /// A partition contained no levels.
        NoLevels => NoLevels => "LABELING_NO_LEVELS",
        /// Partition levels disagreed on the node count.
        LevelLengthMismatch => LevelLengthMismatch { .. } => "LABELING_LEVEL_LENGTH_MISMATCH",
        /// A partition level was itself invalid.
        InvalidLevel => InvalidLevel { .. } => "LABELING_INVALID_LEVEL",
    }
}

/// Checks that `labels` uses exactly the ids `1..=m` and returns `m`.
///
/// This is the single gatekeeper every component calls before trusting an
/// externally supplied labeling.
///
/// # Errors
/// Returns [`LabelingError::Empty`] for an empty slice,
/// [`LabelingError::ZeroId`] when any id is `0`, and [`LabelingError::Gap`]
/// when some id between `1` and the maximum never occurs.
///
/// # Examples
/// ```
/// use protnet_core::{LabelingError, validate_labels};
///
/// assert_eq!(validate_labels(&[1, 1, 2, 3, 2]), Ok(3));
/// assert!(matches!(
///     validate_labels(&[1, 3]),
///     Err(LabelingError::Gap { missing: 2, max: 3 })
/// ));
/// ```
pub fn validate_labels(labels: &[usize]) -> Result<usize, LabelingError> {
    if labels.is_empty() {
        return Err(LabelingError::Empty);
    }
    if let Some(position) = labels.iter().position(|&id| id == 0) {
        return Err(LabelingError::ZeroId { position });
    }

    let max = labels.iter().copied().max().unwrap_or_default();
    // Ids above `len` cannot all be present, so the seen table stays bounded.
    let mut seen = vec![false; labels.len().min(max)];
    for &id in labels {
        if let Some(slot) = seen.get_mut(id - 1) {
            *slot = true;
        }
    }
    match seen.iter().position(|present| !present) {
        Some(index) => Err(LabelingError::Gap {
            missing: index + 1,
            max,
        }),
        None if max > labels.len() => Err(LabelingError::Gap {
            missing: labels.len() + 1,
            max,
        }),
        None => Ok(max),
    }
}

/// Counts positions where the id differs from the previous position.
///
/// The first position never counts as a boundary.
#[must_use]
pub fn count_boundaries(labels: &[usize]) -> usize {
    labels.windows(2).filter(|pair| pair[0] != pair[1]).count()
}

/// Per-node community assignment for one hierarchy level.
///
/// # Examples
/// ```
/// use protnet_core::Labeling;
///
/// let labeling = Labeling::try_new(vec![1, 1, 2, 2, 1]).expect("labels are contiguous");
/// assert_eq!(labeling.len(), 5);
/// assert_eq!(labeling.community_count(), 2);
/// assert_eq!(labeling.boundary_count(), 2);
/// assert_eq!(labeling.members(2), vec![2, 3]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Labeling {
    labels: Vec<usize>,
    community_count: usize,
}

impl Labeling {
    /// Validates `labels` and wraps them.
    ///
    /// # Errors
    /// Returns the [`LabelingError`] raised by [`validate_labels`].
    pub fn try_new(labels: Vec<usize>) -> Result<Self, LabelingError> {
        let community_count = validate_labels(&labels)?;
        Ok(Self {
            labels,
            community_count,
        })
    }

    /// Returns the ids in node order.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.labels
    }

    /// Number of nodes covered by the labeling.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always `false`; empty labelings are rejected on construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of distinct communities, i.e. the largest id.
    #[must_use]
    pub fn community_count(&self) -> usize {
        self.community_count
    }

    /// Number of positions at which the id changes along the node order.
    #[must_use]
    pub fn boundary_count(&self) -> usize {
        count_boundaries(&self.labels)
    }

    /// Zero-based positions of the nodes assigned to `community`.
    #[must_use]
    pub fn members(&self, community: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter_map(|(position, &id)| (id == community).then_some(position))
            .collect()
    }

    /// Consumes the labeling and returns the raw ids.
    #[must_use]
    pub fn into_inner(self) -> Vec<usize> {
        self.labels
    }
}

impl TryFrom<Vec<usize>> for Labeling {
    type Error = LabelingError;

    fn try_from(labels: Vec<usize>) -> Result<Self, Self::Error> {
        Self::try_new(labels)
    }
}

impl AsRef<[usize]> for Labeling {
    fn as_ref(&self) -> &[usize] {
        &self.labels
    }
}

/// Ordered stack of labelings, one per hierarchy level, coarsest first.
///
/// # Examples
/// ```
/// use protnet_core::Partition;
///
/// let partition = Partition::try_from_levels(vec![
///     vec![1, 1, 1, 2],
///     vec![1, 2, 2, 3],
/// ])
/// .expect("levels are valid");
/// assert_eq!(partition.depth(), 2);
/// assert_eq!(partition.node_count(), 4);
/// assert_eq!(partition.level(1).map(|level| level.community_count()), Some(3));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    levels: Vec<Labeling>,
}

impl Partition {
    /// Builds a partition from already validated labelings.
    ///
    /// # Errors
    /// Returns [`LabelingError::NoLevels`] when `levels` is empty and
    /// [`LabelingError::LevelLengthMismatch`] when the levels disagree on the
    /// node count.
    pub fn try_new(levels: Vec<Labeling>) -> Result<Self, LabelingError> {
        let expected = levels.first().ok_or(LabelingError::NoLevels)?.len();
        if let Some((level, labeling)) = levels
            .iter()
            .enumerate()
            .find(|(_, labeling)| labeling.len() != expected)
        {
            return Err(LabelingError::LevelLengthMismatch {
                level,
                len: labeling.len(),
                expected,
            });
        }
        Ok(Self { levels })
    }

    /// Validates raw per-level ids and builds a partition.
    ///
    /// # Errors
    /// Returns [`LabelingError::InvalidLevel`] naming the first level that
    /// breaks the contiguous-id invariant, or the errors of [`Self::try_new`].
    pub fn try_from_levels(levels: Vec<Vec<usize>>) -> Result<Self, LabelingError> {
        let labelings = levels
            .into_iter()
            .enumerate()
            .map(|(level, labels)| {
                Labeling::try_new(labels).map_err(|source| LabelingError::InvalidLevel {
                    level,
                    source: Box::new(source),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::try_new(labelings)
    }

    /// Returns the labeling at `level`, if present.
    #[must_use]
    pub fn level(&self, level: usize) -> Option<&Labeling> {
        self.levels.get(level)
    }

    /// Returns every level, coarsest first.
    #[must_use]
    pub fn levels(&self) -> &[Labeling] {
        &self.levels
    }

    /// Number of hierarchy levels.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Number of nodes shared by every level.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.levels.first().map_or(0, Labeling::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::single(vec![1], 1)]
    #[case::two_blocks(vec![1, 1, 2, 2], 2)]
    #[case::interleaved(vec![2, 1, 3, 1, 2], 3)]
    #[case::singletons(vec![4, 3, 2, 1], 4)]
    fn accepts_contiguous_labels(#[case] labels: Vec<usize>, #[case] expected: usize) {
        assert_eq!(validate_labels(&labels), Ok(expected));
    }

    #[rstest]
    #[case::empty(vec![], LabelingError::Empty)]
    #[case::zero(vec![1, 0, 2], LabelingError::ZeroId { position: 1 })]
    #[case::missing_one(vec![2, 2, 3], LabelingError::Gap { missing: 1, max: 3 })]
    #[case::inner_gap(vec![1, 2, 4, 4], LabelingError::Gap { missing: 3, max: 4 })]
    #[case::beyond_len(vec![1, 9], LabelingError::Gap { missing: 2, max: 9 })]
    fn rejects_invalid_labels(#[case] labels: Vec<usize>, #[case] expected: LabelingError) {
        assert_eq!(validate_labels(&labels), Err(expected));
    }

    #[rstest]
    #[case(vec![1], 0)]
    #[case(vec![1, 1, 1], 0)]
    #[case(vec![1, 2, 1], 2)]
    #[case(vec![1, 1, 2, 2, 3, 3, 1], 3)]
    fn counts_boundaries(#[case] labels: Vec<usize>, #[case] expected: usize) {
        assert_eq!(count_boundaries(&labels), expected);
    }

    #[test]
    fn partition_rejects_ragged_levels() {
        let err = Partition::try_from_levels(vec![vec![1, 1, 2], vec![1, 2]])
            .expect_err("ragged levels must fail");
        assert_eq!(
            err,
            LabelingError::LevelLengthMismatch {
                level: 1,
                len: 2,
                expected: 3,
            }
        );
    }

    #[test]
    fn partition_names_the_invalid_level() {
        let err = Partition::try_from_levels(vec![vec![1, 1], vec![1, 3]])
            .expect_err("gapped level must fail");
        assert_eq!(err.code(), LabelingErrorCode::InvalidLevel);
        assert!(matches!(err, LabelingError::InvalidLevel { level: 1, .. }));
    }

    #[test]
    fn partition_rejects_no_levels() {
        assert_eq!(Partition::try_new(Vec::new()), Err(LabelingError::NoLevels));
    }
}
