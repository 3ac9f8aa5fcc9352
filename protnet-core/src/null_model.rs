//! Randomised 1-D null models for significance testing.
//!
//! A null model keeps three statistics of its source labeling: the node
//! count, the number of boundaries (positions where the id changes) and the
//! number of distinct communities. Boundary positions are drawn uniformly
//! without replacement from the interior cut points and the resulting
//! segments are coloured so that every community appears and no two
//! neighbouring segments share an id.
//!
//! Segment colouring is constructive: each segment draws uniformly from the
//! ids that differ from its predecessor, unless the segments left are exactly
//! as many as the communities not yet used, in which case it draws from those
//! unused communities. Both rules always leave a valid choice, so generation
//! never retries.

use rand::{Rng, seq::index};
use thiserror::Error;
use tracing::error;

use crate::{
    error::define_error_codes,
    labeling::{Labeling, LabelingError, count_boundaries, validate_labels},
};

/// Errors raised while generating a null model.
#[non_exhaustive]
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum NullModelError {
    /// The source labeling broke the contiguous-id invariant.
    #[error("null-model source is invalid: {source}")]
    InvalidSource {
        /// Violation found in the source labeling.
        #[source]
        source: LabelingError,
    },
    /// A generated model failed its postcondition; this is a logic defect.
    #[error("null model violated `{invariant}`: expected {expected}, got {actual}")]
    InternalConsistency {
        /// Name of the violated postcondition.
        invariant: &'static str,
        /// Value carried by the source labeling.
        expected: usize,
        /// Value carried by the generated model.
        actual: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`NullModelError`] variants.
    enum NullModelErrorCode for NullModelError {
        /// The source labeling broke the contiguous-id invariant.
        InvalidSource => InvalidSource { .. } => "NULL_MODEL_INVALID_SOURCE",
        /// A generated model failed its postcondition.
        InternalConsistency => InternalConsistency { .. } => "NULL_MODEL_INTERNAL_CONSISTENCY",
    }
}

/// Draws a null model of `source`.
///
/// # Errors
/// Returns [`NullModelError::InvalidSource`] when `source` is empty or its
/// ids are not exactly `1..=m`, and [`NullModelError::InternalConsistency`]
/// if the generated model does not preserve the node count, the community
/// count and the boundary count of the source.
///
/// # Examples
/// ```
/// use protnet_core::generate_null_model;
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let source = [1, 1, 1, 2, 2, 3, 3, 3, 1, 1];
/// let mut rng = SmallRng::seed_from_u64(7);
/// let model = generate_null_model(&source, &mut rng).expect("source is valid");
/// assert_eq!(model.len(), source.len());
/// assert_eq!(model.community_count(), 3);
/// assert_eq!(model.boundary_count(), 3);
/// ```
pub fn generate_null_model<R: Rng + ?Sized>(
    source: &[usize],
    rng: &mut R,
) -> Result<Labeling, NullModelError> {
    let communities =
        validate_labels(source).map_err(|source| NullModelError::InvalidSource { source })?;
    let node_count = source.len();
    let boundaries = count_boundaries(source);

    let mut cuts: Vec<usize> = if boundaries == 0 {
        Vec::new()
    } else {
        index::sample(rng, node_count - 1, boundaries)
            .into_iter()
            .map(|cut| cut + 1)
            .collect()
    };
    cuts.sort_unstable();

    let segment_ids = colour_segments(boundaries + 1, communities, rng);
    let mut model = Vec::with_capacity(node_count);
    let ends = cuts.iter().copied().chain(std::iter::once(node_count));
    let mut start = 0;
    for (end, &id) in ends.zip(&segment_ids) {
        model.extend(std::iter::repeat_n(id, end - start));
        start = end;
    }

    #[cfg(feature = "metrics")]
    metrics::counter!("protnet_null_models_generated").increment(1);

    check_postconditions(model, node_count, communities, boundaries)
}

fn colour_segments<R: Rng + ?Sized>(segments: usize, communities: usize, rng: &mut R) -> Vec<usize> {
    let mut unused: Vec<usize> = (1..=communities).collect();
    let mut ids = Vec::with_capacity(segments);
    let mut previous = None;
    for slot in 0..segments {
        let remaining = segments - slot;
        let id = if unused.len() >= remaining && !unused.is_empty() {
            let pick = rng.gen_range(0..unused.len());
            unused.swap_remove(pick)
        } else {
            let id = draw_excluding(communities, previous, rng);
            if let Some(position) = unused.iter().position(|&candidate| candidate == id) {
                unused.swap_remove(position);
            }
            id
        };
        ids.push(id);
        previous = Some(id);
    }
    ids
}

/// Draws uniformly from `1..=communities`, skipping `excluded` when another
/// id is available.
fn draw_excluding<R: Rng + ?Sized>(
    communities: usize,
    excluded: Option<usize>,
    rng: &mut R,
) -> usize {
    match excluded {
        Some(skip) if communities > 1 => {
            let draw = rng.gen_range(1..communities);
            if draw >= skip { draw + 1 } else { draw }
        }
        _ => rng.gen_range(1..=communities.max(1)),
    }
}

fn check_postconditions(
    model: Vec<usize>,
    node_count: usize,
    communities: usize,
    boundaries: usize,
) -> Result<Labeling, NullModelError> {
    let violation = |invariant: &'static str, expected: usize, actual: usize| {
        error!(invariant, expected, actual, "null model postcondition violated");
        NullModelError::InternalConsistency {
            invariant,
            expected,
            actual,
        }
    };

    if model.len() != node_count {
        return Err(violation("node count", node_count, model.len()));
    }
    let generated_boundaries = count_boundaries(&model);
    if generated_boundaries != boundaries {
        return Err(violation("boundary count", boundaries, generated_boundaries));
    }
    let labeling = Labeling::try_new(model).map_err(|_| violation("contiguous ids", communities, 0))?;
    if labeling.community_count() != communities {
        return Err(violation(
            "community count",
            communities,
            labeling.community_count(),
        ));
    }
    Ok(labeling)
}
