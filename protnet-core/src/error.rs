//! Error types for the protnet core library.
//!
//! Hosts the code-generation macro shared by every component error and the
//! orchestration error returned by [`crate::Insight`].

use thiserror::Error;

use crate::{
    builder::ExecutionStrategy, graph_metrics::GraphMetricsError, labeling::LabelingError,
    null_model::NullModelError, scoring::ScoringError, significance::SignificanceError,
};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl ::std::fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

pub(crate) use define_error_codes;

/// Error type produced when configuring or running [`crate::Insight`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum InsightError {
    /// The significance loop needs at least one trial.
    #[error("num_trials must be at least 1 (got {got})")]
    InvalidTrialCount {
        /// The trial count supplied by the caller.
        got: usize,
    },
    /// The requested execution strategy is unavailable in the current build.
    #[error("the requested execution strategy `{requested}` is not available in this build")]
    BackendUnavailable {
        /// Strategy that could not be satisfied by the current build.
        requested: ExecutionStrategy,
    },
    /// A labeling or partition violated the contiguous-id invariant.
    #[error(transparent)]
    Labeling(#[from] LabelingError),
    /// Modified Jaccard scoring rejected its inputs.
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    /// Null-model generation failed.
    #[error(transparent)]
    NullModel(#[from] NullModelError),
    /// The z-score could not be computed.
    #[error(transparent)]
    Significance(#[from] SignificanceError),
    /// Conductance or modularity rejected its inputs.
    #[error(transparent)]
    GraphMetrics(#[from] GraphMetricsError),
}

define_error_codes! {
    /// Stable codes describing [`InsightError`] variants.
    enum InsightErrorCode for InsightError {
        /// The significance loop needs at least one trial.
        InvalidTrialCount => InvalidTrialCount { .. } => "INSIGHT_INVALID_TRIAL_COUNT",
        /// The requested execution strategy is unavailable in the current build.
        BackendUnavailable => BackendUnavailable { .. } => "INSIGHT_BACKEND_UNAVAILABLE",
        /// A labeling or partition violated the contiguous-id invariant.
        Labeling => Labeling(..) => "INSIGHT_LABELING",
        /// Modified Jaccard scoring rejected its inputs.
        Scoring => Scoring(..) => "INSIGHT_SCORING",
        /// Null-model generation failed.
        NullModel => NullModel(..) => "INSIGHT_NULL_MODEL",
        /// The z-score could not be computed.
        Significance => Significance(..) => "INSIGHT_SIGNIFICANCE",
        /// Conductance or modularity rejected its inputs.
        GraphMetrics => GraphMetrics(..) => "INSIGHT_GRAPH_METRICS",
    }
}

impl InsightError {
    /// Retrieve the code of the wrapped component error, if any.
    ///
    /// Configuration errors raised by [`crate::InsightBuilder`] carry no
    /// component code.
    #[must_use]
    pub fn source_code(&self) -> Option<&'static str> {
        match self {
            Self::Labeling(error) => Some(error.code().as_str()),
            Self::Scoring(error) => Some(error.code().as_str()),
            Self::NullModel(error) => Some(error.code().as_str()),
            Self::Significance(error) => Some(error.code().as_str()),
            Self::GraphMetrics(error) => Some(error.code().as_str()),
            Self::InvalidTrialCount { .. } | Self::BackendUnavailable { .. } => None,
        }
    }
}

/// Convenient alias for results returned by the orchestration API.
pub type Result<T> = core::result::Result<T, InsightError>;
