//! Benchmark setup error type.
//!
//! Aggregates the failures that may arise while preparing benchmark inputs
//! so setup functions can propagate them with `?`.

use crate::synthetic::SyntheticError;
use protnet_core::{InsightError, IsomorphismError};

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic input generation failed.
    #[error("synthetic input generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// Analysis configuration or execution failed.
    #[error("analysis failed: {0}")]
    Insight(#[from] InsightError),
    /// Reduced-graph construction or comparison failed.
    #[error("isomorphism operation failed: {0}")]
    Isomorphism(#[from] IsomorphismError),
}
