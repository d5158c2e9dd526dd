//! Error types for the tributary-runoff crate.

use tributary_store::StoreError;

/// Error type for all fallible operations in the tributary-runoff crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RunoffError {
    /// Wraps an invariant violation raised by an underlying store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Returned when partial area fractions do not sum to one.
    #[error("partial area fractions must sum to 1.0, got {sum}")]
    FractionSum {
        /// The actual sum of the supplied fractions.
        sum: f64,
    },

    /// Returned when a per-bucket array has the wrong number of entries.
    #[error("bucket count mismatch: expected {expected}, got {got}")]
    BucketCountMismatch {
        /// Number of buckets in the model.
        expected: usize,
        /// Length of the supplied array.
        got: usize,
    },

    /// Returned when a scalar parameter is outside its valid range.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a catchment area is not finite and positive.
    #[error("invalid catchment area: {value} (must be finite and > 0)")]
    InvalidArea {
        /// The rejected area.
        value: f64,
    },
}
