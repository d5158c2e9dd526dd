//! Error types for the tributary-store crate.

/// Error type for all fallible operations in the tributary-store crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// Returned when a flux, quantity, or capacity is negative or not a number.
    #[error("invariant violation: {name} must be non-negative, got {value}")]
    InvariantViolation {
        /// Name of the offending argument.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Returned when a batched argument does not match the array size.
    #[error("length mismatch: expected {expected} values, got {got}")]
    LengthMismatch {
        /// Number of stores in the array.
        expected: usize,
        /// Length of the supplied slice.
        got: usize,
    },

    /// Returned when a store index is outside the array.
    #[error("store index {index} out of range for array of {len}")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of stores in the array.
        len: usize,
    },
}

/// Rejects negative or NaN values.
///
/// Infinity is accepted here; callers that need finite fluxes use
/// [`check_flux`].
pub(crate) fn check_non_negative(name: &'static str, value: f64) -> Result<f64, StoreError> {
    if value.is_nan() || value < 0.0 {
        return Err(StoreError::InvariantViolation { name, value });
    }
    Ok(value)
}

/// Rejects negative, NaN, and infinite fluxes.
pub(crate) fn check_flux(name: &'static str, value: f64) -> Result<f64, StoreError> {
    if !value.is_finite() || value < 0.0 {
        return Err(StoreError::InvariantViolation { name, value });
    }
    Ok(value)
}
