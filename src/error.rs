//! Error types for simdvec operations.
//!
//! Safe entry points that can fail on caller input (slice lengths, buffer layouts,
//! allocation) return these instead of panicking.

use std::fmt;

/// Errors that can occur during simdvec operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimdError {
    /// Memory allocation failed.
    AllocationError {
        /// The size that was requested to be allocated.
        requested_size: usize,
        /// The alignment that was requested.
        requested_alignment: usize,
        /// Human-readable error message.
        message: String,
    },
    /// Invalid layout parameters were provided.
    LayoutError {
        /// The size parameter that caused the error.
        size: usize,
        /// The alignment parameter that caused the error.
        alignment: usize,
        /// Human-readable error message.
        message: String,
    },
    /// Input validation error.
    ValidationError {
        /// Human-readable error message.
        message: String,
    },
}

impl fmt::Display for SimdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimdError::AllocationError {
                requested_size,
                requested_alignment,
                message,
            } => write!(
                f,
                "Memory allocation failed: {message} (requested {requested_size} bytes with {requested_alignment} byte alignment)"
            ),
            SimdError::LayoutError {
                size,
                alignment,
                message,
            } => write!(
                f,
                "Invalid memory layout: {message} (size: {size}, alignment: {alignment})"
            ),
            SimdError::ValidationError { message } => {
                write!(f, "Validation error: {message}")
            }
        }
    }
}

impl std::error::Error for SimdError {}

/// Result type alias for simdvec operations.
pub type Result<T> = std::result::Result<T, SimdError>;

/// Creates an allocation error.
pub fn allocation_error(size: usize, alignment: usize, message: impl Into<String>) -> SimdError {
    SimdError::AllocationError {
        requested_size: size,
        requested_alignment: alignment,
        message: message.into(),
    }
}

/// Creates a layout error.
pub fn layout_error(size: usize, alignment: usize, message: impl Into<String>) -> SimdError {
    SimdError::LayoutError {
        size,
        alignment,
        message: message.into(),
    }
}

/// Creates a validation error.
pub fn validation_error(message: impl Into<String>) -> SimdError {
    SimdError::ValidationError {
        message: message.into(),
    }
}

/// Fails with a [`SimdError::ValidationError`] unless `len >= needed`.
pub(crate) fn ensure_len(what: &str, len: usize, needed: usize) -> Result<()> {
    if len < needed {
        return Err(validation_error(format!(
            "{what} holds {len} elements but {needed} are required"
        )));
    }
    Ok(())
}
