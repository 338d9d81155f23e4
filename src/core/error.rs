//! Error handling logic

use thiserror::Error;

/// Error types raised by the state containers.
///
/// Every variant is raised synchronously at the point of detection. The
/// operations are deterministic functions over caller-supplied arrays, so
/// none of these failures is transient.
#[derive(Debug, Clone, PartialEq, Eq, Error)] // Eq useful for testing error variants
pub enum StateError {
    /// Two containers that must share a shape do not.
    /// Raised by `inner`, `outer` and `align`.
    #[error("Shape Mismatch in {operation}: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        /// Name of the failing operation
        operation: String,
        /// Shape of the left-hand (`self`) container
        expected: Vec<usize>,
        /// Shape of the right-hand container
        found: Vec<usize>,
    },

    /// Parallel sequences disagree in length, e.g. coefficients versus state rows.
    #[error("Invalid Length: {message}")]
    InvalidLength {
        /// InvalidLength failure message
        message: String,
    },

    /// An argument value outside of the accepted set.
    #[error("Invalid Argument: {message}")]
    InvalidArgument {
        /// InvalidArgument failure message
        message: String,
    },

    /// A row with zero norm cannot be rescaled.
    #[error("Zero Norm: state {row} has zero norm and cannot be normalized")]
    ZeroNorm {
        /// Index of the first offending row
        row: usize,
    },

    /// A selection refers to a row that does not exist.
    #[error("Index Out Of Bounds: index {index} is invalid for {len} entries")]
    IndexOutOfBounds {
        /// The offending index
        index: usize,
        /// Number of available entries
        len: usize,
    },

    /// A post-hoc check from [`crate::validation`] failed.
    #[error("Validation Failure: {message}")]
    Validation {
        /// Validation failure message
        message: String,
    },
}

impl StateError {
    pub(crate) fn shape_mismatch(operation: &str, expected: &[usize], found: &[usize]) -> Self {
        StateError::ShapeMismatch {
            operation: operation.to_string(),
            expected: expected.to_vec(),
            found: found.to_vec(),
        }
    }
}
