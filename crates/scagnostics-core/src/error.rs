//! Error types for scagnostics-core
//!
//! Errors are only raised at the boundary of a `compute` call:
//! - Malformed caller input (mismatched lengths, too few points)
//! - Input of a shape the engine does not accept
//! - Invalid configuration
//!
//! Degenerate geometry (collinear points, duplicate coordinates, empty bins)
//! is never an error; it maps to documented sentinel values instead.

use thiserror::Error;

/// Main error type for scagnostics operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScagnosticsError {
    /// Malformed caller input
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Input of a shape the engine boundary does not accept
    #[error("Unsupported input: {0}")]
    UnsupportedInput(#[from] UnsupportedInputError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors related to malformed coordinate sequences
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInputError {
    /// x and y have different lengths
    #[error("x and y must have the same length (x: {x_len}, y: {y_len})")]
    LengthMismatch { x_len: usize, y_len: usize },

    /// Fewer observations than the engine needs
    #[error("at least {min} points are required, got {count}")]
    TooFewPoints { count: usize, min: usize },

    /// Too few observations survive the finite filter
    #[error("only {finite} of {total} points have finite coordinates (at least 2 required)")]
    TooFewFinitePoints { finite: usize, total: usize },
}

/// Errors related to input shape
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnsupportedInputError {
    /// Points with other than two coordinates
    #[error("points must have exactly 2 coordinates, got {dims}; use the pairwise driver for tables")]
    Dimensions { dims: usize },

    /// A table needs at least two columns to form a pair
    #[error("table must have at least 2 columns, got {count}")]
    TooFewColumns { count: usize },

    /// A column that cannot be coerced to numbers
    #[error("column '{name}' has non-numeric type {dtype}")]
    NonNumericColumn { name: String, dtype: String },

    /// Columns with different lengths
    #[error("column '{name}' has {len} values, expected {expected}")]
    RaggedColumns {
        name: String,
        len: usize,
        expected: usize,
    },
}

/// Result type alias for scagnostics operations
pub type ScagResult<T> = Result<T, ScagnosticsError>;

/// Validation utilities
pub mod validation {
    use super::*;

    /// Validate that two coordinate sequences can be paired
    pub fn validate_pair(x_len: usize, y_len: usize) -> Result<(), InvalidInputError> {
        if x_len != y_len {
            return Err(InvalidInputError::LengthMismatch { x_len, y_len });
        }
        if x_len < 2 {
            return Err(InvalidInputError::TooFewPoints {
                count: x_len,
                min: 2,
            });
        }
        Ok(())
    }

    /// Validate the width of row-major point input
    pub fn validate_dimensions(dims: usize) -> Result<(), UnsupportedInputError> {
        if dims != 2 {
            return Err(UnsupportedInputError::Dimensions { dims });
        }
        Ok(())
    }
}
