//! Error types for the rating matrix and its loader.
//!
//! Only two failures belong to the recommendation core itself:
//! ragged matrix rows (`DimensionMismatch`) and a target user outside
//! the matrix (`InvalidUser`). The remaining variants are raised by the
//! CSV loader before a matrix ever exists.

use thiserror::Error;

/// Errors that can occur while building or querying a rating matrix
#[derive(Error, Debug)]
pub enum RatingsError {
    /// A row does not have the same number of items as the first row
    #[error("Row {row} has {found} items but the matrix has {expected}")]
    DimensionMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Target user index is outside `[0, user_count)`
    #[error("User index {index} is out of range (matrix has {user_count} users)")]
    InvalidUser { index: usize, user_count: usize },

    /// Ratings file could not be found
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading the ratings file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line of the ratings file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    Parse {
        file: String,
        line: usize,
        reason: String,
    },

    /// A field parsed but holds a value outside the rating domain
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Convenience type alias for Results across the workspace
pub type Result<T> = std::result::Result<T, RatingsError>;
