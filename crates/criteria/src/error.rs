//! Error types for the criteria crate.

use thiserror::Error;

/// Errors that can occur when building criteria or aggregating results.
#[derive(Debug, Error)]
pub enum CriteriaError {
    /// Invalid regular expression pattern.
    #[error("invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A numeric aggregate met a value that is not a number.
    #[error("field '{field}' is not numeric (found {kind})")]
    NotNumeric { field: String, kind: &'static str },

    /// An extremum aggregate met values that have no common ordering.
    #[error("field '{field}' has values that cannot be compared ({left} vs {right})")]
    Incomparable {
        field: String,
        left: &'static str,
        right: &'static str,
    },

    /// Sort direction text was neither `asc` nor `desc`.
    #[error("invalid sort direction '{0}' (expected asc or desc)")]
    InvalidDirection(String),
}

/// Result type for criteria operations.
pub type Result<T> = std::result::Result<T, CriteriaError>;
