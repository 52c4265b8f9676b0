//! Error types for sqlfrag.

use crate::sanitize::SanitizeError;
use thiserror::Error;

/// Result type alias for builder operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors surfaced by builder mutators.
///
/// All operations are synchronous and deterministic; a failure is either a
/// programming error (wrong argument shape) or a data error (malformed
/// template or values) and is returned from the mutator that hit it. Nothing
/// is retried or suppressed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum QueryError {
    /// A builder method received an argument it cannot act on.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Propagated from the sanitizer, unchanged.
    #[error(transparent)]
    Sanitize(#[from] SanitizeError),
}

impl QueryError {
    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
