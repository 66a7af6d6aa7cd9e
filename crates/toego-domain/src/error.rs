//! Error types for the shared data model.

use thiserror::Error;

/// Result type alias for domain operations
pub type DomainResult<T> = std::result::Result<T, DomainError>;

/// Errors raised by the shared data model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Span is out of order, out of bounds, or off a character boundary
    #[error("invalid span [{start}, {end}) for document of {len} bytes")]
    InvalidSpan {
        start: usize,
        end: usize,
        len: usize,
    },

    /// A mark's text snapshot no longer matches the document under its span
    #[error("span text mismatch: expected {expected:?}, found {found:?}")]
    TextMismatch { expected: String, found: String },

    /// Marks resolve exactly once
    #[error("mark {id} is already resolved")]
    AlreadyResolved { id: String },
}
