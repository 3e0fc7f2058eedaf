//! Error types for the select-core crate.

use thiserror::Error;

/// Errors that can occur while handling selection data.
///
/// Reconciliation itself never fails: unknown ids are dropped and duplicate ids
/// collapse. Only textual inputs such as persisted filter queries can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    /// A persisted filter query could not be decoded.
    #[error("malformed filter query '{query}': {reason}")]
    MalformedQuery {
        /// The offending query text.
        query: String,
        /// The reason the query was rejected.
        reason: String,
    },
}

/// Result type for selection operations.
pub type Result<T> = std::result::Result<T, SelectError>;
