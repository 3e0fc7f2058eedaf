//! Error types for the select-search crate.

use select_core::SelectError;
use thiserror::Error;

/// Errors that can occur while searching and selecting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The search or init source failed.
    #[error("search source failed: {reason}")]
    Source {
        /// The reason reported by the source.
        reason: String,
    },

    /// The controller configuration is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// The reason the configuration was rejected.
        reason: String,
    },

    /// The background session is no longer running.
    #[error("search session closed")]
    SessionClosed,

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Selection data error.
    #[error(transparent)]
    Select(#[from] SelectError),
}

impl SearchError {
    /// Creates a source error.
    #[must_use]
    pub fn source_failed(reason: impl Into<String>) -> Self {
        Self::Source {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for search operations.
pub type SearchResult<T> = std::result::Result<T, SearchError>;
