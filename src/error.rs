//! Typed errors for the listing engine.

use crate::models::PropertyId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FinderError>;

#[derive(Debug, Error)]
pub enum FinderError {
    /// Requested id is not in the catalog
    #[error("property not found: {id}")]
    NotFound { id: PropertyId },

    /// Catalog source could not be reached; callers may retry
    #[error("catalog source {source_name} unavailable: {reason}")]
    SourceUnavailable {
        source_name: &'static str,
        reason: String,
    },

    /// Catalog payload is not a list of properties
    #[error("invalid catalog data: {0}")]
    InvalidCatalog(#[from] serde_json::Error),

    /// Persisted saved-set could not be decoded. Recovered locally.
    #[error("malformed persisted state under {key}: {reason}")]
    MalformedPersistedState { key: String, reason: String },

    /// Filter field had an unexpected shape. Recovered locally.
    #[error("invalid filter field {field}: expected {expected}")]
    InvalidFilterField {
        field: &'static str,
        expected: &'static str,
    },

    /// Persistence adapter failed to read or write
    #[error("storage error: {0}")]
    Storage(String),

    /// No id left above the catalog's largest one
    #[error("no property id available after {last}")]
    IdSpaceExhausted { last: PropertyId },
}

impl FinderError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, FinderError::SourceUnavailable { .. })
    }
}
