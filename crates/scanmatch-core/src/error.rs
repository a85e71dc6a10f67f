//! Search error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which part of a batch request was empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyInput {
    Text,
    Queries,
}

impl std::fmt::Display for EmptyInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Queries => write!(f, "query list"),
        }
    }
}

/// Errors that reject a whole batch before any worker runs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Text or query list is empty; no meaningful search is possible
    #[error("empty input: {0} is empty")]
    EmptyInput(EmptyInput),

    /// Window sizes must be a non-empty range of positive integers
    #[error("invalid window sizes {min}..={max}: sizes must be positive and min <= max")]
    InvalidWindowSizes { min: usize, max: usize },

    /// Bucket thresholds must satisfy 0 < near < far
    #[error("invalid bucket thresholds: near={near}, far={far}")]
    InvalidThresholds { near: usize, far: usize },

    /// A substitution target would be rewritten again on a second pass
    #[error("invalid substitution {from:?} -> {to:?}: target must be a lower-case alphanumeric that is not also a source")]
    InvalidSubstitution { from: char, to: char },
}

/// Per-query failure marker. Never aborts sibling queries.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum QueryError {
    /// The query's unit panicked; carries the panic message
    #[error("query processing failed: {0}")]
    Processing(String),

    /// The batch deadline expired before the unit finished
    #[error("deadline exceeded before query completed")]
    TimedOut,
}

/// Result type for batch operations
pub type SearchResult<T> = Result<T, SearchError>;
