//! Error types for the scanmatch front end.

use thiserror::Error;

/// Error type for loading input, configuring, and running a batch.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Batch rejected by the engine
    #[error("search error: {0}")]
    Search(#[from] scanmatch_core::SearchError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias using the scanmatch Error.
pub type Result<T> = std::result::Result<T, Error>;
