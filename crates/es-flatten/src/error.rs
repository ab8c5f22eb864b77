//! Flattening Error Types

use thiserror::Error;

/// Errors while flattening one result document.
#[derive(Debug, Error)]
pub enum FlattenError {
    /// Document has no `hits.hits` array
    #[error("document has no hits.hits array")]
    MissingHits,

    /// Hit list is empty, so no header row can be derived
    #[error("document contains no results")]
    NoResults,

    /// A hit has no `_source` object
    #[error("hit {index} has no _source object")]
    MissingSource { index: usize },

    /// Underlying I/O failure
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Document is not valid JSON
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialization failure
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
