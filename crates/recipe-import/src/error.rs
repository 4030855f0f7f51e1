//! Typed errors for the import crate.

use std::path::PathBuf;

use recipe_query::QueryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a top-level JSON array of recipes, found {0}")]
    NotAnArray(&'static str),

    #[error("record {index}: field '{field}' {reason}")]
    InvalidField {
        index: usize,
        field: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Store(#[from] QueryError),
}
