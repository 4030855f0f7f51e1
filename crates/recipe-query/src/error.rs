//! Typed errors for the query crate.

use thiserror::Error;

/// Errors raised while decoding a request or running it against the store.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A comparison filter (`rating`, `total_time`) is not `<op><number>`.
    #[error("invalid filter '{param}': {reason}")]
    InvalidFilterEncoding { param: &'static str, reason: String },

    /// `page` or `limit` is not a positive integer.
    #[error("invalid pagination '{param}': expected a positive integer, got '{value}'")]
    InvalidPagination { param: &'static str, value: String },

    /// `sort` or `order` names something we cannot order by.
    #[error("invalid sort '{param}': unsupported value '{value}'")]
    InvalidSort { param: &'static str, value: String },

    /// The builder received an operator outside `>`, `<`, `=`.
    #[error("unsupported comparison operator '{0}'")]
    UnsupportedOperator(String),

    /// The backing store failed or could not be reached.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl QueryError {
    /// True for errors the caller can fix by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            QueryError::InvalidFilterEncoding { .. }
                | QueryError::InvalidPagination { .. }
                | QueryError::InvalidSort { .. }
        )
    }

    /// The request parameter at fault, if any.
    pub fn param(&self) -> Option<&'static str> {
        match self {
            QueryError::InvalidFilterEncoding { param, .. }
            | QueryError::InvalidPagination { param, .. }
            | QueryError::InvalidSort { param, .. } => Some(param),
            QueryError::UnsupportedOperator(_) | QueryError::StoreUnavailable(_) => None,
        }
    }
}

impl From<sqlx::Error> for QueryError {
    fn from(e: sqlx::Error) -> Self {
        QueryError::StoreUnavailable(e.to_string())
    }
}
