//! Dataset client error types
//!
//! Driver errors are carried unmodified as the `source()` of each variant;
//! nothing here retries or rewrites them.

use thiserror::Error;

/// Result type for dataset client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Dataset client errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The database session could not be established
    #[error("connection failed: {0}")]
    Connection(#[source] postgres::Error),

    /// The remote side rejected or failed a statement
    #[error("query failed: {0}")]
    Query(#[source] postgres::Error),
}

impl ClientError {
    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            ClientError::Connection(_) => "PGL_CLIENT_CONNECTION",
            ClientError::Query(_) => "PGL_CLIENT_QUERY",
        }
    }

    /// The underlying driver error
    pub fn driver_error(&self) -> &postgres::Error {
        match self {
            ClientError::Connection(e) | ClientError::Query(e) => e,
        }
    }
}
