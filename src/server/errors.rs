//! Server error types

use std::io;

use thiserror::Error;

use crate::adapter::AdapterError;

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;

/// Server errors
///
/// Everything except `Io` is scoped to a single request: the server answers
/// it with an error line and keeps serving.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The request line is not a valid `ChoosePlanRequest`
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// One of the candidate plans is not valid JSON
    #[error("plan {index} is not valid JSON: {reason}")]
    MalformedPlan { index: usize, reason: String },

    /// The adapter could not produce a valid choice
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    /// Reading requests or writing responses failed
    #[error("server I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ServerError {
    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            ServerError::InvalidRequest(_) => "PGL_SERVER_INVALID_REQUEST",
            ServerError::MalformedPlan { .. } => "PGL_SERVER_MALFORMED_PLAN",
            ServerError::Adapter(e) => e.code(),
            ServerError::Io(_) => "PGL_SERVER_IO",
        }
    }

    /// Whether the serving loop has to stop
    pub fn is_fatal(&self) -> bool {
        matches!(self, ServerError::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_errors_keep_their_code() {
        let err = ServerError::from(AdapterError::NoCandidates);
        assert_eq!(err.code(), "PGL_ADAPTER_NO_CANDIDATES");
        assert_eq!(err.to_string(), "no candidate plans to choose from");
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_io_is_fatal() {
        let err = ServerError::from(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        assert_eq!(err.code(), "PGL_SERVER_IO");
        assert!(err.is_fatal());
    }
}
