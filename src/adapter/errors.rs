//! Adapter error types

use thiserror::Error;

/// Result type for adapter operations
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Adapter errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    /// There was nothing to choose from
    #[error("no candidate plans to choose from")]
    NoCandidates,

    /// An adapter returned an index outside the candidate list
    #[error("adapter chose plan {index} but only {len} candidates were given")]
    IndexOutOfRange { index: usize, len: usize },

    /// The strategy itself failed (model not loaded, bad plan shape, ...)
    #[error("adapter failed: {0}")]
    Internal(String),
}

impl AdapterError {
    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            AdapterError::NoCandidates => "PGL_ADAPTER_NO_CANDIDATES",
            AdapterError::IndexOutOfRange { .. } => "PGL_ADAPTER_INDEX_OUT_OF_RANGE",
            AdapterError::Internal(_) => "PGL_ADAPTER_INTERNAL",
        }
    }

    /// Whether this error is a broken adapter rather than a bad input
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, AdapterError::IndexOutOfRange { .. })
    }
}
