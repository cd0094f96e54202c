//! Deciders registry error types.

use thiserror::Error;

/// Result type alias for registry operations.
pub type DecidersResult<T> = Result<T, DecidersError>;

/// Errors a `Deciders` registry can return. Callers own classification
/// and retry policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecidersError {
    #[error("decider not found: {0}")]
    NotFound(String),

    #[error("decider conflict for {key}: {reason}")]
    Conflict { key: String, reason: String },

    #[error("invalid decider {key}: {reason}")]
    InvalidSpec { key: String, reason: String },

    #[error("deciders backend unavailable: {0}")]
    Transient(String),
}

impl DecidersError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Only backend unavailability is worth retrying as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}
