//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, user-fixable failures (validation,
/// duplicate keys, lookup misses). Collaborator failures belong to the
/// infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (missing or malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A natural key is already taken (duplicate provisioning attempt).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A requested record was not found.
    #[error("not found")]
    NotFound,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
