//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

/// Domain errors - business logic failures.
///
/// Read paths never produce these: store failures on reads are logged and
/// collapsed to empty/absent at the repository boundary. Write paths surface
/// the specific variant so the page layer can display it.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Store error: {0}")]
    Store(String),
}

impl DomainError {
    /// Whether retrying the same request could ever succeed.
    ///
    /// Duplicate-slug and ownership failures must not be retried; only a
    /// store-level failure is even potentially transient. Nothing in the
    /// application retries automatically either way.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::Store(_))
    }
}
