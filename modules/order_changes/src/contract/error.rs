use thiserror::Error;
use uuid::Uuid;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderChangesError {
    #[error("Order change not found: {id}")]
    NotFound { id: Uuid },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Storage unavailable")]
    Unavailable,

    #[error("Internal error")]
    Internal,
}

impl OrderChangesError {
    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound { id }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

impl From<crate::domain::error::DomainError> for OrderChangesError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            NotFound { id } => Self::not_found(id),
            Validation { field, message } => Self::validation(format!("{field}: {message}")),
            Unavailable { .. } => Self::Unavailable,
            Persistence { .. } => Self::Internal,
        }
    }
}
