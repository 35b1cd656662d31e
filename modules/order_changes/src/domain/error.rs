use thiserror::Error;
use uuid::Uuid;

use crate::domain::repo::StorageError;

/// Domain-specific errors using thiserror
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Order change not found: {id}")]
    NotFound { id: Uuid },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Storage unavailable: {message}")]
    Unavailable { message: String },

    #[error("Persistence error: {message}")]
    Persistence { message: String },
}

impl DomainError {
    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound { id }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }
}

impl From<StorageError> for DomainError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Unavailable(msg) => Self::unavailable(msg),
            StorageError::Constraint(msg) => Self::validation("record", msg),
            StorageError::Other(msg) => Self::persistence(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_map_to_domain_kinds() {
        assert!(matches!(
            DomainError::from(StorageError::Unavailable("pool timed out".into())),
            DomainError::Unavailable { .. }
        ));
        assert!(matches!(
            DomainError::from(StorageError::Constraint("NOT NULL".into())),
            DomainError::Validation { .. }
        ));
        assert!(matches!(
            DomainError::from(StorageError::Other("disk I/O".into())),
            DomainError::Persistence { .. }
        ));
    }

    #[test]
    fn display_includes_field() {
        let e = DomainError::validation("changes", "must not be empty");
        assert_eq!(e.to_string(), "Validation failed: changes: must not be empty");
    }
}
