//! Error types for the storage gateway.

use std::fmt;

/// Errors that can occur during storage operations.
///
/// Missing records are reported through `Option` return values, not errors;
/// `NotFound` is raised only when an operation that requires an existing row
/// (such as update) finds none.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A record that the operation requires does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record ("patient", "payment").
        entity: &'static str,
        /// The id that failed to resolve.
        id: i32,
    },

    /// A referenced foreign key does not resolve to a live row.
    #[error("Foreign key violation: {message}")]
    ForeignKey {
        /// Description of the failed reference.
        message: String,
    },

    /// Failed to reach the storage backend.
    #[error("Connection error: {message}")]
    Connection {
        /// Description of the connection failure.
        message: String,
    },

    /// Any other backend failure.
    #[error("Internal storage error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl StorageError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound { entity, id }
    }

    /// Creates a new `ForeignKey` error.
    #[must_use]
    pub fn foreign_key(message: impl Into<String>) -> Self {
        Self::ForeignKey {
            message: message.into(),
        }
    }

    /// Creates a new `Connection` error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is a foreign key violation.
    #[must_use]
    pub fn is_foreign_key(&self) -> bool {
        matches!(self, Self::ForeignKey { .. })
    }

    /// Returns the error category for logging and monitoring.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::ForeignKey { .. } => ErrorCategory::Integrity,
            Self::Connection { .. } => ErrorCategory::Infrastructure,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Categories of storage errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Record not found.
    NotFound,
    /// Referential integrity violation.
    Integrity,
    /// Infrastructure/connection error.
    Infrastructure,
    /// Internal error.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Integrity => write!(f, "integrity"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::not_found("patient", 42);
        assert_eq!(err.to_string(), "patient not found: 42");

        let err = StorageError::foreign_key("payments.patient_id -> 9");
        assert!(err.to_string().contains("Foreign key violation"));
    }

    #[test]
    fn test_error_predicates() {
        assert!(StorageError::not_found("patient", 1).is_not_found());
        assert!(!StorageError::not_found("patient", 1).is_foreign_key());
        assert!(StorageError::foreign_key("x").is_foreign_key());
        assert!(!StorageError::internal("x").is_not_found());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            StorageError::not_found("payment", 5).category(),
            ErrorCategory::NotFound
        );
        assert_eq!(
            StorageError::foreign_key("x").category(),
            ErrorCategory::Integrity
        );
        assert_eq!(
            StorageError::connection("refused").category(),
            ErrorCategory::Infrastructure
        );
        assert_eq!(
            StorageError::internal("oops").category(),
            ErrorCategory::Internal
        );
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::NotFound.to_string(), "not_found");
        assert_eq!(ErrorCategory::Integrity.to_string(), "integrity");
        assert_eq!(ErrorCategory::Infrastructure.to_string(), "infrastructure");
        assert_eq!(ErrorCategory::Internal.to_string(), "internal");
    }
}
