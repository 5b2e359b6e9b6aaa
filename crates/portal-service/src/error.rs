//! Typed failures raised by the record service.

use portal_core::CoreError;
use portal_storage::StorageError;

/// Failures the record service surfaces to its callers.
///
/// `Validation` and `NotFound` are expected, caller-correctable conditions
/// and carry enough detail to fix the input. `Unexpected` wraps
/// infrastructure failures; the detail stays in the logs and only an opaque
/// failure crosses the API boundary.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Caller-supplied data violates a business rule.
    #[error("{message}")]
    Validation {
        /// What rule was violated and by which value.
        message: String,
    },

    /// A referenced id does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// The kind of record ("patient", "payment").
        entity: &'static str,
        /// The id that failed to resolve.
        id: i32,
    },

    /// Storage or connectivity failure, not otherwise classified.
    #[error("Unexpected error: {message}")]
    Unexpected {
        /// Internal description; not exposed to API callers.
        message: String,
    },
}

impl ServiceError {
    /// Creates a new `Validation` error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound { entity, id }
    }

    /// Creates a new `Unexpected` error.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Returns `true` for conditions the caller can correct (4xx category).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::NotFound { .. })
    }

    /// Category label for logging and monitoring.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::NotFound { .. } => "not_found",
            Self::Unexpected { .. } => "unexpected",
        }
    }
}

impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity, id } => Self::not_found(entity, id),
            other => Self::unexpected(other.to_string()),
        }
    }
}

/// Convenience result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_core_error_maps_to_validation() {
        let err: ServiceError =
            CoreError::future_date_of_birth(date!(2030 - 01 - 01), date!(2024 - 01 - 01)).into();
        assert!(matches!(err, ServiceError::Validation { .. }));
        assert!(err.to_string().contains("Date of birth"));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_storage_not_found_maps_through() {
        let err: ServiceError = StorageError::not_found("patient", 9).into();
        assert!(matches!(
            err,
            ServiceError::NotFound {
                entity: "patient",
                id: 9
            }
        ));
        assert_eq!(err.category(), "not_found");
    }

    #[test]
    fn test_storage_infrastructure_maps_to_unexpected() {
        let err: ServiceError = StorageError::connection("refused").into();
        assert!(matches!(err, ServiceError::Unexpected { .. }));
        assert!(!err.is_client_error());
        assert_eq!(err.category(), "unexpected");
    }

    #[test]
    fn test_not_found_message() {
        let err = ServiceError::not_found("patient", 42);
        assert_eq!(err.to_string(), "patient with id 42 not found");
    }
}
