use thiserror::Error;

/// Domain-rule violations raised while validating patient and payment data.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Name must be non-empty and at most {max} characters: {message}")]
    InvalidName { message: String, max: usize },

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Date of birth cannot be in the future: {date_of_birth} is after {today}")]
    FutureDateOfBirth {
        date_of_birth: time::Date,
        today: time::Date,
    },

    #[error("Check number must be non-empty")]
    EmptyCheckNumber,

    #[error("Unknown payment status label: {0}")]
    UnknownStatus(String),
}

impl CoreError {
    /// Create a new InvalidName error.
    pub fn invalid_name(message: impl Into<String>, max: usize) -> Self {
        Self::InvalidName {
            message: message.into(),
            max,
        }
    }

    /// Create a new InvalidEmail error.
    pub fn invalid_email(email: impl Into<String>) -> Self {
        Self::InvalidEmail(email.into())
    }

    /// Create a new FutureDateOfBirth error.
    pub fn future_date_of_birth(date_of_birth: time::Date, today: time::Date) -> Self {
        Self::FutureDateOfBirth {
            date_of_birth,
            today,
        }
    }

    /// Create a new UnknownStatus error.
    pub fn unknown_status(label: impl Into<String>) -> Self {
        Self::UnknownStatus(label.into())
    }

    /// All core errors are caller-correctable validation failures (4xx category).
    pub fn is_client_error(&self) -> bool {
        true
    }
}

/// Convenience result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
