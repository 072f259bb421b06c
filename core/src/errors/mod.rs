//! Domain-specific error types and error handling.

mod types;


pub use types::VerificationError;

use thiserror::Error;

use crate::domain::value_objects::code_key::CodeKeyError;

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("SMS delivery failed: {message}")]
    SmsDelivery { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error(transparent)]
    Verification(#[from] VerificationError),
}

impl DomainError {
    /// Stable machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => "VALIDATION_ERROR",
            DomainError::SmsDelivery { .. } => "SMS_SERVICE_FAILURE",
            DomainError::Internal { .. } => "INTERNAL_ERROR",
            DomainError::Verification(err) => err.error_code(),
        }
    }

    /// Whether the error should be shown to the requester as-is
    ///
    /// Infrastructure failures are reported generically.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            DomainError::Validation { .. } | DomainError::Verification(_)
        )
    }
}

impl From<CodeKeyError> for DomainError {
    fn from(err: CodeKeyError) -> Self {
        DomainError::Validation {
            message: err.to_string(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
