//! Verification outcome errors surfaced to callers

use thiserror::Error;

/// User-facing verification failures
///
/// A wrong code and a missing or expired code are both reported as `InvalidCode`, so a
/// caller cannot learn whether a code was ever issued for a recipient.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Verification code requested too frequently, please wait before retrying")]
    SendTooFrequently,

    #[error("Invalid verification code")]
    InvalidCode,

    #[error("Maximum verification attempts exceeded, please request a new code")]
    MaxAttemptsExceeded,
}

impl VerificationError {
    /// Stable machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            VerificationError::SendTooFrequently => "SEND_TOO_FREQUENTLY",
            VerificationError::InvalidCode => "INVALID_VERIFICATION_CODE",
            VerificationError::MaxAttemptsExceeded => "MAX_ATTEMPTS_EXCEEDED",
        }
    }
}
