//! Code store trait defining the interface for verification code records.
//!
//! A code store keeps at most one record per `(business, recipient)` pair and performs
//! every check-and-mutate step as one indivisible operation. Implementations must never
//! fold a transport failure into a logical outcome: "wrong code" and "store unreachable"
//! travel on different channels (`Ok` vs `Err`).

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::value_objects::code_key::CodeKeyError;

/// Logical result of storing a new code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    /// The code was recorded with a fresh lifetime and attempt budget
    Stored,
    /// The existing code is younger than the resend interval; nothing changed
    TooFrequent,
}

/// Logical result of checking an input code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The input matched; the record has been consumed
    Matched,
    /// The input did not match; one attempt was used
    Mismatch,
    /// The attempt budget is spent; the record can no longer be verified
    TooManyAttempts,
    /// No live record exists for the key
    NotFound,
}

/// Failures that prevent a logical outcome from being determined
#[derive(Error, Debug)]
pub enum CodeStoreError {
    #[error("Invalid code key: {0}")]
    InvalidKey(#[from] CodeKeyError),

    #[error("Code store unavailable: {0}")]
    Unavailable(String),

    #[error("Unexpected result {code} from {operation}")]
    UnexpectedResult { operation: &'static str, code: i64 },
}

/// Repository trait for verification code records
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use vc_core::repositories::{CheckOutcome, CodeStore, CodeStoreError, StoreOutcome};
///
/// struct AlwaysFullStore;
///
/// #[async_trait]
/// impl CodeStore for AlwaysFullStore {
///     async fn store(&self, _: &str, _: &str, _: &str) -> Result<StoreOutcome, CodeStoreError> {
///         Ok(StoreOutcome::TooFrequent)
///     }
///
///     async fn check(&self, _: &str, _: &str, _: &str) -> Result<CheckOutcome, CodeStoreError> {
///         Ok(CheckOutcome::NotFound)
///     }
/// }
/// ```
#[async_trait]
pub trait CodeStore: Send + Sync {
    /// Record `code` for the pair unless the current code is still inside its resend
    /// cooldown
    ///
    /// # Arguments
    /// * `business` - Business context, e.g. `login`
    /// * `recipient` - Phone number the code is issued for
    /// * `code` - Newly generated code
    async fn store(
        &self,
        business: &str,
        recipient: &str,
        code: &str,
    ) -> Result<StoreOutcome, CodeStoreError>;

    /// Compare `input_code` with the stored code, consuming the record on a match and one
    /// attempt on a mismatch
    async fn check(
        &self,
        business: &str,
        recipient: &str,
        input_code: &str,
    ) -> Result<CheckOutcome, CodeStoreError>;
}
