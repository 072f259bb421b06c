//! Main verification service implementation

use chrono::{Duration, Utc};
use std::sync::Arc;

use vc_shared::config::VerificationConfig;
use vc_shared::phone::{mask_phone_number, normalize_phone_number};

use crate::domain::entities::verification_code::{generate_code, is_well_formed_code};
use crate::domain::value_objects::code_key::CodeKey;
use crate::errors::{DomainError, DomainResult, VerificationError};
use crate::repositories::code::{CheckOutcome, CodeStore, CodeStoreError, StoreOutcome};

use super::traits::SmsServiceTrait;
use super::types::SendCodeResult;

/// Verification service for issuing and checking SMS verification codes
///
/// The service holds no per-recipient state; every call goes to the code store, whose
/// atomic operations are the only coordination between concurrent callers. Dropping a
/// returned future (for example under `tokio::time::timeout`) is safe: a store operation
/// either completes entirely on the store side or not at all.
pub struct VerificationService<S: SmsServiceTrait, C: CodeStore> {
    /// SMS service for delivering codes
    sms_service: Arc<S>,
    /// Code store holding the records
    code_store: Arc<C>,
    /// Service configuration
    config: VerificationConfig,
}

impl<S: SmsServiceTrait, C: CodeStore> VerificationService<S, C> {
    /// Create a new verification service
    ///
    /// # Arguments
    ///
    /// * `sms_service` - SMS service implementation
    /// * `code_store` - Code store implementation
    /// * `config` - Code length, lifetime and template settings
    pub fn new(sms_service: Arc<S>, code_store: Arc<C>, config: VerificationConfig) -> Self {
        Self {
            sms_service,
            code_store,
            config,
        }
    }

    pub fn config(&self) -> &VerificationConfig {
        &self.config
    }

    /// Send a verification code to a phone number
    ///
    /// This method:
    /// 1. Validates the business context and phone number
    /// 2. Generates a new verification code
    /// 3. Stores it, subject to the resend cooldown
    /// 4. Sends it via SMS
    ///
    /// The phone number is normalized first, so formatting variants of one number share a
    /// single record and cooldown.
    ///
    /// A delivery failure after a successful store is reported as an error; the stored
    /// code stays valid until it expires or a resend replaces it.
    ///
    /// # Arguments
    ///
    /// * `business` - Business context, e.g. `login`
    /// * `phone` - The phone number to send the code to
    ///
    /// # Returns
    ///
    /// * `Ok(SendCodeResult)` - Message id and timing of the issued code
    /// * `Err(DomainError)` - Validation, cooldown, store or delivery failure
    pub async fn send_code(&self, business: &str, phone: &str) -> DomainResult<SendCodeResult> {
        let phone = normalize_phone_number(phone);
        let key = CodeKey::new(business, phone.as_str())?;
        if !self.sms_service.is_valid_phone_number(&phone) {
            return Err(DomainError::Validation {
                message: format!("Invalid phone number format: {}", mask_phone_number(&phone)),
            });
        }
        let masked = mask_phone_number(&phone);

        let code = generate_code(self.config.code_length);

        let outcome = self
            .code_store
            .store(key.business(), key.recipient(), &code)
            .await
            .map_err(|e| {
                tracing::error!(
                    business = business,
                    phone = %masked,
                    error = %e,
                    event = "code_store_failed",
                    "Failed to store verification code"
                );
                Self::internal("store verification code", e)
            })?;

        if outcome == StoreOutcome::TooFrequent {
            tracing::warn!(
                business = business,
                phone = %masked,
                event = "send_too_frequently",
                "Verification code requested inside the resend interval"
            );
            return Err(VerificationError::SendTooFrequently.into());
        }

        let issued_at = Utc::now();
        let message_id = self
            .sms_service
            .send(&self.config.template_id, &[code], &[phone])
            .await
            .map_err(|e| {
                tracing::error!(
                    business = business,
                    phone = %masked,
                    error = %e,
                    event = "sms_delivery_failed",
                    "Stored verification code could not be delivered"
                );
                DomainError::SmsDelivery { message: e }
            })?;

        tracing::info!(
            business = business,
            phone = %masked,
            message_id = %message_id,
            event = "code_sent",
            "Verification code sent"
        );

        Ok(SendCodeResult {
            message_id,
            next_resend_at: issued_at + Self::seconds(self.config.resend_interval_seconds),
            expires_at: issued_at + Self::seconds(self.config.ttl_seconds),
        })
    }

    /// Verify a code
    ///
    /// The phone number is normalized the same way as in [`Self::send_code`]. Inputs that
    /// are not `code_length` digits are rejected without consuming an attempt.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The code matched and has been consumed
    /// * `Err(VerificationError::InvalidCode)` - Wrong, expired or never issued code
    /// * `Err(VerificationError::MaxAttemptsExceeded)` - A fresh code must be requested
    /// * `Err(DomainError::Internal)` - The code store could not answer
    pub async fn verify_code(&self, business: &str, phone: &str, input_code: &str) -> DomainResult<()> {
        let phone = normalize_phone_number(phone);
        let key = CodeKey::new(business, phone.as_str())?;
        let masked = mask_phone_number(&phone);

        if !is_well_formed_code(input_code, self.config.code_length) {
            tracing::warn!(
                business = business,
                phone = %masked,
                event = "invalid_code_format",
                code_length = input_code.len(),
                "Invalid verification code format provided"
            );
            return Err(VerificationError::InvalidCode.into());
        }

        let outcome = self
            .code_store
            .check(key.business(), key.recipient(), input_code)
            .await
            .map_err(|e| {
                tracing::error!(
                    business = business,
                    phone = %masked,
                    error = %e,
                    event = "code_check_failed",
                    "Failed to check verification code"
                );
                Self::internal("check verification code", e)
            })?;

        match outcome {
            CheckOutcome::Matched => {
                tracing::info!(
                    business = business,
                    phone = %masked,
                    event = "code_verified",
                    "Verification code verified"
                );
                Ok(())
            }
            CheckOutcome::Mismatch | CheckOutcome::NotFound => {
                tracing::debug!(
                    business = business,
                    phone = %masked,
                    outcome = ?outcome,
                    "Verification code rejected"
                );
                Err(VerificationError::InvalidCode.into())
            }
            CheckOutcome::TooManyAttempts => {
                tracing::warn!(
                    business = business,
                    phone = %masked,
                    event = "max_attempts_exceeded",
                    "Verification attempts exhausted"
                );
                Err(VerificationError::MaxAttemptsExceeded.into())
            }
        }
    }

    fn internal(action: &str, err: CodeStoreError) -> DomainError {
        match err {
            CodeStoreError::InvalidKey(key_err) => key_err.into(),
            other => DomainError::Internal {
                message: format!("Failed to {}: {}", action, other),
            },
        }
    }

    fn seconds(secs: u64) -> Duration {
        Duration::seconds(secs.min(u64::from(u32::MAX)) as i64)
    }
}
