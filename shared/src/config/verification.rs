//! Verification code configuration module
//!
//! Code lifetime and resend cooldown are independent knobs. The cooldown is measured from
//! the moment a code was stored, so a resend is allowed once the stored code's remaining
//! lifetime has dropped to `ttl_seconds - resend_interval_seconds` or below.

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, ConfigResult};

/// Key prefix used for code records (`phone_code:<business>:<recipient>`)
pub const DEFAULT_KEY_PREFIX: &str = "phone_code";

/// Default code lifetime (10 minutes)
pub const DEFAULT_TTL_SECONDS: u64 = 600;

/// Default minimum time between two codes for the same key
pub const DEFAULT_RESEND_INTERVAL_SECONDS: u64 = 60;

/// Default number of verification attempts per code
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default number of digits in a code
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Longest supported code; `10^len` must fit in a `u64`
pub const MAX_CODE_LENGTH: usize = 18;

/// SMS template used to deliver verification codes
pub const DEFAULT_TEMPLATE_ID: &str = "1877556";

/// Verification code issuance and checking configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Prefix of every code record key
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Lifetime of an issued code in seconds
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,

    /// Minimum seconds between two issuances for the same key
    #[serde(default = "default_resend_interval_seconds")]
    pub resend_interval_seconds: u64,

    /// Verification attempts allowed per code
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Number of digits in a generated code
    #[serde(default = "default_code_length")]
    pub code_length: usize,

    /// Template id handed to the SMS notifier
    #[serde(default = "default_template_id")]
    pub template_id: String,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            ttl_seconds: DEFAULT_TTL_SECONDS,
            resend_interval_seconds: DEFAULT_RESEND_INTERVAL_SECONDS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            code_length: DEFAULT_CODE_LENGTH,
            template_id: default_template_id(),
        }
    }
}

impl VerificationConfig {
    /// Set code lifetime and resend cooldown together
    pub fn with_timing(mut self, ttl_seconds: u64, resend_interval_seconds: u64) -> Self {
        self.ttl_seconds = ttl_seconds;
        self.resend_interval_seconds = resend_interval_seconds;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Check the invariants the atomic scripts rely on
    pub fn validate(&self) -> ConfigResult<()> {
        if self.key_prefix.is_empty() {
            return Err(ConfigError::invalid("verification.key_prefix", "must not be empty"));
        }
        if self.ttl_seconds == 0 {
            return Err(ConfigError::invalid("verification.ttl_seconds", "must be positive"));
        }
        if self.resend_interval_seconds == 0 || self.resend_interval_seconds > self.ttl_seconds {
            return Err(ConfigError::invalid(
                "verification.resend_interval_seconds",
                format!("must be within 1..={}", self.ttl_seconds),
            ));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::invalid("verification.max_attempts", "must be at least 1"));
        }
        if self.code_length == 0 || self.code_length > MAX_CODE_LENGTH {
            return Err(ConfigError::invalid(
                "verification.code_length",
                format!("must be within 1..={}", MAX_CODE_LENGTH),
            ));
        }
        Ok(())
    }
}

fn default_key_prefix() -> String {
    DEFAULT_KEY_PREFIX.to_string()
}

fn default_ttl_seconds() -> u64 {
    DEFAULT_TTL_SECONDS
}

fn default_resend_interval_seconds() -> u64 {
    DEFAULT_RESEND_INTERVAL_SECONDS
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_code_length() -> usize {
    DEFAULT_CODE_LENGTH
}

fn default_template_id() -> String {
    DEFAULT_TEMPLATE_ID.to_string()
}
