//! Code key value object
//!
//! One outstanding verification flow is identified by a business context and a recipient.
//! The cache key is `<prefix>:<business>:<recipient>`. Business contexts may not contain
//! the delimiter, so the first delimiter after the prefix always ends the business segment
//! and two distinct pairs can never produce the same key. Recipients are unrestricted.

use thiserror::Error;

/// Separator between key segments
pub const KEY_DELIMITER: char = ':';

/// Reasons a `(business, recipient)` pair cannot form a key
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodeKeyError {
    #[error("Business context must not be empty")]
    EmptyBusiness,

    #[error("Recipient must not be empty")]
    EmptyRecipient,

    #[error("Business context '{0}' must not contain ':'")]
    DelimiterInBusiness(String),
}

/// Validated `(business, recipient)` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodeKey {
    business: String,
    recipient: String,
}

impl CodeKey {
    pub fn new(
        business: impl Into<String>,
        recipient: impl Into<String>,
    ) -> Result<Self, CodeKeyError> {
        let business = business.into();
        let recipient = recipient.into();

        if business.is_empty() {
            return Err(CodeKeyError::EmptyBusiness);
        }
        if business.contains(KEY_DELIMITER) {
            return Err(CodeKeyError::DelimiterInBusiness(business));
        }
        if recipient.is_empty() {
            return Err(CodeKeyError::EmptyRecipient);
        }

        Ok(Self {
            business,
            recipient,
        })
    }

    pub fn business(&self) -> &str {
        &self.business
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// Full cache key under `prefix`
    pub fn cache_key(&self, prefix: &str) -> String {
        format!(
            "{prefix}{d}{}{d}{}",
            self.business,
            self.recipient,
            d = KEY_DELIMITER
        )
    }
}
