//! Redis-backed code store
//!
//! Each `(business, recipient)` pair maps to one hash at `<prefix>:<business>:<recipient>`
//! with the fields `code` (SHA-256 digest of the code) and `attempts`, expiring after the
//! configured lifetime. Both operations are single Lua scripts, so every read-decide-write
//! step runs atomically on the server and concurrent callers are totally ordered per key.

use async_trait::async_trait;
use redis::Script;
use sha2::{Digest, Sha256};
use tracing::{debug, error, warn};

use vc_core::domain::value_objects::code_key::{CodeKey, CodeKeyError};
use vc_core::repositories::{CheckOutcome, CodeStore, CodeStoreError, StoreOutcome};
use vc_shared::config::VerificationConfig;
use vc_shared::phone::mask_phone_number;

use super::redis_client::RedisClient;
use crate::InfrastructureError;

/// Reply codes of `set_code.lua`
pub const SET_CODE_STORED: i64 = 0;
pub const SET_CODE_TOO_FREQUENT: i64 = -1;

/// Reply codes of `verify_code.lua`
pub const VERIFY_CODE_MATCHED: i64 = 0;
pub const VERIFY_CODE_TOO_MANY_ATTEMPTS: i64 = -1;
pub const VERIFY_CODE_NOT_FOUND: i64 = -2;
pub const VERIFY_CODE_MISMATCH: i64 = -3;

const SET_CODE_SOURCE: &str = include_str!("scripts/set_code.lua");
const VERIFY_CODE_SOURCE: &str = include_str!("scripts/verify_code.lua");

/// Code store running the set/verify scripts on Redis
#[derive(Clone)]
pub struct RedisCodeStore {
    redis_client: RedisClient,
    config: VerificationConfig,
    set_code: Script,
    verify_code: Script,
}

impl RedisCodeStore {
    pub fn new(redis_client: RedisClient, config: VerificationConfig) -> Self {
        Self {
            redis_client,
            config,
            set_code: Script::new(SET_CODE_SOURCE),
            verify_code: Script::new(VERIFY_CODE_SOURCE),
        }
    }

    /// Preload both scripts so the first calls hit EVALSHA directly
    pub async fn load_scripts(&self) -> Result<(), InfrastructureError> {
        for (name, source, script) in [
            ("set_code", SET_CODE_SOURCE, &self.set_code),
            ("verify_code", VERIFY_CODE_SOURCE, &self.verify_code),
        ] {
            let sha = self.redis_client.load_script(source).await?;
            if sha != script.get_hash() {
                warn!(script = name, loaded = %sha, expected = %script.get_hash(), "Script hash mismatch");
            }
            debug!(script = name, sha = %sha, "Lua script loaded");
        }
        Ok(())
    }

    /// Redis key of the record for a pair
    pub fn key_for(&self, business: &str, recipient: &str) -> Result<String, CodeKeyError> {
        Ok(CodeKey::new(business, recipient)?.cache_key(&self.config.key_prefix))
    }

    pub fn redis_client(&self) -> &RedisClient {
        &self.redis_client
    }

    /// Remaining attempts of the record for a pair, if it exists
    pub async fn remaining_attempts(
        &self,
        business: &str,
        recipient: &str,
    ) -> Result<Option<u32>, CodeStoreError> {
        let key = self.key_for(business, recipient)?;
        let attempts = self
            .redis_client
            .hget(&key, "attempts")
            .await
            .map_err(|e| CodeStoreError::Unavailable(e.to_string()))?;
        Ok(attempts.and_then(|value| value.parse().ok()))
    }
}

#[async_trait]
impl CodeStore for RedisCodeStore {
    async fn store(
        &self,
        business: &str,
        recipient: &str,
        code: &str,
    ) -> Result<StoreOutcome, CodeStoreError> {
        let key = self.key_for(business, recipient)?;
        let args = [
            hash_code(code),
            self.config.ttl_seconds.to_string(),
            self.config.resend_interval_seconds.to_string(),
            self.config.max_attempts.to_string(),
        ];

        let status = self
            .redis_client
            .eval_script(&self.set_code, &key, &args)
            .await
            .map_err(|e| {
                error!(
                    business = business,
                    phone = %mask_phone_number(recipient),
                    error = %e,
                    "set_code script failed"
                );
                CodeStoreError::Unavailable(e.to_string())
            })?;

        debug!(business = business, phone = %mask_phone_number(recipient), status, "set_code");
        translate_store_status(status)
    }

    async fn check(
        &self,
        business: &str,
        recipient: &str,
        input_code: &str,
    ) -> Result<CheckOutcome, CodeStoreError> {
        let key = self.key_for(business, recipient)?;
        let args = [hash_code(input_code)];

        let status = self
            .redis_client
            .eval_script(&self.verify_code, &key, &args)
            .await
            .map_err(|e| {
                error!(
                    business = business,
                    phone = %mask_phone_number(recipient),
                    error = %e,
                    "verify_code script failed"
                );
                CodeStoreError::Unavailable(e.to_string())
            })?;

        debug!(business = business, phone = %mask_phone_number(recipient), status, "verify_code");
        translate_check_status(status)
    }
}

pub(crate) fn translate_store_status(status: i64) -> Result<StoreOutcome, CodeStoreError> {
    match status {
        SET_CODE_STORED => Ok(StoreOutcome::Stored),
        SET_CODE_TOO_FREQUENT => Ok(StoreOutcome::TooFrequent),
        code => Err(CodeStoreError::UnexpectedResult {
            operation: "set_code",
            code,
        }),
    }
}

pub(crate) fn translate_check_status(status: i64) -> Result<CheckOutcome, CodeStoreError> {
    match status {
        VERIFY_CODE_MATCHED => Ok(CheckOutcome::Matched),
        VERIFY_CODE_TOO_MANY_ATTEMPTS => Ok(CheckOutcome::TooManyAttempts),
        VERIFY_CODE_NOT_FOUND => Ok(CheckOutcome::NotFound),
        VERIFY_CODE_MISMATCH => Ok(CheckOutcome::Mismatch),
        code => Err(CodeStoreError::UnexpectedResult {
            operation: "verify_code",
            code,
        }),
    }
}

/// SHA-256 hex digest; plaintext codes never reach the cache
pub(crate) fn hash_code(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    format!("{:x}", hasher.finalize())
}
