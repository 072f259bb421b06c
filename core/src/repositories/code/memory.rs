//! In-memory code store
//!
//! Mirrors the Redis scripts for a single process: every `store`/`check` runs its whole
//! read-decide-write step while holding one async mutex, which gives the same total order
//! per key that the cache server provides. Time is read from `tokio::time::Instant`, so
//! tests can drive cooldowns and expiry with a paused clock. Expired records are swept on
//! every `store`, so the map only holds live records plus those expired since the last
//! store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use vc_shared::config::VerificationConfig;

use crate::domain::value_objects::code_key::CodeKey;

use super::trait_::{CheckOutcome, CodeStore, CodeStoreError, StoreOutcome};

#[derive(Debug, Clone)]
struct CodeRecord {
    code: String,
    remaining_attempts: u32,
    created_at: Instant,
    expires_at: Instant,
}

impl CodeRecord {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Process-local code store with the same semantics as the Redis scripts
#[derive(Clone)]
pub struct InMemoryCodeStore {
    records: Arc<Mutex<HashMap<String, CodeRecord>>>,
    config: VerificationConfig,
}

impl InMemoryCodeStore {
    pub fn new(config: VerificationConfig) -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            config,
        }
    }

    fn ttl(&self) -> Duration {
        Duration::from_secs(self.config.ttl_seconds)
    }

    fn resend_interval(&self) -> Duration {
        Duration::from_secs(self.config.resend_interval_seconds)
    }

    /// Remaining attempts of the live record for the pair, if any
    pub async fn remaining_attempts(&self, business: &str, recipient: &str) -> Option<u32> {
        let key = CodeKey::new(business, recipient).ok()?.cache_key(&self.config.key_prefix);
        let records = self.records.lock().await;
        records
            .get(&key)
            .filter(|record| record.is_live(Instant::now()))
            .map(|record| record.remaining_attempts)
    }

    /// Number of records held, live or not yet swept
    pub async fn record_count(&self) -> usize {
        self.records.lock().await.len()
    }

    /// Drop expired records, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|_, record| record.is_live(now));
        before - records.len()
    }
}

#[async_trait]
impl CodeStore for InMemoryCodeStore {
    async fn store(
        &self,
        business: &str,
        recipient: &str,
        code: &str,
    ) -> Result<StoreOutcome, CodeStoreError> {
        let key = CodeKey::new(business, recipient)?.cache_key(&self.config.key_prefix);
        let now = Instant::now();
        let mut records = self.records.lock().await;
        records.retain(|_, record| record.is_live(now));

        if let Some(existing) = records.get(&key) {
            if now.duration_since(existing.created_at) < self.resend_interval() {
                debug!(key = %key, "Existing code is inside its resend interval");
                return Ok(StoreOutcome::TooFrequent);
            }
        }

        records.insert(
            key,
            CodeRecord {
                code: code.to_string(),
                remaining_attempts: self.config.max_attempts,
                created_at: now,
                expires_at: now + self.ttl(),
            },
        );
        Ok(StoreOutcome::Stored)
    }

    async fn check(
        &self,
        business: &str,
        recipient: &str,
        input_code: &str,
    ) -> Result<CheckOutcome, CodeStoreError> {
        let key = CodeKey::new(business, recipient)?.cache_key(&self.config.key_prefix);
        let now = Instant::now();
        let mut records = self.records.lock().await;

        let outcome = match records.get_mut(&key) {
            None => CheckOutcome::NotFound,
            Some(record) if !record.is_live(now) => CheckOutcome::NotFound,
            Some(record) if record.remaining_attempts == 0 => CheckOutcome::TooManyAttempts,
            Some(record) if record.code == input_code => CheckOutcome::Matched,
            Some(record) => {
                record.remaining_attempts -= 1;
                CheckOutcome::Mismatch
            }
        };

        // Matched codes are single-use; expired records are dropped lazily
        let consumed = matches!(outcome, CheckOutcome::Matched)
            || (outcome == CheckOutcome::NotFound && records.contains_key(&key));
        if consumed {
            records.remove(&key);
        }

        Ok(outcome)
    }
}
