//! # Infrastructure Layer
//!
//! Concrete adapters for the verikey core: the Redis-backed code store with its Lua
//! scripts, the Redis client it runs on, and a mock SMS notifier.
//!
//! ## Bootstrap
//!
//! [`initialize`] validates an [`AppConfig`], connects to Redis, preloads the scripts and
//! returns a ready [`VerificationService`]. Use [`initialize_with_notifier`] to plug in a
//! real SMS provider.

use std::sync::Arc;

use vc_core::services::{SmsServiceTrait, VerificationService};
use vc_shared::{AppConfig, ConfigError};

/// Cache module - Redis client and code store
pub mod cache;

/// SMS service module - notifier implementations
pub mod sms;

use cache::{RedisClient, RedisCodeStore};
use sms::MockSmsService;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// A Redis call did not answer within the response timeout
    #[error("Cache operation timed out after {0}ms")]
    Timeout(u64),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Wired services sharing one Redis connection
pub struct InfrastructureServices<S: SmsServiceTrait> {
    /// Redis client, kept for health checks
    pub redis_client: RedisClient,
    /// Code store on top of the client
    pub code_store: Arc<RedisCodeStore>,
    /// Verification service
    pub verification_service: Arc<VerificationService<S, RedisCodeStore>>,
}

impl<S: SmsServiceTrait> Clone for InfrastructureServices<S> {
    fn clone(&self) -> Self {
        Self {
            redis_client: self.redis_client.clone(),
            code_store: self.code_store.clone(),
            verification_service: self.verification_service.clone(),
        }
    }
}

/// Initialize infrastructure services with the mock SMS notifier
pub async fn initialize(
    config: &AppConfig,
) -> Result<InfrastructureServices<MockSmsService>, InfrastructureError> {
    initialize_with_notifier(config, Arc::new(MockSmsService::new())).await
}

/// Initialize infrastructure services with a caller-supplied notifier
///
/// The Redis connection lives as long as the returned services; it is closed when the
/// last clone is dropped.
pub async fn initialize_with_notifier<S: SmsServiceTrait>(
    config: &AppConfig,
    sms_service: Arc<S>,
) -> Result<InfrastructureServices<S>, InfrastructureError> {
    tracing::info!(environment = %config.environment, "Initializing infrastructure services...");
    config.validate()?;

    let redis_client = RedisClient::new(config.cache.clone()).await?;
    let code_store = Arc::new(RedisCodeStore::new(
        redis_client.clone(),
        config.verification.clone(),
    ));
    code_store.load_scripts().await?;

    let verification_service = Arc::new(VerificationService::new(
        sms_service,
        code_store.clone(),
        config.verification.clone(),
    ));

    tracing::info!("Infrastructure services initialized successfully");

    Ok(InfrastructureServices {
        redis_client,
        code_store,
        verification_service,
    })
}
