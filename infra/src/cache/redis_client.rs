//! Redis cache client
//!
//! Wraps one multiplexed connection shared by every caller. Connecting is retried with
//! exponential backoff; script calls are not, since a script that reached the server may
//! already have changed state. Each call is bounded by the configured response timeout.

use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, Script};
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use vc_shared::config::CacheConfig;

use crate::InfrastructureError;

/// Upper bound for the connect backoff delay
const MAX_RETRY_DELAY_MS: u64 = 5000;

/// Redis client holding a shared multiplexed connection
#[derive(Clone)]
pub struct RedisClient {
    /// Multiplexed connection, cheap to clone per call
    connection: MultiplexedConnection,
    /// Configuration used to create this client
    config: CacheConfig,
}

impl RedisClient {
    /// Connect to Redis
    ///
    /// # Arguments
    /// * `config` - Cache configuration (URL, timeouts and connect retry policy)
    ///
    /// # Example
    /// ```no_run
    /// use vc_infra::cache::RedisClient;
    /// use vc_shared::config::CacheConfig;
    ///
    /// async fn connect() -> Result<RedisClient, vc_infra::InfrastructureError> {
    ///     RedisClient::new(CacheConfig::new("redis://localhost:6379")).await
    /// }
    /// ```
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        config.validate()?;
        info!(url = %mask_url(&config.url), "Creating Redis client");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!(error = %e, "Failed to parse Redis URL");
            InfrastructureError::Cache(e)
        })?;

        let connection = Self::create_connection_with_retry(&client, &config).await?;
        info!("Redis client created successfully");

        Ok(Self { connection, config })
    }

    async fn create_connection_with_retry(
        client: &Client,
        config: &CacheConfig,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let connect_timeout = Duration::from_secs(config.connection_timeout.max(1));
        let mut attempts = 0;
        let mut delay = config.retry_delay_ms;

        loop {
            attempts += 1;
            debug!(attempt = attempts, "Attempting to connect to Redis");

            let result = match timeout(connect_timeout, client.get_multiplexed_async_connection()).await {
                Ok(result) => result,
                Err(_) => Err(RedisError::from(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    "connection attempt timed out",
                ))),
            };

            match result {
                Ok(connection) => {
                    info!(attempt = attempts, "Connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < config.max_connect_retries && is_retriable_error(&e) => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, config.max_connect_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => {
                    error!("Failed to connect to Redis after {} attempts: {}", attempts, e);
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Run a Lua script against a single key and return its integer reply
    ///
    /// The script is sent as EVALSHA and loaded on a NOSCRIPT reply. It is executed at
    /// most once per call.
    pub async fn eval_script(
        &self,
        script: &Script,
        key: &str,
        args: &[String],
    ) -> Result<i64, InfrastructureError> {
        let mut conn = self.connection.clone();
        let mut invocation = script.key(key);
        for arg in args {
            invocation.arg(arg.as_str());
        }

        self.bounded(invocation.invoke_async::<_, i64>(&mut conn)).await
    }

    /// Load a Lua script into the server script cache, returning its SHA1
    pub async fn load_script(&self, source: &str) -> Result<String, InfrastructureError> {
        let mut conn = self.connection.clone();
        self.bounded(redis::cmd("SCRIPT").arg("LOAD").arg(source).query_async(&mut conn))
            .await
    }

    /// PING the server
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let mut conn = self.connection.clone();
        let response: String = self
            .bounded(redis::cmd("PING").query_async(&mut conn))
            .await?;

        if response == "PONG" {
            debug!("Redis health check passed");
            Ok(true)
        } else {
            warn!(response = %response, "Redis health check returned unexpected response");
            Ok(false)
        }
    }

    /// Delete a key, returning whether it existed
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        let mut conn = self.connection.clone();
        let deleted: u32 = self.bounded(conn.del(key)).await?;
        Ok(deleted > 0)
    }

    /// Remaining time to live of a key in seconds, `None` if missing or persistent
    pub async fn ttl(&self, key: &str) -> Result<Option<i64>, InfrastructureError> {
        let mut conn = self.connection.clone();
        let ttl: i64 = self.bounded(conn.ttl(key)).await?;
        Ok((ttl >= 0).then_some(ttl))
    }

    /// Read one field of a hash
    pub async fn hget(&self, key: &str, field: &str) -> Result<Option<String>, InfrastructureError> {
        let mut conn = self.connection.clone();
        self.bounded(conn.hget(key, field)).await
    }

    async fn bounded<T, F>(&self, operation: F) -> Result<T, InfrastructureError>
    where
        F: std::future::Future<Output = redis::RedisResult<T>>,
    {
        let limit = self.config.response_timeout_ms;
        match timeout(Duration::from_millis(limit), operation).await {
            Ok(result) => result.map_err(InfrastructureError::Cache),
            Err(_) => {
                warn!(timeout_ms = limit, "Redis call timed out");
                Err(InfrastructureError::Timeout(limit))
            }
        }
    }
}

/// Errors worth another connection attempt
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::ClientError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Hide credentials in a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(proto_end), Some(at_pos)) if at_pos > proto_end => {
            format!("{}****{}", &url[..proto_end + 3], &url[at_pos..])
        }
        _ => url.to_string(),
    }
}
