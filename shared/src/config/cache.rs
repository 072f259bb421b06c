//! Cache configuration module

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, ConfigResult};

/// Redis connection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Connection timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,

    /// Response timeout in milliseconds for a single script round-trip
    #[serde(default = "default_response_timeout_ms")]
    pub response_timeout_ms: u64,

    /// Maximum connection attempts on startup
    #[serde(default = "default_max_connect_retries")]
    pub max_connect_retries: u32,

    /// Base delay between connection attempts in milliseconds (doubles each time)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            connection_timeout: default_connection_timeout(),
            response_timeout_ms: default_response_timeout_ms(),
            max_connect_retries: default_max_connect_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl CacheConfig {
    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the per-call response timeout
    pub fn with_response_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.response_timeout_ms = timeout_ms;
        self
    }

    /// Set the connection retry policy
    pub fn with_connect_retries(mut self, max_retries: u32, retry_delay_ms: u64) -> Self {
        self.max_connect_retries = max_retries;
        self.retry_delay_ms = retry_delay_ms;
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.url.starts_with("redis://")
            || self.url.starts_with("rediss://")
            || self.url.starts_with("redis+unix://"))
        {
            return Err(ConfigError::invalid(
                "cache.url",
                "must use the redis://, rediss:// or redis+unix:// scheme",
            ));
        }
        if self.response_timeout_ms == 0 {
            return Err(ConfigError::invalid("cache.response_timeout_ms", "must be positive"));
        }
        if self.max_connect_retries == 0 {
            return Err(ConfigError::invalid("cache.max_connect_retries", "must be at least 1"));
        }
        Ok(())
    }
}

fn default_connection_timeout() -> u64 {
    5
}

fn default_response_timeout_ms() -> u64 {
    2000
}

fn default_max_connect_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    100
}
