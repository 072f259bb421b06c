//! Configuration module
//!
//! - `cache` - Redis connection configuration
//! - `environment` - Environment detection and logging configuration
//! - `verification` - Code lifetime, resend cooldown and attempt limits
//!
//! Configuration is read from an optional TOML file and then from `VC__`-prefixed
//! environment variables, e.g. `VC__VERIFICATION__TTL_SECONDS=300`.

pub mod cache;
pub mod environment;
pub mod verification;

use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigResult;

pub use cache::CacheConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use verification::VerificationConfig;

/// Prefix of environment variables overriding file configuration
pub const ENV_PREFIX: &str = "VC";

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Redis configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Verification code configuration
    #[serde(default)]
    pub verification: VerificationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Defaults tuned for an environment
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            logging: LoggingConfig::for_environment(environment),
            ..Default::default()
        }
    }

    /// Load configuration for the environment named by `ENVIRONMENT`
    ///
    /// Reads `.env` first, then `config.<environment>.toml` if present, then `VC__*`
    /// variables.
    pub fn load() -> ConfigResult<Self> {
        dotenvy::dotenv().ok();
        let environment = Environment::from_env();
        Self::load_from(environment.config_file())
    }

    /// Load configuration from a specific file (extension optional) plus the environment
    pub fn load_from(path: &str) -> ConfigResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );
        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> ConfigResult<Self> {
        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> ConfigResult<()> {
        self.cache.validate()?;
        self.verification.validate()
    }
}
