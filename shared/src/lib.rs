//! Shared utilities and common types for the verikey workspace
//!
//! This crate provides functionality used by both the core and the infrastructure crates:
//! - Configuration types and loading
//! - Configuration error type
//! - Phone number utilities (validation, masking for logs)

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, Environment, LogFormat, LoggingConfig, VerificationConfig,
};
pub use errors::{ConfigError, ConfigResult};
pub use utils::phone;
