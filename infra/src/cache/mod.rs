//! Redis cache module
//!
//! Holds the Redis client and the Redis-backed code store with its Lua scripts.

pub mod code_store;
pub mod redis_client;


pub use code_store::RedisCodeStore;
pub use redis_client::RedisClient;

pub use vc_shared::config::CacheConfig;
