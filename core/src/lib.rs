//! # Verikey Core
//!
//! Core domain layer for verification code issuance and checking.
//! This crate contains the code key value object, the `CodeStore` port with its result
//! types, an in-memory store with the same atomic semantics as the Redis scripts, and the
//! `VerificationService` that generates, stores, delivers and verifies codes.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
