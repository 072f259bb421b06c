//! Verification service module for SMS-based verification codes
//!
//! This module provides the complete verification code workflow:
//! - Code generation with a CSPRNG
//! - Atomic storage with a resend cooldown through a `CodeStore`
//! - Delivery through an SMS notifier
//! - Bounded, single-use verification

mod service;
mod traits;
mod types;


pub use service::VerificationService;
pub use traits::SmsServiceTrait;
pub use types::SendCodeResult;
