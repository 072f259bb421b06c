//! SMS Service Module
//!
//! Notifier implementations for delivering verification codes. Production deployments
//! plug their provider in through `vc_core::SmsServiceTrait`; this crate ships the mock
//! used in development and tests.

pub mod mock_sms;

pub use mock_sms::{MockSmsService, OutboundMessage};

#[cfg(test)]
mod tests;
