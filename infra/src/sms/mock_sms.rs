//! Mock SMS Service Implementation
//!
//! Records templated messages in memory instead of sending them.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use vc_core::services::SmsServiceTrait;
use vc_shared::phone::{is_valid_phone, mask_phone_number};

/// Simulated provider latency
const DEFAULT_LATENCY: Duration = Duration::from_millis(100);

/// A message accepted by the mock provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub message_id: String,
    pub template_id: String,
    pub args: Vec<String>,
    pub numbers: Vec<String>,
}

/// Mock SMS service for development and testing
///
/// This implementation:
/// - Validates phone numbers
/// - Generates `mock_<uuid>` message ids
/// - Keeps every accepted message so tests can read the delivered code
#[derive(Clone)]
pub struct MockSmsService {
    /// Counter for tracking number of messages sent
    message_count: Arc<AtomicU64>,
    outbox: Arc<Mutex<Vec<OutboundMessage>>>,
    /// Whether to simulate failures (for testing)
    simulate_failure: bool,
    latency: Duration,
}

impl MockSmsService {
    pub fn new() -> Self {
        Self::with_options(false, DEFAULT_LATENCY)
    }

    /// Create a mock service with configurable options
    pub fn with_options(simulate_failure: bool, latency: Duration) -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            outbox: Arc::new(Mutex::new(Vec::new())),
            simulate_failure,
            latency,
        }
    }

    /// Get the total number of messages sent
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Messages accepted so far, oldest first
    pub fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.outbox.lock().map(|outbox| outbox.clone()).unwrap_or_default()
    }

    /// First template argument of the latest message to `phone`
    pub fn last_code_for(&self, phone: &str) -> Option<String> {
        let outbox = self.outbox.lock().ok()?;
        outbox
            .iter()
            .rev()
            .find(|message| message.numbers.iter().any(|n| n == phone))
            .and_then(|message| message.args.first().cloned())
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&mut self, simulate: bool) {
        self.simulate_failure = simulate;
    }
}

impl Default for MockSmsService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SmsServiceTrait for MockSmsService {
    async fn send(
        &self,
        template_id: &str,
        args: &[String],
        numbers: &[String],
    ) -> Result<String, String> {
        if numbers.is_empty() {
            return Err("No recipients".to_string());
        }
        if let Some(invalid) = numbers.iter().find(|n| !is_valid_phone(n)) {
            return Err(format!(
                "Invalid phone number format: {}",
                mask_phone_number(invalid)
            ));
        }

        if self.simulate_failure {
            warn!(
                provider = "mock",
                recipients = numbers.len(),
                "Mock SMS service simulating failure"
            );
            return Err("Simulated SMS sending failure".to_string());
        }

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        if let Ok(mut outbox) = self.outbox.lock() {
            outbox.push(OutboundMessage {
                message_id: message_id.clone(),
                template_id: template_id.to_string(),
                args: args.to_vec(),
                numbers: numbers.to_vec(),
            });
        }

        let masked: Vec<String> = numbers.iter().map(|n| mask_phone_number(n)).collect();
        info!(
            target: "sms_service",
            provider = "mock",
            template_id = template_id,
            phones = ?masked,
            message_id = %message_id,
            count,
            "SMS sent successfully (mock)"
        );

        Ok(message_id)
    }

    fn is_valid_phone_number(&self, phone: &str) -> bool {
        is_valid_phone(phone)
    }
}
