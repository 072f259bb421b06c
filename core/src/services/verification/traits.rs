//! Traits for SMS delivery integration

use async_trait::async_trait;

/// Trait for SMS service integration
#[async_trait]
pub trait SmsServiceTrait: Send + Sync {
    /// Send a templated SMS
    ///
    /// # Arguments
    /// * `template_id` - Provider template identifier
    /// * `args` - Positional template arguments
    /// * `numbers` - Recipient phone numbers
    ///
    /// # Returns
    /// The provider message id
    async fn send(
        &self,
        template_id: &str,
        args: &[String],
        numbers: &[String],
    ) -> Result<String, String>;

    /// Check if the phone number format is accepted by the provider
    fn is_valid_phone_number(&self, phone: &str) -> bool;
}
