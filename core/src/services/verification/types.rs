//! Types for verification service results

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of sending a verification code
///
/// The code itself is deliberately absent: it only ever travels to the notifier.
#[derive(Debug, Clone, Serialize)]
pub struct SendCodeResult {
    /// The SMS message ID from the provider
    pub message_id: String,
    /// When the user can request another code
    pub next_resend_at: DateTime<Utc>,
    /// When the issued code stops being accepted
    pub expires_at: DateTime<Utc>,
}
