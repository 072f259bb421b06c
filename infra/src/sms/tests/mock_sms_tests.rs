//! Tests for the mock SMS service

use std::time::Duration;

use vc_core::services::SmsServiceTrait;

use crate::sms::MockSmsService;

fn quiet() -> MockSmsService {
    MockSmsService::with_options(false, Duration::ZERO)
}

fn numbers(phone: &str) -> Vec<String> {
    vec![phone.to_string()]
}

#[tokio::test]
async fn test_mock_sms_send_success() {
    let service = quiet();
    let message_id = service
        .send("1877556", &["042317".to_string()], &numbers("+8613812345678"))
        .await
        .unwrap();

    assert!(message_id.starts_with("mock_"));
    assert_eq!(service.get_message_count(), 1);

    let sent = service.sent_messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].message_id, message_id);
    assert_eq!(sent[0].template_id, "1877556");
    assert_eq!(service.last_code_for("+8613812345678").as_deref(), Some("042317"));
}

#[tokio::test]
async fn test_mock_sms_invalid_phone() {
    let service = quiet();
    let err = service
        .send("1877556", &["042317".to_string()], &numbers("not-a-phone"))
        .await
        .unwrap_err();

    assert!(err.contains("Invalid phone number"));
    assert!(!err.contains("not-a-phone"));
    assert_eq!(service.get_message_count(), 0);
}

#[tokio::test]
async fn test_mock_sms_requires_recipients() {
    let service = quiet();
    assert!(service.send("1877556", &[], &[]).await.is_err());
}

#[tokio::test]
async fn test_mock_sms_simulate_failure() {
    let mut service = quiet();
    service.set_simulate_failure(true);

    let result = service
        .send("1877556", &["042317".to_string()], &numbers("+15551234567"))
        .await;
    assert_eq!(result.unwrap_err(), "Simulated SMS sending failure");
    assert!(service.sent_messages().is_empty());
}

#[tokio::test]
async fn test_mock_sms_latest_code_wins() {
    let service = quiet();
    for code in ["111111", "222222"] {
        service
            .send("1877556", &[code.to_string()], &numbers("+15551234567"))
            .await
            .unwrap();
    }

    assert_eq!(service.get_message_count(), 2);
    assert_eq!(service.last_code_for("+15551234567").as_deref(), Some("222222"));
    assert_eq!(service.last_code_for("+15550000000"), None);
}

#[tokio::test(start_paused = true)]
async fn test_mock_sms_default_latency() {
    let service = MockSmsService::new();
    let started = tokio::time::Instant::now();

    service
        .send("1877556", &["042317".to_string()], &numbers("+15551234567"))
        .await
        .unwrap();
    assert!(started.elapsed() >= Duration::from_millis(100));
}

#[test]
fn test_phone_validation() {
    let service = quiet();
    assert!(service.is_valid_phone_number("+15551234567"));
    assert!(service.is_valid_phone_number("13812345678"));
    assert!(!service.is_valid_phone_number("12345"));
}
