//! Integration tests for the Redis code store scripts
//!
//! These tests require a running Redis instance to execute.
//! Run with: cargo test -p vc_infra --test redis_code_store_integration -- --ignored

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;
use vc_core::repositories::{CheckOutcome, CodeStore, StoreOutcome};
use vc_infra::cache::{CacheConfig, RedisClient, RedisCodeStore};
use vc_shared::config::VerificationConfig;

async fn redis_client() -> RedisClient {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
    RedisClient::new(CacheConfig::new(url))
        .await
        .expect("Failed to connect to Redis")
}

/// Store under a unique prefix so parallel runs never share keys
async fn code_store(config: VerificationConfig) -> RedisCodeStore {
    let config = config.with_key_prefix(format!("vc-test-{}", Uuid::new_v4().simple()));
    let store = RedisCodeStore::new(redis_client().await, config);
    store.load_scripts().await.unwrap();
    store
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_login_scenario() {
    let store = code_store(VerificationConfig::default()).await;

    assert_eq!(store.store("login", "+1555", "042317").await.unwrap(), StoreOutcome::Stored);
    assert_eq!(store.check("login", "+1555", "000000").await.unwrap(), CheckOutcome::Mismatch);
    assert_eq!(store.check("login", "+1555", "042317").await.unwrap(), CheckOutcome::Matched);
    assert_eq!(store.check("login", "+1555", "042317").await.unwrap(), CheckOutcome::NotFound);
    assert_eq!(store.check("login", "+1999", "123456").await.unwrap(), CheckOutcome::NotFound);
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_record_layout_and_expiry() {
    let store = code_store(VerificationConfig::default()).await;
    store.store("login", "+1555", "042317").await.unwrap();

    let key = store.key_for("login", "+1555").unwrap();
    assert!(key.ends_with(":login:+1555"));

    let client = store.redis_client();
    let ttl = client.ttl(&key).await.unwrap().unwrap();
    assert!(ttl > 590 && ttl <= 600);
    assert_eq!(client.hget(&key, "attempts").await.unwrap().as_deref(), Some("3"));

    // Only the digest is stored
    let stored = client.hget(&key, "code").await.unwrap().unwrap();
    assert_eq!(stored.len(), 64);
    assert_ne!(stored, "042317");

    client.delete(&key).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_resend_interval() {
    // 5 second lifetime, 1 second cooldown
    let store = code_store(VerificationConfig::default().with_timing(5, 1)).await;

    assert_eq!(store.store("login", "+1555", "111111").await.unwrap(), StoreOutcome::Stored);
    assert_eq!(
        store.store("login", "+1555", "222222").await.unwrap(),
        StoreOutcome::TooFrequent
    );
    // The first code is untouched by the rejected store
    assert_eq!(store.remaining_attempts("login", "+1555").await.unwrap(), Some(3));

    tokio::time::sleep(Duration::from_millis(1100)).await;

    assert_eq!(store.store("login", "+1555", "222222").await.unwrap(), StoreOutcome::Stored);
    assert_eq!(store.check("login", "+1555", "111111").await.unwrap(), CheckOutcome::Mismatch);
    assert_eq!(store.check("login", "+1555", "222222").await.unwrap(), CheckOutcome::Matched);
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_code_expires() {
    let store = code_store(VerificationConfig::default().with_timing(1, 1)).await;
    store.store("login", "+1555", "111111").await.unwrap();

    tokio::time::sleep(Duration::from_millis(1500)).await;

    assert_eq!(store.check("login", "+1555", "111111").await.unwrap(), CheckOutcome::NotFound);
    assert_eq!(store.store("login", "+1555", "222222").await.unwrap(), StoreOutcome::Stored);
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_exhaustion_blocks_correct_code() {
    let store = code_store(VerificationConfig::default()).await;
    store.store("login", "+1555", "042317").await.unwrap();

    for _ in 0..3 {
        assert_eq!(store.check("login", "+1555", "000000").await.unwrap(), CheckOutcome::Mismatch);
    }
    assert_eq!(
        store.check("login", "+1555", "042317").await.unwrap(),
        CheckOutcome::TooManyAttempts
    );
    assert_eq!(store.remaining_attempts("login", "+1555").await.unwrap(), Some(0));
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_corrupt_record_is_replaced() {
    let store = code_store(VerificationConfig::default()).await;
    let key = store.key_for("login", "+1555").unwrap();
    let client = store.redis_client();

    // A plain string without expiry where the hash should be
    let mut conn = redis::Client::open(
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
    )
    .unwrap()
    .get_multiplexed_async_connection()
    .await
    .unwrap();
    redis::cmd("SET").arg(&key).arg("garbage").query_async::<_, ()>(&mut conn).await.unwrap();

    assert_eq!(store.check("login", "+1555", "042317").await.unwrap(), CheckOutcome::NotFound);
    assert_eq!(store.store("login", "+1555", "042317").await.unwrap(), StoreOutcome::Stored);
    assert!(client.ttl(&key).await.unwrap().is_some());
    assert_eq!(store.check("login", "+1555", "042317").await.unwrap(), CheckOutcome::Matched);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore] // Requires Redis server
async fn test_concurrent_mismatches_decrement_exactly_once_each() {
    const N: u32 = 10;
    let store = Arc::new(code_store(VerificationConfig::default().with_max_attempts(N)).await);
    store.store("login", "+1555", "042317").await.unwrap();

    let handles: Vec<_> = (0..N * 2)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.check("login", "+1555", "000000").await.unwrap() })
        })
        .collect();

    let mut mismatches = 0;
    let mut exhausted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            CheckOutcome::Mismatch => mismatches += 1,
            CheckOutcome::TooManyAttempts => exhausted += 1,
            other => panic!("Unexpected outcome {:?}", other),
        }
    }

    assert_eq!(mismatches, N);
    assert_eq!(exhausted, N);
    assert_eq!(store.remaining_attempts("login", "+1555").await.unwrap(), Some(0));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore] // Requires Redis server
async fn test_concurrent_stores_admit_one_winner() {
    let store = Arc::new(code_store(VerificationConfig::default()).await);

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                let code = format!("{:06}", i);
                (code.clone(), store.store("login", "+1555", &code).await.unwrap())
            })
        })
        .collect();

    let mut winners = Vec::new();
    for handle in handles {
        let (code, outcome) = handle.await.unwrap();
        if outcome == StoreOutcome::Stored {
            winners.push(code);
        }
    }

    assert_eq!(winners.len(), 1);
    assert_eq!(
        store.check("login", "+1555", &winners[0]).await.unwrap(),
        CheckOutcome::Matched
    );
}
