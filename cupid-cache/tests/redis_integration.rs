//! Integration tests against a live Redis.
//!
//! Ignored by default. Run with a server on `REDIS_URL`
//! (default `redis://localhost:6379`):
//! `cargo test --test redis_integration -- --ignored`

use std::time::Duration;

use cupid_cache::{CacheError, RedisReviewCache, ReviewCache};
use cupid_shared::Review;

fn redis_url() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
}

fn make_reviews() -> Vec<Review> {
    vec![
        Review {
            id: 1,
            hotel_id: 1641879,
            reviewer_name: "Ana".to_string(),
            rating: 5,
            title: "Great".to_string(),
            ..Default::default()
        },
        Review {
            id: 2,
            hotel_id: 1641879,
            reviewer_name: "Ben".to_string(),
            rating: 3,
            title: "Small rooms".to_string(),
            ..Default::default()
        },
    ]
}

#[tokio::test]
#[ignore]
async fn test_round_trip_and_delete() {
    let cache = RedisReviewCache::connect(&redis_url()).await.unwrap();
    cache.ping().await.unwrap();

    cache.delete(1641879).await.unwrap();
    assert_eq!(cache.get(1641879).await.unwrap(), None);

    cache
        .set(1641879, &make_reviews(), Duration::from_secs(30))
        .await
        .unwrap();
    assert_eq!(cache.get(1641879).await.unwrap(), Some(make_reviews()));

    cache.delete(1641879).await.unwrap();
    assert_eq!(cache.get(1641879).await.unwrap(), None);
}

#[tokio::test]
#[ignore]
async fn test_ttl_expiry() {
    let cache = RedisReviewCache::connect(&redis_url()).await.unwrap();

    cache
        .set(1202743, &make_reviews(), Duration::from_millis(100))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(cache.get(1202743).await.unwrap(), None);
}

#[tokio::test]
#[ignore]
async fn test_closed_cache_rejects_calls() {
    let cache = RedisReviewCache::connect(&redis_url()).await.unwrap();
    cache.close().await.unwrap();

    assert!(matches!(cache.get(1).await, Err(CacheError::Closed)));
}
