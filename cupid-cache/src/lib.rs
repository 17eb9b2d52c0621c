//! Review cache sitting in front of the hotel repository.
//!
//! Reviews are the most read child collection, so reads go through a
//! cache-aside layer keyed by hotel id. The cache is strictly optional:
//! if the backend cannot be reached at startup the caller runs without it.
//!
//! ## Usage
//!
//! ```ignore
//! use cupid_cache::{connect_or_disable, CacheSource};
//!
//! // Development: in-memory cache with real TTL handling
//! let cache = CacheSource::mock().into_cache().await?;
//!
//! // Production: Redis, or no cache at all if Redis is down
//! let cache: Option<Arc<dyn ReviewCache>> =
//!     connect_or_disable(CacheSource::redis("redis://localhost:6379")).await;
//! ```

mod mock;
mod redis_cache;

pub use mock::MockReviewCache;
pub use redis_cache::RedisReviewCache;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cupid_shared::{HotelId, Review};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache is closed")]
    Closed,

    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

/// Cache key holding the serialized reviews of a hotel.
pub fn review_key(hotel_id: HotelId) -> String {
    format!("reviews:hotel:{hotel_id}")
}

/// Capability contract for review caches.
///
/// `get` distinguishes a hit (possibly an empty list) from a miss
/// (`Ok(None)`); backend failures are errors so callers can bypass the
/// cache. An expired entry is a miss.
#[async_trait]
pub trait ReviewCache: Send + Sync {
    async fn get(&self, hotel_id: HotelId) -> Result<Option<Vec<Review>>, CacheError>;

    async fn set(&self, hotel_id: HotelId, reviews: &[Review], ttl: Duration)
        -> Result<(), CacheError>;

    async fn delete(&self, hotel_id: HotelId) -> Result<(), CacheError>;

    async fn ping(&self) -> Result<(), CacheError>;

    /// Releases the backend. Later calls fail with [`CacheError::Closed`].
    async fn close(&self) -> Result<(), CacheError>;
}

/// Configuration for the review cache backend.
#[derive(Debug, Clone)]
pub enum CacheSource {
    /// In-process cache for tests and local development.
    Mock,

    /// Redis.
    Redis { url: String },
}

impl CacheSource {
    pub fn mock() -> Self {
        Self::Mock
    }

    pub fn redis(url: impl Into<String>) -> Self {
        Self::Redis { url: url.into() }
    }

    /// Create the cache with the selected backend.
    pub async fn into_cache(self) -> Result<Arc<dyn ReviewCache>, CacheError> {
        match self {
            Self::Mock => Ok(Arc::new(MockReviewCache::new())),
            Self::Redis { url } => Ok(Arc::new(RedisReviewCache::connect(&url).await?)),
        }
    }
}

/// Builds the cache and checks it answers, or returns `None` so the caller
/// runs with caching disabled.
pub async fn connect_or_disable(source: CacheSource) -> Option<Arc<dyn ReviewCache>> {
    let cache = match source.into_cache().await {
        Ok(cache) => cache,
        Err(e) => {
            warn!(error = %e, "Review cache unavailable, continuing without cache");
            return None;
        }
    };

    match cache.ping().await {
        Ok(()) => {
            info!("Review cache connected");
            Some(cache)
        }
        Err(e) => {
            warn!(error = %e, "Review cache unavailable, continuing without cache");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_key() {
        assert_eq!(review_key(1641879), "reviews:hotel:1641879");
    }

    #[tokio::test]
    async fn test_connect_or_disable_with_mock() {
        assert!(connect_or_disable(CacheSource::mock()).await.is_some());
    }

    #[tokio::test]
    async fn test_connect_or_disable_with_invalid_url() {
        let cache = connect_or_disable(CacheSource::redis("not-a-redis-url")).await;
        assert!(cache.is_none());
    }
}
