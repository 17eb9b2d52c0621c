//! Redis-backed review cache.
//!
//! Reviews are stored as a JSON array under [`review_key`] with a
//! millisecond TTL, so expiry is handled by Redis itself.

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use cupid_shared::{HotelId, Review};
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::AsyncCommands;
use tracing::debug;

use crate::{review_key, CacheError, ReviewCache};

const CONNECTION_TIMEOUT: Duration = Duration::from_secs(2);
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(1);
const RECONNECT_RETRIES: usize = 3;

/// [`ReviewCache`] over a multiplexed, auto-reconnecting Redis connection.
pub struct RedisReviewCache {
    connection: RwLock<Option<ConnectionManager>>,
}

impl RedisReviewCache {
    /// Connects to `url` (e.g. `redis://localhost:6379`).
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let config = ConnectionManagerConfig::new()
            .set_connection_timeout(CONNECTION_TIMEOUT)
            .set_response_timeout(RESPONSE_TIMEOUT)
            .set_number_of_retries(RECONNECT_RETRIES);
        let manager = ConnectionManager::new_with_config(client, config).await?;

        Ok(Self {
            connection: RwLock::new(Some(manager)),
        })
    }

    fn connection(&self) -> Result<ConnectionManager, CacheError> {
        self.connection
            .read()
            .unwrap()
            .clone()
            .ok_or(CacheError::Closed)
    }
}

#[async_trait]
impl ReviewCache for RedisReviewCache {
    async fn get(&self, hotel_id: HotelId) -> Result<Option<Vec<Review>>, CacheError> {
        let mut conn = self.connection()?;
        let payload: Option<String> = conn.get(review_key(hotel_id)).await?;

        match payload {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        hotel_id: HotelId,
        reviews: &[Review],
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let payload = serde_json::to_string(reviews)?;
        // PX 0 is rejected by Redis.
        let ttl_ms = (ttl.as_millis() as u64).max(1);

        let mut conn = self.connection()?;
        let _: () = conn.pset_ex(review_key(hotel_id), payload, ttl_ms).await?;

        debug!(hotel_id, reviews = reviews.len(), ttl_ms, "Cached reviews");
        Ok(())
    }

    async fn delete(&self, hotel_id: HotelId) -> Result<(), CacheError> {
        let mut conn = self.connection()?;
        let _: () = conn.del(review_key(hotel_id)).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.connection()?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), CacheError> {
        // Dropping the last manager clone closes the connection.
        self.connection.write().unwrap().take();
        Ok(())
    }
}
