//! In-memory review cache with TTL expiry.
//!
//! Expiry uses tokio's clock, so tests can drive it with a paused runtime.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use cupid_shared::{HotelId, Review};
use tokio::time::Instant;

use crate::{CacheError, ReviewCache};

struct Entry {
    reviews: Vec<Review>,
    expires_at: Instant,
}

/// In-memory [`ReviewCache`].
///
/// `set_failing(true)` makes every call fail with
/// [`CacheError::Unavailable`], standing in for a backend outage.
pub struct MockReviewCache {
    entries: RwLock<HashMap<HotelId, Entry>>,
    failing: AtomicBool,
    closed: AtomicBool,
}

impl MockReviewCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            failing: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Whether a live (unexpired) entry exists for the hotel.
    pub fn contains(&self, hotel_id: HotelId) -> bool {
        self.entries
            .read()
            .unwrap()
            .get(&hotel_id)
            .is_some_and(|entry| entry.expires_at > Instant::now())
    }

    fn check(&self) -> Result<(), CacheError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(CacheError::Closed);
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(CacheError::Unavailable("mock cache set to fail".to_string()));
        }
        Ok(())
    }
}

impl Default for MockReviewCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReviewCache for MockReviewCache {
    async fn get(&self, hotel_id: HotelId) -> Result<Option<Vec<Review>>, CacheError> {
        self.check()?;
        let mut entries = self.entries.write().unwrap();
        match entries.get(&hotel_id) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.reviews.clone())),
            Some(_) => {
                entries.remove(&hotel_id);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        hotel_id: HotelId,
        reviews: &[Review],
        ttl: Duration,
    ) -> Result<(), CacheError> {
        self.check()?;
        self.entries.write().unwrap().insert(
            hotel_id,
            Entry {
                reviews: reviews.to_vec(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, hotel_id: HotelId) -> Result<(), CacheError> {
        self.check()?;
        self.entries.write().unwrap().remove(&hotel_id);
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        self.check()
    }

    async fn close(&self) -> Result<(), CacheError> {
        self.closed.store(true, Ordering::SeqCst);
        self.entries.write().unwrap().clear();
        Ok(())
    }
}
