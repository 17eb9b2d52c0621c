//! Hotel read service.
//!
//! This is the API request handlers call. Every method validates its raw
//! input first, so malformed ids never reach the repository or the cache.

use std::sync::Arc;

use cupid_cache::ReviewCache;
use cupid_repository::{HotelRepository, RepositoryError};
use cupid_shared::{HotelId, HotelRecord};
use tracing::{debug, error, warn};

use crate::config::ReaderConfig;
use crate::errors::ReaderError;
use crate::types::{CacheHealth, HealthReport, HotelPage, ReviewsView, TranslationsView};

/// Read-side facade over the repository and the optional review cache.
///
/// # Example
///
/// ```ignore
/// let reader = HotelReader::new(repository, cupid_cache::connect_or_disable(source).await);
///
/// let hotel = reader.get_hotel("1641879").await?;
/// let view = reader.get_hotel_reviews("1641879").await?;
/// assert!(!view.from_cache); // first read populates the cache
/// ```
pub struct HotelReader {
    repository: Arc<dyn HotelRepository>,
    cache: Option<Arc<dyn ReviewCache>>,
    config: ReaderConfig,
}

impl HotelReader {
    /// Create a reader with default configuration. `cache` may be `None` to
    /// run with caching disabled.
    pub fn new(repository: Arc<dyn HotelRepository>, cache: Option<Arc<dyn ReviewCache>>) -> Self {
        Self::with_config(repository, cache, ReaderConfig::default())
    }

    pub fn with_config(
        repository: Arc<dyn HotelRepository>,
        cache: Option<Arc<dyn ReviewCache>>,
        config: ReaderConfig,
    ) -> Self {
        Self {
            repository,
            cache,
            config,
        }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Parse a caller-supplied hotel id. Must be a positive integer.
    pub fn parse_hotel_id(raw: &str) -> Result<HotelId, ReaderError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ReaderError::validation("Invalid hotel ID"));
        }
        let hotel_id: HotelId = raw
            .parse()
            .map_err(|_| ReaderError::validation("Invalid hotel ID format"))?;
        if hotel_id <= 0 {
            return Err(ReaderError::validation("Hotel ID must be positive"));
        }
        Ok(hotel_id)
    }

    fn internal(operation: &str, err: RepositoryError) -> ReaderError {
        error!(operation, error = %err, "Repository read failed");
        ReaderError::Internal(err)
    }

    pub async fn get_hotel(&self, raw_id: &str) -> Result<HotelRecord, ReaderError> {
        let hotel_id = Self::parse_hotel_id(raw_id)?;

        match self.repository.get_hotel_by_id(hotel_id).await {
            Ok(hotel) => Ok(hotel),
            Err(RepositoryError::HotelNotFound(id)) => Err(ReaderError::NotFound(id)),
            Err(e) => Err(Self::internal("get_hotel", e)),
        }
    }

    /// A page of hotels ordered by id.
    ///
    /// A missing or non-positive limit falls back to the default; larger
    /// limits are capped. Negative offsets read from the start.
    pub async fn list_hotels(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<HotelPage, ReaderError> {
        let limit = self.config.resolve_limit(limit);
        let offset = offset.unwrap_or(0).max(0);

        let hotels = self
            .repository
            .get_hotels(limit, offset)
            .await
            .map_err(|e| Self::internal("list_hotels", e))?;

        Ok(HotelPage {
            hotels,
            limit,
            offset,
        })
    }

    /// Reviews of a hotel, served cache-aside.
    ///
    /// A cache hit is returned as-is with `from_cache` set. On a miss or a
    /// cache error the repository is read and the cache repopulated; failing
    /// to repopulate is logged and never fails the read.
    pub async fn get_hotel_reviews(&self, raw_id: &str) -> Result<ReviewsView, ReaderError> {
        let hotel_id = Self::parse_hotel_id(raw_id)?;

        if let Some(cache) = &self.cache {
            match cache.get(hotel_id).await {
                Ok(Some(reviews)) => {
                    debug!(hotel_id, "Review cache hit");
                    return Ok(ReviewsView {
                        hotel_id,
                        count: reviews.len(),
                        reviews,
                        from_cache: true,
                    });
                }
                Ok(None) => debug!(hotel_id, "Review cache miss"),
                Err(e) => warn!(hotel_id, error = %e, "Review cache read failed, using store"),
            }
        }

        let reviews = self
            .repository
            .get_hotel_reviews(hotel_id)
            .await
            .map_err(|e| Self::internal("get_hotel_reviews", e))?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set(hotel_id, &reviews, self.config.review_ttl).await {
                warn!(hotel_id, error = %e, "Failed to cache reviews");
            }
        }

        Ok(ReviewsView {
            hotel_id,
            count: reviews.len(),
            reviews,
            from_cache: false,
        })
    }

    pub async fn get_hotel_translations(
        &self,
        raw_id: &str,
        language: &str,
    ) -> Result<TranslationsView, ReaderError> {
        let hotel_id = Self::parse_hotel_id(raw_id)?;

        let language = language.trim();
        if language.is_empty() {
            return Err(ReaderError::validation("Invalid language code"));
        }
        if !self.config.supports_language(language) {
            return Err(ReaderError::validation(format!(
                "Unsupported language code. Supported: {}",
                self.config.languages.join(", ")
            )));
        }

        let translations = self
            .repository
            .get_hotel_translations(hotel_id, language)
            .await
            .map_err(|e| Self::internal("get_hotel_translations", e))?;

        Ok(TranslationsView {
            hotel_id,
            language: language.to_string(),
            count: translations.len(),
            translations,
        })
    }

    pub async fn health(&self) -> HealthReport {
        let database = match self.repository.ping().await {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "Database ping failed");
                false
            }
        };

        let cache = match &self.cache {
            None => CacheHealth::Disabled,
            Some(cache) => match cache.ping().await {
                Ok(()) => CacheHealth::Up,
                Err(e) => {
                    warn!(error = %e, "Review cache ping failed");
                    CacheHealth::Down
                }
            },
        };

        HealthReport { database, cache }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hotel_id() {
        assert_eq!(HotelReader::parse_hotel_id("1641879").unwrap(), 1641879);
        assert_eq!(HotelReader::parse_hotel_id(" 42 ").unwrap(), 42);

        for raw in ["", "   ", "abc", "12a", "1.5", "0", "-3"] {
            let err = HotelReader::parse_hotel_id(raw).unwrap_err();
            assert!(err.is_validation(), "{raw:?} should be rejected");
        }
    }
}
