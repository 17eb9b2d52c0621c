//! Integration tests for the hotel reader.
//!
//! Uses the in-memory repository and review cache, plus hand-written
//! doubles for store failures and call counting.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cupid_cache::{MockReviewCache, ReviewCache};
use cupid_reader::{CacheHealth, HotelReader, ReaderConfig, ReaderError};
use cupid_repository::{HotelRepository, InMemoryHotelRepository, RepositoryError};
use cupid_shared::{
    EmbeddingStatus, HotelId, HotelRecord, Property, Review, Translation, TranslationEntity,
};

// ============================================================================
// Test doubles
// ============================================================================

/// Delegates to an in-memory repository and counts every read.
struct CountingRepository {
    inner: InMemoryHotelRepository,
    reads: AtomicUsize,
}

impl CountingRepository {
    fn new() -> Self {
        Self {
            inner: InMemoryHotelRepository::new(),
            reads: AtomicUsize::new(0),
        }
    }

    fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn read(&self) {
        self.reads.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl HotelRepository for CountingRepository {
    async fn store_property(&self, property: &Property) -> Result<HotelId, RepositoryError> {
        self.inner.store_property(property).await
    }

    async fn store_reviews(&self, hotel_id: HotelId, reviews: &[Review]) -> Result<(), RepositoryError> {
        self.inner.store_reviews(hotel_id, reviews).await
    }

    async fn store_translations(
        &self,
        hotel_id: HotelId,
        translations: &[Translation],
    ) -> Result<(), RepositoryError> {
        self.inner.store_translations(hotel_id, translations).await
    }

    async fn get_hotel_by_id(&self, hotel_id: HotelId) -> Result<HotelRecord, RepositoryError> {
        self.read();
        self.inner.get_hotel_by_id(hotel_id).await
    }

    async fn get_hotels(&self, limit: i64, offset: i64) -> Result<Vec<HotelRecord>, RepositoryError> {
        self.read();
        self.inner.get_hotels(limit, offset).await
    }

    async fn get_hotel_reviews(&self, hotel_id: HotelId) -> Result<Vec<Review>, RepositoryError> {
        self.read();
        self.inner.get_hotel_reviews(hotel_id).await
    }

    async fn get_hotel_translations(
        &self,
        hotel_id: HotelId,
        language_code: &str,
    ) -> Result<Vec<Translation>, RepositoryError> {
        self.read();
        self.inner.get_hotel_translations(hotel_id, language_code).await
    }

    async fn update_review_embedding_status(
        &self,
        review_id: i64,
        status: EmbeddingStatus,
    ) -> Result<(), RepositoryError> {
        self.inner.update_review_embedding_status(review_id, status).await
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.inner.ping().await
    }
}

/// Fails every operation as if the database were gone.
struct BrokenRepository;

fn broken() -> RepositoryError {
    RepositoryError::InvalidData("connection reset by peer".to_string())
}

#[async_trait]
impl HotelRepository for BrokenRepository {
    async fn store_property(&self, _: &Property) -> Result<HotelId, RepositoryError> {
        Err(broken())
    }
    async fn store_reviews(&self, _: HotelId, _: &[Review]) -> Result<(), RepositoryError> {
        Err(broken())
    }
    async fn store_translations(&self, _: HotelId, _: &[Translation]) -> Result<(), RepositoryError> {
        Err(broken())
    }
    async fn get_hotel_by_id(&self, _: HotelId) -> Result<HotelRecord, RepositoryError> {
        Err(broken())
    }
    async fn get_hotels(&self, _: i64, _: i64) -> Result<Vec<HotelRecord>, RepositoryError> {
        Err(broken())
    }
    async fn get_hotel_reviews(&self, _: HotelId) -> Result<Vec<Review>, RepositoryError> {
        Err(broken())
    }
    async fn get_hotel_translations(&self, _: HotelId, _: &str) -> Result<Vec<Translation>, RepositoryError> {
        Err(broken())
    }
    async fn update_review_embedding_status(&self, _: i64, _: EmbeddingStatus) -> Result<(), RepositoryError> {
        Err(broken())
    }
    async fn ping(&self) -> Result<(), RepositoryError> {
        Err(broken())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

fn make_property(hotel_id: HotelId) -> Property {
    Property {
        hotel_id,
        cupid_id: hotel_id,
        hotel_name: "The Z Hotel Covent Garden".to_string(),
        rating: 8.3,
        ..Default::default()
    }
}

fn make_review(title: &str) -> Review {
    Review {
        title: title.to_string(),
        rating: 5,
        ..Default::default()
    }
}

async fn seeded() -> Arc<CountingRepository> {
    let repository = Arc::new(CountingRepository::new());
    repository.store_property(&make_property(1641879)).await.unwrap();
    repository
        .store_reviews(1641879, &[make_review("A"), make_review("B")])
        .await
        .unwrap();
    repository
        .store_translations(
            1641879,
            &[Translation {
                hotel_id: 1641879,
                entity_type: TranslationEntity::Hotel,
                entity_id: 1641879,
                language_code: "fr".to_string(),
                field_name: "hotel_name".to_string(),
                translated_text: "L'Hôtel Z".to_string(),
            }],
        )
        .await
        .unwrap();
    repository
}

// ============================================================================
// Hotel lookups
// ============================================================================

#[tokio::test]
async fn test_get_hotel_found_and_not_found() {
    let repository = seeded().await;
    let reader = HotelReader::new(repository, None);

    let hotel = reader.get_hotel("1641879").await.unwrap();
    assert_eq!(hotel.hotel_id, 1641879);
    assert_eq!(hotel.hotel_name, "The Z Hotel Covent Garden");
    assert_eq!(hotel.rating, 8.3);

    let missing = reader.get_hotel("999999").await.unwrap_err();
    assert!(matches!(missing, ReaderError::NotFound(999999)));
}

#[tokio::test]
async fn test_invalid_ids_never_reach_store_or_cache() {
    let repository = seeded().await;
    let cache = Arc::new(MockReviewCache::new());
    let reader = HotelReader::new(repository.clone(), Some(cache.clone() as Arc<dyn ReviewCache>));

    for raw in ["abc", "", "-1", "0"] {
        assert!(reader.get_hotel(raw).await.unwrap_err().is_validation());
        assert!(reader.get_hotel_reviews(raw).await.unwrap_err().is_validation());
        assert!(reader
            .get_hotel_translations(raw, "fr")
            .await
            .unwrap_err()
            .is_validation());
    }

    assert_eq!(repository.reads(), 0);
}

#[tokio::test]
async fn test_store_failure_is_generic_internal_error() {
    let reader = HotelReader::new(Arc::new(BrokenRepository), None);

    let err = reader.get_hotel("1641879").await.unwrap_err();
    assert!(matches!(err, ReaderError::Internal(_)));
    assert_eq!(err.to_string(), "Internal server error");

    let err = reader.list_hotels(None, None).await.unwrap_err();
    assert!(matches!(err, ReaderError::Internal(_)));
}

#[tokio::test]
async fn test_list_hotels_resolves_paging() {
    let repository = seeded().await;
    repository.store_property(&make_property(2000)).await.unwrap();
    let reader = HotelReader::new(repository, None);

    let page = reader.list_hotels(None, None).await.unwrap();
    assert_eq!(page.limit, 50);
    assert_eq!(page.offset, 0);
    assert_eq!(page.hotels.len(), 2);

    let page = reader.list_hotels(Some(1000), Some(-4)).await.unwrap();
    assert_eq!(page.limit, 100);
    assert_eq!(page.offset, 0);

    let page = reader.list_hotels(Some(1), Some(1)).await.unwrap();
    assert_eq!(page.hotels.len(), 1);
    assert_eq!(page.hotels[0].hotel_id, 1641879);
}

// ============================================================================
// Cache-aside reviews
// ============================================================================

#[tokio::test]
async fn test_reviews_miss_then_hit() {
    let repository = seeded().await;
    let cache = Arc::new(MockReviewCache::new());
    let reader = HotelReader::new(repository.clone(), Some(cache.clone() as Arc<dyn ReviewCache>));

    let first = reader.get_hotel_reviews("1641879").await.unwrap();
    assert!(!first.from_cache);
    assert_eq!(first.count, 2);
    assert!(cache.contains(1641879));

    let second = reader.get_hotel_reviews("1641879").await.unwrap();
    assert!(second.from_cache);
    assert_eq!(second.reviews, first.reviews);

    assert_eq!(repository.reads(), 1);
}

#[tokio::test]
async fn test_reviews_cached_empty_list_is_a_hit() {
    let repository = seeded().await;
    repository.store_property(&make_property(7)).await.unwrap();
    let cache = Arc::new(MockReviewCache::new());
    let reader = HotelReader::new(repository.clone(), Some(cache as Arc<dyn ReviewCache>));

    assert!(!reader.get_hotel_reviews("7").await.unwrap().from_cache);
    let again = reader.get_hotel_reviews("7").await.unwrap();
    assert!(again.from_cache);
    assert!(again.reviews.is_empty());
}

#[tokio::test]
async fn test_reviews_fall_back_when_cache_fails() {
    let repository = seeded().await;
    let cache = Arc::new(MockReviewCache::new());
    cache.set_failing(true);
    let reader = HotelReader::new(repository.clone(), Some(cache as Arc<dyn ReviewCache>));

    let view = reader.get_hotel_reviews("1641879").await.unwrap();
    assert!(!view.from_cache);
    assert_eq!(view.count, 2);

    let view = reader.get_hotel_reviews("1641879").await.unwrap();
    assert!(!view.from_cache);
    assert_eq!(repository.reads(), 2);
}

#[tokio::test]
async fn test_reviews_without_cache() {
    let repository = seeded().await;
    let reader = HotelReader::new(repository.clone(), None);

    for _ in 0..2 {
        let view = reader.get_hotel_reviews("1641879").await.unwrap();
        assert!(!view.from_cache);
    }
    assert_eq!(repository.reads(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_reviews_reload_after_ttl() {
    let repository = seeded().await;
    let cache = Arc::new(MockReviewCache::new());
    let config = ReaderConfig::default().with_review_ttl(Duration::from_millis(100));
    let reader = HotelReader::with_config(
        repository.clone(),
        Some(cache as Arc<dyn ReviewCache>),
        config,
    );

    assert!(!reader.get_hotel_reviews("1641879").await.unwrap().from_cache);
    assert!(reader.get_hotel_reviews("1641879").await.unwrap().from_cache);

    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(!reader.get_hotel_reviews("1641879").await.unwrap().from_cache);
    assert_eq!(repository.reads(), 2);
}

// ============================================================================
// Translations and health
// ============================================================================

#[tokio::test]
async fn test_translations_by_language() {
    let repository = seeded().await;
    let reader = HotelReader::new(repository.clone(), None);

    let view = reader.get_hotel_translations("1641879", "fr").await.unwrap();
    assert_eq!(view.language, "fr");
    assert_eq!(view.count, 1);
    assert_eq!(view.translations[0].translated_text, "L'Hôtel Z");

    let empty = reader.get_hotel_translations("1641879", "es").await.unwrap();
    assert_eq!(empty.count, 0);

    let err = reader.get_hotel_translations("1641879", "de").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Validation error: Unsupported language code. Supported: fr, es, en"
    );
    assert_eq!(repository.reads(), 2);
}

#[tokio::test]
async fn test_health() {
    let repository = seeded().await;

    let reader = HotelReader::new(repository.clone(), None);
    let report = reader.health().await;
    assert!(report.is_healthy());
    assert_eq!(report.cache, CacheHealth::Disabled);

    let cache = Arc::new(MockReviewCache::new());
    cache.set_failing(true);
    let reader = HotelReader::new(repository, Some(cache as Arc<dyn ReviewCache>));
    let report = reader.health().await;
    assert!(report.is_healthy());
    assert_eq!(report.cache, CacheHealth::Down);

    let reader = HotelReader::new(Arc::new(BrokenRepository), None);
    assert!(!reader.health().await.is_healthy());
}
