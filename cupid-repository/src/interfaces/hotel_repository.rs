//! This module defines the `HotelRepository` trait, the write and read
//! contract over the hotel entity graph, reviews and translations.
use cupid_shared::{EmbeddingStatus, HotelId, HotelRecord, Property, Review, Translation};

use crate::errors::RepositoryError;

/// Persistence contract for Cupid hotel content.
///
/// Every store operation runs in its own transaction and either applies
/// completely or not at all.
#[async_trait::async_trait]
pub trait HotelRepository: Send + Sync {
    /// Writes the full property graph and returns the stored hotel id.
    ///
    /// The hotel row is upserted by its external id, keeping the original
    /// creation timestamp. Address and check-in are upserted one-to-one.
    /// Photos, facilities, policies, rooms and check-in instructions are
    /// replaced wholesale when the new list is non-empty and left untouched
    /// when it is empty.
    async fn store_property(&self, property: &Property) -> Result<HotelId, RepositoryError>;

    /// Replaces every review of `hotel_id` with `reviews`.
    ///
    /// An empty slice clears the hotel's reviews. Fails with
    /// [`RepositoryError::UnknownHotel`] if the hotel is not stored.
    async fn store_reviews(
        &self,
        hotel_id: HotelId,
        reviews: &[Review],
    ) -> Result<(), RepositoryError>;

    /// Replaces the hotel's translations for each language present in
    /// `translations`.
    ///
    /// An empty slice clears every translation of the hotel. Fails with
    /// [`RepositoryError::UnknownHotel`] if the hotel is not stored.
    async fn store_translations(
        &self,
        hotel_id: HotelId,
        translations: &[Translation],
    ) -> Result<(), RepositoryError>;

    /// Point lookup; a missing hotel is [`RepositoryError::HotelNotFound`].
    async fn get_hotel_by_id(&self, hotel_id: HotelId) -> Result<HotelRecord, RepositoryError>;

    /// Page of hotels ordered by hotel id.
    async fn get_hotels(&self, limit: i64, offset: i64) -> Result<Vec<HotelRecord>, RepositoryError>;

    /// Reviews of a hotel in insertion order. Unknown hotels yield an empty list.
    async fn get_hotel_reviews(&self, hotel_id: HotelId) -> Result<Vec<Review>, RepositoryError>;

    /// Translations of a hotel for one language.
    async fn get_hotel_translations(
        &self,
        hotel_id: HotelId,
        language_code: &str,
    ) -> Result<Vec<Translation>, RepositoryError>;

    /// Moves a review along the embedding lifecycle.
    async fn update_review_embedding_status(
        &self,
        review_id: i64,
        status: EmbeddingStatus,
    ) -> Result<(), RepositoryError>;

    /// Liveness check against the store.
    async fn ping(&self) -> Result<(), RepositoryError>;
}
