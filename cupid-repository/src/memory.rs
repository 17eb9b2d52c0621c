//! In-memory hotel repository for tests and local development.
//!
//! Mirrors the PostgreSQL backend's observable behaviour: upserts keep the
//! creation timestamp, empty child lists leave stored ones untouched, and
//! reviews or translations for an unknown hotel are rejected.
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cupid_shared::{
    EmbeddingStatus, HotelId, HotelRecord, Property, Review, Translation,
};

use crate::{dedupe_translations, HotelRepository, RepositoryError};

struct StoredHotel {
    property: Property,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StoredHotel {
    fn record(&self) -> HotelRecord {
        HotelRecord {
            hotel_id: self.property.hotel_id,
            cupid_id: self.property.cupid_id,
            hotel_name: self.property.hotel_name.clone(),
            rating: self.property.rating,
            review_count: self.property.review_count,
            stars: self.property.stars,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Default)]
struct MemoryState {
    hotels: BTreeMap<HotelId, StoredHotel>,
    reviews: HashMap<HotelId, Vec<Review>>,
    translations: Vec<Translation>,
    next_review_id: i64,
}

/// In-memory implementation of [`HotelRepository`].
pub struct InMemoryHotelRepository {
    state: RwLock<MemoryState>,
}

impl InMemoryHotelRepository {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState::default()),
        }
    }

    /// The full stored graph of a hotel, as it would be reassembled from rows.
    pub fn stored_property(&self, hotel_id: HotelId) -> Option<Property> {
        let state = self.state.read().unwrap();
        state.hotels.get(&hotel_id).map(|h| h.property.clone())
    }

    pub fn hotel_count(&self) -> usize {
        self.state.read().unwrap().hotels.len()
    }
}

impl Default for InMemoryHotelRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies `incoming` over `previous`, keeping previous children wherever
/// the incoming list is empty.
fn merge_property(previous: &Property, incoming: &Property) -> Property {
    let mut merged = incoming.clone();
    if incoming.checkin.instructions.is_empty() {
        merged.checkin.instructions = previous.checkin.instructions.clone();
    }
    if incoming.photos.is_empty() {
        merged.photos = previous.photos.clone();
    }
    if incoming.facilities.is_empty() {
        merged.facilities = previous.facilities.clone();
    }
    if incoming.policies.is_empty() {
        merged.policies = previous.policies.clone();
    }
    if incoming.rooms.is_empty() {
        merged.rooms = previous.rooms.clone();
    }
    merged
}

#[async_trait]
impl HotelRepository for InMemoryHotelRepository {
    async fn store_property(&self, property: &Property) -> Result<HotelId, RepositoryError> {
        let mut room_ids = HashSet::new();
        if let Some(room) = property.rooms.iter().find(|room| !room_ids.insert(room.id)) {
            return Err(RepositoryError::InvalidData(format!(
                "duplicate room {} in hotel {}",
                room.id, property.hotel_id
            )));
        }

        let now = Utc::now();
        let mut state = self.state.write().unwrap();
        match state.hotels.get_mut(&property.hotel_id) {
            Some(stored) => {
                stored.property = merge_property(&stored.property, property);
                stored.updated_at = now;
            }
            None => {
                state.hotels.insert(
                    property.hotel_id,
                    StoredHotel {
                        property: property.clone(),
                        created_at: now,
                        updated_at: now,
                    },
                );
            }
        }
        Ok(property.hotel_id)
    }

    async fn store_reviews(
        &self,
        hotel_id: HotelId,
        reviews: &[Review],
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.write().unwrap();
        if !state.hotels.contains_key(&hotel_id) {
            return Err(RepositoryError::UnknownHotel(hotel_id));
        }

        let now = Utc::now();
        let mut stored = Vec::with_capacity(reviews.len());
        for review in reviews {
            state.next_review_id += 1;
            stored.push(Review {
                id: state.next_review_id,
                hotel_id,
                created_at: Some(now),
                ..review.clone()
            });
        }
        state.reviews.insert(hotel_id, stored);
        Ok(())
    }

    async fn store_translations(
        &self,
        hotel_id: HotelId,
        translations: &[Translation],
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.write().unwrap();
        if !state.hotels.contains_key(&hotel_id) {
            return Err(RepositoryError::UnknownHotel(hotel_id));
        }

        if translations.is_empty() {
            state.translations.retain(|t| t.hotel_id != hotel_id);
            return Ok(());
        }

        let languages: BTreeSet<&str> = translations
            .iter()
            .map(|t| t.language_code.as_str())
            .collect();
        state
            .translations
            .retain(|t| t.hotel_id != hotel_id || !languages.contains(t.language_code.as_str()));

        for row in dedupe_translations(translations) {
            let row = Translation {
                hotel_id,
                ..row.clone()
            };
            let existing = state.translations.iter_mut().find(|t| {
                t.entity_type == row.entity_type
                    && t.entity_id == row.entity_id
                    && t.language_code == row.language_code
                    && t.field_name == row.field_name
            });
            match existing {
                Some(existing) => *existing = row,
                None => state.translations.push(row),
            }
        }
        Ok(())
    }

    async fn get_hotel_by_id(&self, hotel_id: HotelId) -> Result<HotelRecord, RepositoryError> {
        let state = self.state.read().unwrap();
        state
            .hotels
            .get(&hotel_id)
            .map(StoredHotel::record)
            .ok_or(RepositoryError::HotelNotFound(hotel_id))
    }

    async fn get_hotels(&self, limit: i64, offset: i64) -> Result<Vec<HotelRecord>, RepositoryError> {
        let state = self.state.read().unwrap();
        Ok(state
            .hotels
            .values()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(StoredHotel::record)
            .collect())
    }

    async fn get_hotel_reviews(&self, hotel_id: HotelId) -> Result<Vec<Review>, RepositoryError> {
        let state = self.state.read().unwrap();
        Ok(state.reviews.get(&hotel_id).cloned().unwrap_or_default())
    }

    async fn get_hotel_translations(
        &self,
        hotel_id: HotelId,
        language_code: &str,
    ) -> Result<Vec<Translation>, RepositoryError> {
        let state = self.state.read().unwrap();
        let mut rows: Vec<Translation> = state
            .translations
            .iter()
            .filter(|t| t.hotel_id == hotel_id && t.language_code == language_code)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            (a.entity_type.as_str(), a.entity_id, &a.field_name)
                .cmp(&(b.entity_type.as_str(), b.entity_id, &b.field_name))
        });
        Ok(rows)
    }

    async fn update_review_embedding_status(
        &self,
        review_id: i64,
        status: EmbeddingStatus,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.write().unwrap();
        let review = state
            .reviews
            .values_mut()
            .flat_map(|reviews| reviews.iter_mut())
            .find(|review| review.id == review_id)
            .ok_or(RepositoryError::ReviewNotFound(review_id))?;
        review.embedding_status = status;
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use cupid_shared::{Facility, Photo, Room, TranslationEntity};

    use super::*;

    fn property(hotel_id: HotelId) -> Property {
        Property {
            hotel_id,
            cupid_id: hotel_id * 10,
            hotel_name: format!("Hotel {hotel_id}"),
            rating: 7.5,
            photos: vec![Photo {
                url: "https://img/1.jpg".to_string(),
                ..Default::default()
            }],
            facilities: vec![Facility {
                facility_id: 47,
                name: "WiFi".to_string(),
            }],
            rooms: vec![Room {
                id: 10,
                room_name: "Double".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn review(title: &str) -> Review {
        Review {
            title: title.to_string(),
            rating: 4,
            ..Default::default()
        }
    }

    fn translation(field: &str, language: &str, text: &str) -> Translation {
        Translation {
            hotel_id: 0,
            entity_type: TranslationEntity::Hotel,
            entity_id: 1,
            language_code: language.to_string(),
            field_name: field.to_string(),
            translated_text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_upsert_keeps_created_at_and_updates_scalars() {
        let repository = InMemoryHotelRepository::new();
        repository.store_property(&property(1)).await.unwrap();
        let first = repository.get_hotel_by_id(1).await.unwrap();

        let mut updated = property(1);
        updated.rating = 9.1;
        repository.store_property(&updated).await.unwrap();
        let second = repository.get_hotel_by_id(1).await.unwrap();

        assert_eq!(repository.hotel_count(), 1);
        assert_eq!(second.rating, 9.1);
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at >= first.updated_at);
    }

    #[tokio::test]
    async fn test_empty_children_leave_stored_ones() {
        let repository = InMemoryHotelRepository::new();
        repository.store_property(&property(1)).await.unwrap();

        let mut bare = property(1);
        bare.photos.clear();
        bare.facilities.clear();
        bare.rooms.clear();
        repository.store_property(&bare).await.unwrap();

        let stored = repository.stored_property(1).unwrap();
        assert_eq!(stored.photos.len(), 1);
        assert_eq!(stored.facilities.len(), 1);
        assert_eq!(stored.rooms.len(), 1);
    }

    #[tokio::test]
    async fn test_non_empty_children_replace_wholesale() {
        let repository = InMemoryHotelRepository::new();
        repository.store_property(&property(1)).await.unwrap();

        let mut next = property(1);
        next.rooms = vec![
            Room { id: 20, ..Default::default() },
            Room { id: 30, ..Default::default() },
        ];
        repository.store_property(&next).await.unwrap();

        let ids: Vec<i64> = repository
            .stored_property(1)
            .unwrap()
            .rooms
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![20, 30]);
    }

    #[tokio::test]
    async fn test_duplicate_room_ids_rejected() {
        let repository = InMemoryHotelRepository::new();
        let mut bad = property(1);
        bad.rooms.push(Room { id: 10, ..Default::default() });

        let result = repository.store_property(&bad).await;
        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
        assert!(matches!(
            repository.get_hotel_by_id(1).await,
            Err(RepositoryError::HotelNotFound(1))
        ));
    }

    #[tokio::test]
    async fn test_reviews_replace_and_clear() {
        let repository = InMemoryHotelRepository::new();
        repository.store_property(&property(1)).await.unwrap();

        repository
            .store_reviews(1, &[review("A"), review("B")])
            .await
            .unwrap();
        repository.store_reviews(1, &[review("C")]).await.unwrap();

        let titles: Vec<String> = repository
            .get_hotel_reviews(1)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["C"]);

        repository.store_reviews(1, &[]).await.unwrap();
        assert!(repository.get_hotel_reviews(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reviews_for_unknown_hotel_rejected() {
        let repository = InMemoryHotelRepository::new();
        let result = repository.store_reviews(42, &[review("A")]).await;
        assert!(matches!(result, Err(RepositoryError::UnknownHotel(42))));
    }

    #[tokio::test]
    async fn test_translations_replace_per_language() {
        let repository = InMemoryHotelRepository::new();
        repository.store_property(&property(1)).await.unwrap();

        repository
            .store_translations(
                1,
                &[
                    translation("hotel_name", "fr", "Hôtel Z"),
                    translation("description", "fr", "Ancienne"),
                    translation("hotel_name", "es", "Hotel Z"),
                ],
            )
            .await
            .unwrap();

        // Only French is refreshed; Spanish stays.
        repository
            .store_translations(1, &[translation("hotel_name", "fr", "Le Z")])
            .await
            .unwrap();

        let fr = repository.get_hotel_translations(1, "fr").await.unwrap();
        assert_eq!(fr.len(), 1);
        assert_eq!(fr[0].translated_text, "Le Z");
        assert_eq!(fr[0].hotel_id, 1);

        let es = repository.get_hotel_translations(1, "es").await.unwrap();
        assert_eq!(es.len(), 1);

        repository.store_translations(1, &[]).await.unwrap();
        assert!(repository.get_hotel_translations(1, "es").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_translation_keys_last_wins() {
        let repository = InMemoryHotelRepository::new();
        repository.store_property(&property(1)).await.unwrap();

        repository
            .store_translations(
                1,
                &[
                    translation("hotel_name", "fr", "first"),
                    translation("hotel_name", "fr", "second"),
                ],
            )
            .await
            .unwrap();

        let fr = repository.get_hotel_translations(1, "fr").await.unwrap();
        assert_eq!(fr.len(), 1);
        assert_eq!(fr[0].translated_text, "second");
    }

    #[tokio::test]
    async fn test_embedding_status_update() {
        let repository = InMemoryHotelRepository::new();
        repository.store_property(&property(1)).await.unwrap();
        repository.store_reviews(1, &[review("A")]).await.unwrap();

        let id = repository.get_hotel_reviews(1).await.unwrap()[0].id;
        repository
            .update_review_embedding_status(id, EmbeddingStatus::Completed)
            .await
            .unwrap();

        let stored = repository.get_hotel_reviews(1).await.unwrap();
        assert_eq!(stored[0].embedding_status, EmbeddingStatus::Completed);

        let missing = repository
            .update_review_embedding_status(999, EmbeddingStatus::Failed)
            .await;
        assert!(matches!(missing, Err(RepositoryError::ReviewNotFound(999))));
    }

    #[tokio::test]
    async fn test_get_hotels_pages_by_id() {
        let repository = InMemoryHotelRepository::new();
        for id in [3, 1, 2] {
            repository.store_property(&property(id)).await.unwrap();
        }

        let page: Vec<HotelId> = repository
            .get_hotels(2, 1)
            .await
            .unwrap()
            .iter()
            .map(|h| h.hotel_id)
            .collect();
        assert_eq!(page, vec![2, 3]);
    }
}
