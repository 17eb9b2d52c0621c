//! Row shapes read back from PostgreSQL.
use chrono::{DateTime, Utc};
use cupid_shared::{HotelRecord, Review, Translation};

use crate::RepositoryError;

#[derive(sqlx::FromRow)]
pub(super) struct HotelRow {
    hotel_id: i64,
    cupid_id: i64,
    hotel_name: String,
    rating: f64,
    review_count: i32,
    stars: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<HotelRow> for HotelRecord {
    fn from(row: HotelRow) -> Self {
        HotelRecord {
            hotel_id: row.hotel_id,
            cupid_id: row.cupid_id,
            hotel_name: row.hotel_name,
            rating: row.rating,
            review_count: row.review_count,
            stars: row.stars,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct ReviewRow {
    id: i64,
    hotel_id: i64,
    reviewer_name: String,
    rating: i32,
    title: String,
    content: String,
    language_code: String,
    review_date: String,
    helpful_votes: i32,
    embedding_status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = RepositoryError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let embedding_status = row.embedding_status.parse().map_err(|status| {
            RepositoryError::InvalidData(format!("review {} has embedding status {status}", row.id))
        })?;

        Ok(Review {
            id: row.id,
            hotel_id: row.hotel_id,
            reviewer_name: row.reviewer_name,
            rating: row.rating,
            title: row.title,
            content: row.content,
            language_code: row.language_code,
            review_date: row.review_date,
            helpful_votes: row.helpful_votes,
            embedding_status,
            created_at: Some(row.created_at),
        })
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct TranslationRow {
    hotel_id: i64,
    entity_type: String,
    entity_id: i64,
    language_code: String,
    field_name: String,
    translated_text: String,
}

impl TryFrom<TranslationRow> for Translation {
    type Error = RepositoryError;

    fn try_from(row: TranslationRow) -> Result<Self, Self::Error> {
        let entity_type = row
            .entity_type
            .parse()
            .map_err(|kind| RepositoryError::InvalidData(format!("translation entity type {kind}")))?;

        Ok(Translation {
            hotel_id: row.hotel_id,
            entity_type,
            entity_id: row.entity_id,
            language_code: row.language_code,
            field_name: row.field_name,
            translated_text: row.translated_text,
        })
    }
}
