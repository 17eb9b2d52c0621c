//! Parsing of raw Cupid payloads into the shared entity types.
//!
//! Each sync endpoint has one entry point: [`parse_property`] for content,
//! [`parse_reviews`] for reviews and [`parse_translations`] for a single
//! language of translations. Parsing never touches the store; a parse
//! failure aborts the sync unit before anything is written.

use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;

use crate::types::{HotelId, Property, Review, Translation, TranslationEntity};

/// Errors raised while decoding a Cupid payload.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Empty payload")]
    EmptyPayload,

    #[error("Property payload has no hotel_id")]
    MissingHotelId,

    #[error("Room id {0} appears more than once")]
    DuplicateRoomId(i64),

    #[error("Requested hotel {requested} but payload is for hotel {received}")]
    HotelIdMismatch { requested: HotelId, received: HotelId },
}

/// Parses a content payload into a [`Property`].
///
/// Room ids must be unique within the property, since they key the
/// external-to-internal room id mapping at persistence time.
pub fn parse_property(body: &[u8]) -> Result<Property, ParseError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ParseError::EmptyPayload);
    }

    let property: Property = serde_json::from_slice(body)?;
    if property.hotel_id <= 0 {
        return Err(ParseError::MissingHotelId);
    }

    let mut seen = HashSet::with_capacity(property.rooms.len());
    for room in &property.rooms {
        if !seen.insert(room.id) {
            return Err(ParseError::DuplicateRoomId(room.id));
        }
    }

    Ok(property)
}

/// Parses a content payload that was requested for `requested`.
///
/// A payload describing any other hotel is rejected, so it never gets
/// stored under a sync unit that was meant for a different id.
pub fn parse_property_for(body: &[u8], requested: HotelId) -> Result<Property, ParseError> {
    let property = parse_property(body)?;
    if property.hotel_id != requested {
        return Err(ParseError::HotelIdMismatch {
            requested,
            received: property.hotel_id,
        });
    }
    Ok(property)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ReviewsPayload {
    List(Vec<Review>),
    Wrapped { reviews: Vec<Review> },
}

/// Parses a reviews payload.
///
/// Accepts either a bare JSON array or an object with a `reviews` array.
/// An empty body is an empty list: the hotel has no reviews.
pub fn parse_reviews(body: &[u8]) -> Result<Vec<Review>, ParseError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let payload: ReviewsPayload = serde_json::from_slice(body)?;
    Ok(match payload {
        ReviewsPayload::List(reviews) => reviews,
        ReviewsPayload::Wrapped { reviews } => reviews,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TranslationsPayload {
    Rows(Vec<Translation>),
    Property(Box<Property>),
}

/// Parses a translations payload for one language.
///
/// The payload is either a list of translation rows or a property document
/// localised into `language`. In the second case rows are derived from the
/// translatable hotel, room and facility fields. Every returned row carries
/// `language`; empty texts are dropped.
pub fn parse_translations(body: &[u8], language: &str) -> Result<Vec<Translation>, ParseError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let payload: TranslationsPayload = serde_json::from_slice(body)?;
    let mut translations = match payload {
        TranslationsPayload::Rows(rows) => rows,
        TranslationsPayload::Property(property) => translations_from_property(&property),
    };

    translations.retain(|t| !t.translated_text.trim().is_empty());
    for translation in &mut translations {
        translation.language_code = language.to_string();
    }

    Ok(translations)
}

fn translations_from_property(property: &Property) -> Vec<Translation> {
    let row = |entity_type, entity_id, field_name: &str, text: &str| Translation {
        hotel_id: property.hotel_id,
        entity_type,
        entity_id,
        language_code: String::new(),
        field_name: field_name.to_string(),
        translated_text: text.to_string(),
    };

    let mut rows = vec![
        row(TranslationEntity::Hotel, property.hotel_id, "hotel_name", &property.hotel_name),
        row(TranslationEntity::Hotel, property.hotel_id, "description", &property.description),
        row(
            TranslationEntity::Hotel,
            property.hotel_id,
            "markdown_description",
            &property.markdown_description,
        ),
        row(TranslationEntity::Hotel, property.hotel_id, "important_info", &property.important_info),
    ];

    for room in &property.rooms {
        rows.push(row(TranslationEntity::Room, room.id, "room_name", &room.room_name));
        rows.push(row(TranslationEntity::Room, room.id, "description", &room.description));
    }

    for facility in &property.facilities {
        rows.push(row(TranslationEntity::Facility, facility.facility_id, "name", &facility.name));
    }

    rows
}
