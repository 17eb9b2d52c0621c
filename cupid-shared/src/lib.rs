//! # Cupid Shared
//!
//! This crate defines the hotel content data structures shared across the
//! Cupid sync system, along with the parsers that turn raw Cupid API payloads
//! into them.
//!
//! ## Modules
//!
//! - [`types`]: Property graph, reviews and translations
//! - [`parser`]: Payload parsing for the three sync endpoints

pub mod parser;
pub mod types;

pub use parser::{parse_property, parse_property_for, parse_reviews, parse_translations, ParseError};
pub use types::{
    Address, BedType, Checkin, EmbeddingStatus, Facility, HotelId, HotelRecord, Photo, Policy,
    Property, Review, Room, RoomAmenity, Translation, TranslationEntity,
};
