mod hotel_record;
mod property;
mod review;
mod translation;

pub use hotel_record::HotelRecord;
pub use property::{
    Address, BedType, Checkin, Facility, Photo, Policy, Property, Room, RoomAmenity,
};
pub use review::{EmbeddingStatus, Review};
pub use translation::{Translation, TranslationEntity};

use serde::{Deserialize, Deserializer};

/// External (Cupid) hotel identifier. Unique across all properties.
pub type HotelId = i64;

/// Deserializes an explicit JSON `null` as the type's default value.
///
/// Cupid payloads send `null` for absent strings and lists instead of
/// omitting the key, which `#[serde(default)]` alone does not cover.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
