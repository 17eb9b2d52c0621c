use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{null_as_default, HotelId};

/// A single translated field of some entity owned by a hotel.
///
/// Uniquely keyed by `(entity_type, entity_id, language_code, field_name)`.
/// `hotel_id` scopes the row for per-hotel, per-language replacement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Translation {
    #[serde(default)]
    pub hotel_id: HotelId,
    pub entity_type: TranslationEntity,
    pub entity_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub language_code: String,
    pub field_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub translated_text: String,
}

/// The kind of entity a [`Translation`] belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TranslationEntity {
    Hotel,
    Room,
    Facility,
    Review,
}

impl TranslationEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hotel => "hotel",
            Self::Room => "room",
            Self::Facility => "facility",
            Self::Review => "review",
        }
    }
}

impl fmt::Display for TranslationEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TranslationEntity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hotel" => Ok(Self::Hotel),
            "room" => Ok(Self::Room),
            "facility" => Ok(Self::Facility),
            "review" => Ok(Self::Review),
            other => Err(other.to_string()),
        }
    }
}
