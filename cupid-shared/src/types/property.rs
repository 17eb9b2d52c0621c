use serde::{Deserialize, Serialize};

use crate::types::{null_as_default, HotelId};

/// A hotel property as served by the Cupid content endpoint.
///
/// This is the root of the entity graph persisted by the repository. The
/// address and check-in blocks are one-to-one with the property; photos,
/// facilities, policies and rooms are replaced wholesale on every sync.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Property {
    pub hotel_id: HotelId,
    pub cupid_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub main_image_th: String,
    #[serde(deserialize_with = "null_as_default")]
    pub hotel_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub hotel_type_id: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub chain: String,
    #[serde(deserialize_with = "null_as_default")]
    pub chain_id: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub latitude: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub longitude: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub hotel_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub fax: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub address: Address,
    #[serde(deserialize_with = "null_as_default")]
    pub stars: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub airport_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub rating: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub review_count: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub checkin: Checkin,
    #[serde(deserialize_with = "null_as_default")]
    pub parking: String,
    pub group_room_min: Option<i32>,
    #[serde(deserialize_with = "null_as_default")]
    pub child_allowed: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub pets_allowed: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub photos: Vec<Photo>,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub markdown_description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub important_info: String,
    #[serde(deserialize_with = "null_as_default")]
    pub facilities: Vec<Facility>,
    #[serde(deserialize_with = "null_as_default")]
    pub policies: Vec<Policy>,
    #[serde(deserialize_with = "null_as_default")]
    pub rooms: Vec<Room>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Address {
    #[serde(deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(deserialize_with = "null_as_default")]
    pub postal_code: String,
}

/// Check-in rules. `instructions` keeps the order the source sent them in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Checkin {
    #[serde(deserialize_with = "null_as_default")]
    pub checkin_start: String,
    #[serde(deserialize_with = "null_as_default")]
    pub checkin_end: String,
    #[serde(deserialize_with = "null_as_default")]
    pub checkout: String,
    #[serde(deserialize_with = "null_as_default")]
    pub instructions: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub special_instructions: String,
}

/// A photo attached either to the hotel or to one of its rooms.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Photo {
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub hd_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image_description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image_class1: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image_class2: String,
    #[serde(deserialize_with = "null_as_default")]
    pub main_photo: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub class_id: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub class_order: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Facility {
    pub facility_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Policy {
    #[serde(deserialize_with = "null_as_default")]
    pub policy_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub child_allowed: String,
    #[serde(deserialize_with = "null_as_default")]
    pub pets_allowed: String,
    #[serde(deserialize_with = "null_as_default")]
    pub parking: String,
    pub id: i64,
}

/// A room type offered by the hotel.
///
/// `id` is the Cupid room id, unique within the property. The repository
/// maps it to the internal row id before attaching bed types, amenities and
/// photos.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Room {
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub room_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub room_size_square: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub room_size_unit: String,
    #[serde(deserialize_with = "null_as_default")]
    pub max_adults: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub max_children: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub max_occupancy: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub bed_relation: String,
    #[serde(deserialize_with = "null_as_default")]
    pub bed_types: Vec<BedType>,
    #[serde(deserialize_with = "null_as_default")]
    pub room_amenities: Vec<RoomAmenity>,
    #[serde(deserialize_with = "null_as_default")]
    pub photos: Vec<Photo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BedType {
    #[serde(deserialize_with = "null_as_default")]
    pub quantity: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub bed_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub bed_size: String,
    pub id: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RoomAmenity {
    pub amenities_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sort: i32,
}
