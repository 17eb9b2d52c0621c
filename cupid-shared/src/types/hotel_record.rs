use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::HotelId;

/// The root hotel row as read back from the store.
///
/// Carries the identifying scalars plus the bookkeeping timestamps; the
/// owned sub-structures are not loaded by point lookups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HotelRecord {
    pub hotel_id: HotelId,
    pub cupid_id: i64,
    pub hotel_name: String,
    pub rating: f64,
    pub review_count: i32,
    pub stars: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
