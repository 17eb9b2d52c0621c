//! Response shapes returned by the reader.

use cupid_shared::{HotelId, HotelRecord, Review, Translation};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct HotelPage {
    pub hotels: Vec<HotelRecord>,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewsView {
    pub hotel_id: HotelId,
    pub count: usize,
    pub reviews: Vec<Review>,
    /// Whether the list was served from the review cache.
    pub from_cache: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslationsView {
    pub hotel_id: HotelId,
    pub language: String,
    pub count: usize,
    pub translations: Vec<Translation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheHealth {
    /// Running without a cache.
    Disabled,
    Up,
    Down,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub database: bool,
    pub cache: CacheHealth,
}

impl HealthReport {
    /// A down cache degrades reads but does not make the service unhealthy.
    pub fn is_healthy(&self) -> bool {
        self.database
    }
}
