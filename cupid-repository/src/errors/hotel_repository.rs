use cupid_shared::HotelId;
use thiserror::Error;

/// Errors raised by [`HotelRepository`](crate::HotelRepository) implementations.
///
/// Any error returned from a store operation means its transaction was
/// rolled back; no partial graph is visible afterwards.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Hotel not found: {0}")]
    HotelNotFound(HotelId),

    #[error("Review not found: {0}")]
    ReviewNotFound(i64),

    /// A review or translation write referenced a hotel that is not stored.
    #[error("Unknown hotel referenced: {0}")]
    UnknownHotel(HotelId),

    /// A room was missing from the ids returned by the room insert.
    #[error("Room {cupid_room_id} of hotel {hotel_id} has no stored row")]
    UnmappedRoom { hotel_id: HotelId, cupid_room_id: i64 },

    #[error("Invalid stored data: {0}")]
    InvalidData(String),
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::HotelNotFound(_) | Self::ReviewNotFound(_))
    }
}
